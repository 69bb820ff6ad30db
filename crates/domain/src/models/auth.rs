//! Authentication models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for logging in.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,

    /// Whatever else the service returns alongside the token.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
