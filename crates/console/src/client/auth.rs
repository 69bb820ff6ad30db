//! Login and logout.

use domain::models::{LoginRequest, LoginResponse};
use validator::Validate;

use super::ApiClient;
use crate::error::ConsoleError;

pub const LOGIN_PATH: &str = "/api/auth/login";

impl ApiClient {
    /// Logs in and stores the returned token in this client's session.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ConsoleError> {
        request.validate()?;

        let response: LoginResponse = self.post_json(LOGIN_PATH, request).await?;
        self.session().set_token(response.token.clone());

        tracing::info!(email = %request.email, "Logged in");
        Ok(response)
    }

    /// Forgets the session token. Nothing is sent to the service.
    pub fn logout(&self) {
        self.session().clear();
        tracing::info!("Logged out");
    }
}

/// Message shown when a login attempt fails.
///
/// Unlike the editors, login surfaces what the service said, or the
/// transport error when there was no response at all.
pub fn login_failure_message(err: &ConsoleError) -> String {
    match err {
        ConsoleError::Unauthorized(message)
        | ConsoleError::NotFound { message, .. }
        | ConsoleError::Rejected { message, .. }
            if !message.is_empty() =>
        {
            message.clone()
        }
        ConsoleError::Validation(form) => form.message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::forms::FormError;

    #[test]
    fn test_login_failure_uses_service_message() {
        let err = ConsoleError::Unauthorized("Invalid credentials".to_string());
        assert_eq!(login_failure_message(&err), "Invalid credentials");

        let err = ConsoleError::Rejected {
            status: 400,
            message: "Email is required".to_string(),
        };
        assert_eq!(login_failure_message(&err), "Email is required");

        let err = ConsoleError::NotFound {
            resource: LOGIN_PATH.to_string(),
            message: "User not found".to_string(),
        };
        assert_eq!(login_failure_message(&err), "User not found");
    }

    #[test]
    fn test_login_failure_falls_back_to_error_text() {
        let err = ConsoleError::Rejected {
            status: 502,
            message: String::new(),
        };
        assert_eq!(
            login_failure_message(&err),
            "Request rejected with status 502: "
        );

        let err = ConsoleError::Validation(FormError {
            field: "email".to_string(),
            message: "Email must be a valid address".to_string(),
        });
        assert_eq!(login_failure_message(&err), "Email must be a valid address");

        let err = ConsoleError::not_found(LOGIN_PATH);
        assert_eq!(login_failure_message(&err), "Not found: /api/auth/login");
    }
}
