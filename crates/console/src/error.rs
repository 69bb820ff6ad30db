use domain::forms::FormError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {resource}")]
    NotFound { resource: String, message: String },

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(#[from] FormError),

    #[error("Request abandoned: view closed")]
    Cancelled,

    #[error("Session store error: {0}")]
    Session(String),
}

impl ConsoleError {
    /// Message shown inline for a failed action.
    ///
    /// Remote failures of every kind collapse into one generic message per
    /// action; only form validation keeps its own wording.
    pub fn user_message(&self, action: Action) -> String {
        match self {
            ConsoleError::Validation(err) => err.message.clone(),
            _ => action.failure_message(),
        }
    }

    /// A missing resource with nothing more to say about it.
    pub fn not_found(resource: impl Into<String>) -> Self {
        ConsoleError::NotFound {
            resource: resource.into(),
            message: String::new(),
        }
    }

    /// True when the error came from client-side checks and no request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConsoleError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for ConsoleError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ConsoleError::Validation(FormError::from_validation(&errors, &[]))
    }
}

/// User-facing action an error is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Initial concurrent load of a screen.
    Load,
    /// Dashboard load.
    LoadDashboard,
    /// Re-fetch of one collection; carries the plural noun.
    Fetch(&'static str),
    /// Create or update; carries the singular noun.
    Save(&'static str),
    /// Delete; carries the singular noun.
    Delete(&'static str),
}

impl Action {
    pub fn failure_message(&self) -> String {
        match self {
            Action::Load => "There was an error loading the data.".to_string(),
            Action::LoadDashboard => {
                "There was an error loading the data. Please try again later.".to_string()
            }
            Action::Fetch(plural) => format!("There was an error fetching the {}.", plural),
            Action::Save(entity) => format!("There was an error saving the {}.", entity),
            Action::Delete(entity) => format!("There was an error deleting the {}.", entity),
        }
    }
}
