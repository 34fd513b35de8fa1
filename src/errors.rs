use thiserror::Error;

/// Message surfaced for every failure that is not an actionable 4xx answer.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Something's wrong with the request!";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", TRANSPORT_ERROR_MESSAGE)]
    Transport,

    #[error("{message}")]
    Client { message: String },

    #[error("Thumbnail error: {reason}")]
    Thumbnail { reason: String },

    #[error("Could not detect file type of {label}")]
    Detection { label: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Discord returned no attachments")]
    MissingAttachment,

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn client(message: &str) -> Self {
        Self::Client {
            message: message.to_string(),
        }
    }

    pub fn thumbnail(reason: impl std::fmt::Display) -> Self {
        Self::Thumbnail {
            reason: reason.to_string(),
        }
    }

    pub fn detection(label: &str) -> Self {
        Self::Detection {
            label: label.to_string(),
        }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport)
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Client { .. })
    }
}

/// reqwest failures never leak their detail past this point.
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        log::debug!("Transport failure (detail discarded): {}", error);
        AppError::Transport
    }
}
