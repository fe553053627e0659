//! Panel error type

use thiserror::Error;

use crate::controls::ControlId;

/// Anything that can go wrong while talking to the vehicle
///
/// The `Display` text is what the user sees in an alert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// The vehicle answered with a non-success status
    #[error("{body}. HTTP error {status}.")]
    Http { status: u16, body: String },
    /// The request never got an answer
    #[error("Error! {0}")]
    Transport(String),
    /// The vehicle answered with something that is not the expected JSON
    #[error("Error! Invalid reply: {0}")]
    InvalidReply(String),
    #[error("No file selected!")]
    NoFileSelected,
    #[error("Unknown upload control `{0}`")]
    UnknownControl(String),
    #[error("{0} is not supported by this panel")]
    Unsupported(&'static str),
    /// The control is disabled in the current state
    #[error("`{0}` is disabled")]
    Disabled(ControlId),
    #[error("Error! Cannot read {path}: {message}")]
    Io { path: String, message: String },
}

impl PanelError {
    /// Short form shown in place of the auto-mode label
    pub fn summary(&self) -> String {
        match self {
            Self::Http { body, .. } => body.clone(),
            Self::Transport(message) | Self::InvalidReply(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message() {
        let err = PanelError::Http {
            status: 500,
            body: "vehicle offline".to_string(),
        };
        assert_eq!(err.to_string(), "vehicle offline. HTTP error 500.");
        assert_eq!(err.summary(), "vehicle offline");
    }

    #[test]
    fn test_transport_error_message() {
        let err = PanelError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Error! connection refused");
        assert_eq!(err.summary(), "connection refused");
    }
}
