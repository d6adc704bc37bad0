//! Error types for the conversion form and its HTTP adapters.

use thiserror::Error;

/// Failures raised by the catalog and conversion adapters.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the remote `{message}` field when the
    /// body carried one.
    #[error("HTTP error: {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ClientError {
    /// The remote error message, if the service sent one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            ClientError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

/// Everything the form can surface to the user.
///
/// None of these are fatal: each one is recovered by the component that
/// detects it and turned into a state transition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// Missing or malformed input, caught before any network call.
    #[error("{0}")]
    Validation(String),

    /// The catalog service failed; the message is the banner shown with
    /// the degraded currency list.
    #[error("{0}")]
    CatalogFetch(String),

    #[error("{0}")]
    Conversion(String),

    /// Another request already owns the control.
    #[error("{0}")]
    Busy(String),
}

impl FormError {
    pub fn validation(message: impl Into<String>) -> Self {
        FormError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_only_for_status_errors() {
        let err = ClientError::Status {
            status: 400,
            message: Some("Amount must be greater than zero".to_string()),
        };
        assert_eq!(err.remote_message(), Some("Amount must be greater than zero"));
        assert_eq!(err.to_string(), "HTTP error: 400");

        let err = ClientError::Status {
            status: 500,
            message: None,
        };
        assert!(err.remote_message().is_none());

        let err = ClientError::Decode("missing field `result`".to_string());
        assert!(err.remote_message().is_none());
    }
}
