use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure of a request to the device.
///
/// None of these are fatal: callers log them, notify the user and carry on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RequestError {
    /// No response within the request timeout.
    Timeout,
    /// The device answered with a non-success status.
    HttpStatus { status: String, message: String },
    /// Transport-level failure (device unreachable, connection reset, ...).
    NetworkUnavailable(String),
    /// Success status but the body could not be parsed.
    InvalidBody(String),
}

impl RequestError {
    /// Errors expected while the device is rebooting.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Timeout | Self::NetworkUnavailable(_))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::HttpStatus { status, message } if message.is_empty() => {
                write!(f, "HTTP {status}")
            }
            Self::HttpStatus { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::NetworkUnavailable(reason) => write!(f, "network unavailable: {reason}"),
            Self::InvalidBody(reason) => write!(f, "invalid response body: {reason}"),
        }
    }
}

/// A form constraint violation. Blocks submission, never reaches the network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub name: String,
    pub index: usize,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.name, self.index, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(RequestError::Timeout.to_string(), "request timed out");
        assert_eq!(
            RequestError::HttpStatus {
                status: "500".into(),
                message: "boom".into()
            }
            .to_string(),
            "HTTP 500: boom"
        );
        assert_eq!(
            RequestError::HttpStatus {
                status: "404".into(),
                message: String::new()
            }
            .to_string(),
            "HTTP 404"
        );
        assert!(RequestError::NetworkUnavailable("refused".into()).is_connection_error());
        assert!(!RequestError::InvalidBody("eof".into()).is_connection_error());
    }
}
