//! Error types for the discovery system.

use std::fmt;

/// Error type for discovery operations.
///
/// Represents the failure modes of gateway discovery: socket and HTTP
/// issues, malformed device descriptions, timeouts and unexpected statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Network-related errors (socket creation, HTTP requests, etc.)
    NetworkError(String),
    /// Parsing errors (XML, SSDP response, etc.)
    ParseError(String),
    /// Operation timed out waiting for responses
    Timeout,
    /// The device description server answered with a non-OK status
    UnexpectedStatus(u16),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DiscoveryError::Timeout => write!(f, "Operation timed out"),
            DiscoveryError::UnexpectedStatus(status) => {
                write!(f, "Unexpected HTTP status: {}", status)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {}

impl From<soap_client::SoapError> for DiscoveryError {
    fn from(error: soap_client::SoapError) -> Self {
        use soap_client::SoapError;

        match error {
            SoapError::Timeout => DiscoveryError::Timeout,
            SoapError::Network(msg) => DiscoveryError::NetworkError(msg),
            other => DiscoveryError::ParseError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            DiscoveryError::Timeout
        } else {
            DiscoveryError::NetworkError(error.to_string())
        }
    }
}

/// Convenience Result type alias for discovery operations.
///
/// Equivalent to `std::result::Result<T, DiscoveryError>`.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
