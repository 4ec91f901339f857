//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during SOAP communication
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoapError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The request did not complete within the fixed deadline
    #[error("request timed out")]
    Timeout,

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// The envelope parsed but an expected element is absent
    #[error("missing element: {0}")]
    MissingElement(String),

    /// SOAP fault returned by the server
    #[error("SOAP fault: error code {0}")]
    Fault(u16),
}

impl From<reqwest::Error> for SoapError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SoapError::Timeout
        } else {
            SoapError::Network(error.to_string())
        }
    }
}
