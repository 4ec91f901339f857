//! Error types for gateway operations
//!
//! Every public operation has its own closed error enum, so callers can
//! match exhaustively on exactly the failures that operation can produce.

use crate::cancel::Aborted;
use igd_discovery::DiscoveryError;
use soap_client::SoapError;
use thiserror::Error;

/// Errors returned by [`discover`](crate::discover)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoverError {
    /// The SSDP search could not be started
    #[error("failed to start gateway search: {0}")]
    SearchStart(#[source] DiscoveryError),

    /// No usable discovery response arrived
    #[error("no gateway answered the search: {0}")]
    NoResponse(#[source] DiscoveryError),

    /// The root device description could not be fetched or parsed
    #[error("failed to fetch root device: {0}")]
    RootDevice(#[source] DiscoveryError),

    /// The responder's root device is not a supported Internet Gateway Device
    #[error("unsupported root device type {0}")]
    NotAGateway(String),
}

/// Errors returned by [`Igd::add_port_mapping`](crate::Igd::add_port_mapping)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddPortMappingError {
    /// The handle was stopped while the request was in flight
    #[error("operation aborted")]
    Aborted,

    /// The control URL host could not be resolved to an endpoint
    #[error("failed to parse IGD host")]
    HostParseFailed,

    /// No local interface routes to the gateway
    #[error("no suitable endpoint to IGD")]
    NoRouteToGateway,

    /// Connecting, writing or reading failed
    #[error("failed to do SOAP request: {0}")]
    TransportFailed(#[source] SoapError),

    /// The gateway answered with a status other than 200
    #[error("IGD responded with non OK status {0}")]
    UnexpectedStatus(u16),
}

/// Errors returned by [`Igd::get_external_address`](crate::Igd::get_external_address)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetExternalAddressError {
    /// The handle was stopped while the request was in flight
    #[error("operation aborted")]
    Aborted,

    /// The control URL host could not be resolved to an endpoint
    #[error("failed to parse IGD host")]
    HostParseFailed,

    /// Connecting, writing or reading failed
    #[error("failed to do SOAP request: {0}")]
    TransportFailed(#[source] SoapError),

    /// The gateway answered with a status other than 200
    #[error("IGD responded with non OK status {0}")]
    UnexpectedStatus(u16),

    /// The response body is not XML
    #[error("failed to parse XML body")]
    MalformedBody,

    /// `NewExternalIPAddress` is absent from the response
    #[error("response is missing NewExternalIPAddress")]
    MissingField,

    /// `NewExternalIPAddress` is not an IP address
    #[error("bad address {0:?}")]
    InvalidValue(String),
}

/// Failure of the shared request path, before any operation-specific
/// interpretation of the response.
#[derive(Debug)]
pub(crate) enum RequestError {
    Aborted,
    HostParseFailed,
    Transport(SoapError),
}

impl From<Aborted> for RequestError {
    fn from(_: Aborted) -> Self {
        RequestError::Aborted
    }
}

impl From<SoapError> for RequestError {
    fn from(error: SoapError) -> Self {
        RequestError::Transport(error)
    }
}

impl From<Aborted> for AddPortMappingError {
    fn from(_: Aborted) -> Self {
        AddPortMappingError::Aborted
    }
}

impl From<RequestError> for AddPortMappingError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Aborted => AddPortMappingError::Aborted,
            RequestError::HostParseFailed => AddPortMappingError::HostParseFailed,
            RequestError::Transport(e) => AddPortMappingError::TransportFailed(e),
        }
    }
}

impl From<RequestError> for GetExternalAddressError {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Aborted => GetExternalAddressError::Aborted,
            RequestError::HostParseFailed => GetExternalAddressError::HostParseFailed,
            RequestError::Transport(e) => GetExternalAddressError::TransportFailed(e),
        }
    }
}
