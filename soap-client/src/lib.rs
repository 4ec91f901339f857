//! Private SOAP client for UPnP gateway control requests
//!
//! This crate provides a minimal SOAP 1.1 client specifically designed for
//! talking to UPnP Internet Gateway Devices. Every call opens one fresh
//! connection, writes a single POST and reads the full response under a fixed
//! deadline. Interpreting the HTTP status is left to the caller.

mod error;
mod limits;

pub use error::SoapError;
pub use limits::{check_depth, read_body, MAX_RESPONSE_BYTES, MAX_XML_DEPTH};

use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;
use url::Url;
use xmltree::Element;

/// SOAP 1.1 envelope namespace
pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.1 encoding style
pub const SOAP_ENCODING_STYLE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("upnp-igd/", env!("CARGO_PKG_VERSION"), " UPnP/1.1");

/// Deadline covering connect, write and read of a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw HTTP response to a SOAP request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl SoapResponse {
    /// Whether the gateway answered `200 OK`
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A minimal SOAP client for UPnP gateway communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    http: reqwest::Client,
}

impl SoapClient {
    /// Create a new SOAP client.
    ///
    /// The underlying HTTP client keeps no idle connections, so each call
    /// connects anew, and never goes through a system proxy.
    pub fn new() -> Result<Self, SoapError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(REQUEST_TIMEOUT)
            .no_proxy()
            .build()?;

        Ok(Self { http })
    }

    /// Send a SOAP request and return the raw response.
    ///
    /// # Arguments
    /// * `endpoint` - Resolved address of the gateway to connect to
    /// * `url` - Control URL; supplies the request path and the `Host` header
    /// * `service_urn` - Service type URN the action belongs to
    /// * `action` - Action name, e.g. `GetExternalIPAddress`
    /// * `payload` - Action arguments, already serialized as XML
    pub async fn call(
        &self,
        endpoint: SocketAddr,
        url: &Url,
        service_urn: &str,
        action: &str,
        payload: &str,
    ) -> Result<SoapResponse, SoapError> {
        let body = envelope(service_urn, action, payload);
        let target = format!("http://{}{}", endpoint, path_and_query(url));

        debug!(%endpoint, action, "sending SOAP request");

        let response = self
            .http
            .post(&target)
            .header("HOST", host_header(url))
            .header("USER-AGENT", USER_AGENT)
            .header("CONTENT-TYPE", "text/xml; charset=\"utf-8\"")
            .header("CONNECTION", "Close")
            .header("CACHE-CONTROL", "no-cache")
            .header("PRAGMA", "no-cache")
            .header("SOAPACTION", soap_action(service_urn, action))
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = read_body(response, MAX_RESPONSE_BYTES).await?;

        debug!(%endpoint, action, status, "SOAP response received");

        Ok(SoapResponse { status, body })
    }
}

/// Wrap an action's arguments in a SOAP 1.1 envelope.
pub fn envelope(service_urn: &str, action: &str, payload: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\r\n\
         <s:Envelope xmlns:s=\"{SOAP_ENVELOPE_NS}\" s:encodingStyle=\"{SOAP_ENCODING_STYLE}\">\r\n\
         <s:Body>\r\n\
         <u:{action} xmlns:u=\"{service_urn}\">\r\n\
         {payload}\
         </u:{action}>\r\n\
         </s:Body>\r\n\
         </s:Envelope>\r\n"
    )
}

/// Value of the `SOAPAction` header for an action.
pub fn soap_action(service_urn: &str, action: &str) -> String {
    format!("\"{}#{}\"", service_urn, action)
}

/// Extract the `<{action}Response>` element from a parsed envelope.
///
/// Envelope and Body must be in the SOAP envelope namespace; a Body carrying
/// a `Fault` yields [`SoapError::Fault`].
pub fn extract_response(xml: &Element, action: &str) -> Result<Element, SoapError> {
    if xml.name != "Envelope" || xml.namespace.as_deref() != Some(SOAP_ENVELOPE_NS) {
        return Err(SoapError::MissingElement("SOAP Envelope".to_string()));
    }

    let body = xml
        .get_child(("Body", SOAP_ENVELOPE_NS))
        .ok_or_else(|| SoapError::MissingElement("SOAP Body".to_string()))?;

    // Check for SOAP fault first
    if let Some(fault) = body.get_child("Fault") {
        return Err(SoapError::Fault(upnp_error_code(fault).unwrap_or(500)));
    }

    let response_name = format!("{}Response", action);
    body.get_child(response_name.as_str())
        .cloned()
        .ok_or_else(|| SoapError::MissingElement(response_name))
}

/// UPnP error code carried by a fault response body, if any.
pub fn fault_code(body: &str) -> Option<u16> {
    check_depth(body, MAX_XML_DEPTH).ok()?;
    let xml = Element::parse(body.as_bytes()).ok()?;
    let fault = xml.get_child("Body")?.get_child("Fault")?;
    upnp_error_code(fault)
}

fn upnp_error_code(fault: &Element) -> Option<u16> {
    fault
        .get_child("detail")
        .and_then(|d| d.get_child("UPnPError"))
        .and_then(|e| e.get_child("errorCode"))
        .and_then(|c| c.get_text())
        .and_then(|t| t.trim().parse::<u16>().ok())
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
