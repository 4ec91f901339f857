//! Gateway handle and its control operations.

use crate::cancel::Cancel;
use crate::error::{AddPortMappingError, GetExternalAddressError, RequestError};
use crate::route;
use igd_discovery::Device;
use quick_xml::escape::escape;
use soap_client::{SoapClient, SoapResponse};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, info};
use url::{Host, Url};
use xmltree::Element;

const ADD_PORT_MAPPING: &str = "AddPortMapping";
const GET_EXTERNAL_IP_ADDRESS: &str = "GetExternalIPAddress";

/// Transport protocol of a port mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// Wire form used in `NewProtocol`
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A WAN connection service of an Internet Gateway Device.
///
/// Handles are produced by [`discover`](crate::discover); one physical
/// gateway may yield several. Operations on one handle are expected to be
/// issued one at a time. [`stop`](Self::stop) may be called from anywhere
/// and aborts whatever is in flight; dropping the handle stops it too.
#[derive(Debug)]
pub struct Igd {
    uuid: String,
    device: Device,
    service_id: String,
    url: Url,
    urn: String,
    cancel: Cancel,
}

impl Igd {
    pub(crate) fn new(
        uuid: String,
        device: Device,
        service_id: String,
        url: Url,
        urn: String,
    ) -> Self {
        Self {
            uuid,
            device,
            service_id,
            url,
            urn,
            cancel: Cancel::new(),
        }
    }

    /// Identifier of the responding gateway, from its SSDP `USN`
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// The WANConnectionDevice this service belongs to
    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.device.friendly_name.as_deref()
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// URL accepting SOAP requests for this service
    pub fn control_url(&self) -> &Url {
        &self.url
    }

    /// Service type URN, e.g. `urn:schemas-upnp-org:service:WANPPPConnection:1`
    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// Ask the gateway to forward `external_port` to `internal_port` on this host.
    ///
    /// The internal client address is the local address routing toward the
    /// gateway. A `lease` of zero asks for an indefinite mapping, which some
    /// gateways reject or cap.
    pub async fn add_port_mapping(
        &self,
        protocol: Protocol,
        external_port: u16,
        internal_port: u16,
        description: &str,
        lease: Duration,
    ) -> Result<(), AddPortMappingError> {
        let endpoint = self.endpoint().await?;

        let internal_client = self
            .cancel
            .run(route::local_address_for(endpoint))
            .await?
            .ok_or(AddPortMappingError::NoRouteToGateway)?;

        let payload = add_port_mapping_payload(
            protocol,
            external_port,
            internal_port,
            internal_client,
            description,
            lease,
        );

        let response = self.soap_request(endpoint, ADD_PORT_MAPPING, &payload).await?;
        if !response.is_ok() {
            log_rejection(ADD_PORT_MAPPING, &response);
            return Err(AddPortMappingError::UnexpectedStatus(response.status));
        }

        info!(
            %protocol,
            external_port,
            %internal_client,
            internal_port,
            "port mapping added"
        );
        Ok(())
    }

    /// Query the gateway's external IP address.
    ///
    /// Every call is a fresh round trip.
    pub async fn get_external_address(&self) -> Result<IpAddr, GetExternalAddressError> {
        let endpoint = self.endpoint().await?;

        let response = self.soap_request(endpoint, GET_EXTERNAL_IP_ADDRESS, "").await?;
        if !response.is_ok() {
            log_rejection(GET_EXTERNAL_IP_ADDRESS, &response);
            return Err(GetExternalAddressError::UnexpectedStatus(response.status));
        }

        parse_external_address(&response.body)
    }

    /// Abort any in-flight operation and refuse new ones. Idempotent.
    pub fn stop(&self) {
        self.cancel.stop();
    }

    async fn endpoint(&self) -> Result<SocketAddr, RequestError> {
        let port = self
            .url
            .port_or_known_default()
            .ok_or(RequestError::HostParseFailed)?;

        match self.url.host() {
            Some(Host::Ipv4(ip)) => Ok(SocketAddr::from((ip, port))),
            Some(Host::Ipv6(ip)) => Ok(SocketAddr::from((ip, port))),
            Some(Host::Domain(domain)) => {
                let resolved = self
                    .cancel
                    .run(tokio::net::lookup_host((domain, port)))
                    .await?;
                resolved
                    .ok()
                    .and_then(|mut addrs| addrs.next())
                    .ok_or(RequestError::HostParseFailed)
            }
            None => Err(RequestError::HostParseFailed),
        }
    }

    async fn soap_request(
        &self,
        endpoint: SocketAddr,
        command: &str,
        message: &str,
    ) -> Result<SoapResponse, RequestError> {
        let client = SoapClient::new()?;

        let response = self
            .cancel
            .run(client.call(endpoint, &self.url, &self.urn, command, message))
            .await??;

        Ok(response)
    }
}

impl Drop for Igd {
    fn drop(&mut self) {
        self.cancel.stop();
    }
}

fn add_port_mapping_payload(
    protocol: Protocol,
    external_port: u16,
    internal_port: u16,
    internal_client: IpAddr,
    description: &str,
    lease: Duration,
) -> String {
    // NewLeaseDuration is a ui4
    let lease_seconds = u32::try_from(lease.as_secs()).unwrap_or(u32::MAX);

    format!(
        "<NewRemoteHost></NewRemoteHost>\
         <NewExternalPort>{}</NewExternalPort>\
         <NewProtocol>{}</NewProtocol>\
         <NewInternalPort>{}</NewInternalPort>\
         <NewInternalClient>{}</NewInternalClient>\
         <NewEnabled>1</NewEnabled>\
         <NewPortMappingDescription>{}</NewPortMappingDescription>\
         <NewLeaseDuration>{}</NewLeaseDuration>",
        external_port,
        protocol,
        internal_port,
        internal_client,
        escape(description),
        lease_seconds
    )
}

fn parse_external_address(body: &str) -> Result<IpAddr, GetExternalAddressError> {
    soap_client::check_depth(body, soap_client::MAX_XML_DEPTH).map_err(|e| {
        debug!(error = %e, "rejected GetExternalIPAddress response body");
        GetExternalAddressError::MalformedBody
    })?;

    let xml =
        Element::parse(body.as_bytes()).map_err(|_| GetExternalAddressError::MalformedBody)?;

    let response = soap_client::extract_response(&xml, GET_EXTERNAL_IP_ADDRESS).map_err(|e| {
        debug!(error = %e, "unexpected GetExternalIPAddress response shape");
        GetExternalAddressError::MissingField
    })?;

    let field = response
        .get_child("NewExternalIPAddress")
        .ok_or(GetExternalAddressError::MissingField)?;

    let text = field.get_text().unwrap_or_default();
    let text = text.trim();
    text.parse::<IpAddr>()
        .map_err(|_| GetExternalAddressError::InvalidValue(text.to_string()))
}

fn log_rejection(action: &str, response: &SoapResponse) {
    match soap_client::fault_code(&response.body) {
        Some(code) => debug!(action, status = response.status, code, "gateway returned UPnP error"),
        None => debug!(action, status = response.status, "gateway rejected request"),
    }
}
