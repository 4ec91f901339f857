//! SSDP (Simple Service Discovery Protocol) client for gateway discovery
//!
//! A session sends one `M-SEARCH` request and then hands out parsed
//! responses one at a time until its timeout elapses.

use crate::config::SearchConfig;
use crate::error::{DiscoveryError, Result};
use soap_client::USER_AGENT;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

/// SSDP response containing device information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsdpResponse {
    /// Device description URL from the `LOCATION` header
    pub location: Url,
    /// Device identifier taken from the `USN` header, without the `uuid:` prefix
    pub uuid: String,
    /// Full `USN` header
    pub usn: String,
    /// Search target the device answered for (`ST` header)
    pub urn: Option<String>,
    /// `SERVER` header, if present
    pub server: Option<String>,
}

/// One SSDP search in progress
#[derive(Debug)]
pub struct SsdpSession {
    socket: UdpSocket,
    timeout: Duration,
    buffer: Vec<u8>,
}

impl SsdpSession {
    /// Bind a socket and send the `M-SEARCH` request described by `config`
    pub async fn start(config: &SearchConfig) -> Result<Self> {
        config.validate().map_err(DiscoveryError::ParseError)?;

        let socket = UdpSocket::bind(config.bind_addr).await.map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e))
        })?;

        if config.multicast_addr.ip().is_multicast() {
            socket.set_multicast_loop_v4(true).map_err(|e| {
                DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e))
            })?;
        }

        let request = search_request(config);
        socket
            .send_to(request.as_bytes(), config.multicast_addr)
            .await
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        debug!(target = %config.multicast_addr, st = %config.search_target, "M-SEARCH sent");

        Ok(Self {
            socket,
            timeout: config.search_timeout,
            buffer: vec![0; 2048],
        })
    }

    /// Wait for the next valid response.
    ///
    /// Datagrams that are not valid SSDP responses are skipped. Fails with
    /// [`DiscoveryError::Timeout`] when nothing valid arrives within the
    /// session timeout.
    pub async fn next_response(&mut self) -> Result<SsdpResponse> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let (size, from) = match tokio::time::timeout_at(
                deadline,
                self.socket.recv_from(&mut self.buffer),
            )
            .await
            {
                Err(_) => return Err(DiscoveryError::Timeout),
                Ok(Err(e)) => {
                    return Err(DiscoveryError::NetworkError(format!("Socket error: {}", e)))
                }
                Ok(Ok(received)) => received,
            };

            match std::str::from_utf8(&self.buffer[..size])
                .ok()
                .and_then(parse_ssdp_response)
            {
                Some(response) => {
                    debug!(%from, location = %response.location, "SSDP response received");
                    return Ok(response);
                }
                None => trace!(%from, size, "ignoring invalid SSDP datagram"),
            }
        }
    }

    /// Local address of the search socket
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| DiscoveryError::NetworkError(e.to_string()))
    }
}

fn search_request(config: &SearchConfig) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\
         USER-AGENT: {}\r\n\
         \r\n",
        config.multicast_addr, config.mx, config.search_target, USER_AGENT
    )
}

/// Parse an SSDP response from HTTP text
pub(crate) fn parse_ssdp_response(response: &str) -> Option<SsdpResponse> {
    let mut lines = response.lines();

    let status_line = lines.next()?.trim();
    if !status_line.starts_with("HTTP/") || status_line.split_whitespace().nth(1) != Some("200") {
        return None;
    }

    let mut location = None;
    let mut urn = None;
    let mut usn = None;
    let mut server = None;

    for line in lines {
        let line = line.trim();

        if let Some(value) = extract_header_value(line, "LOCATION") {
            location = Some(value);
        } else if let Some(value) = extract_header_value(line, "ST") {
            urn = Some(value);
        } else if let Some(value) = extract_header_value(line, "USN") {
            usn = Some(value);
        } else if let Some(value) = extract_header_value(line, "SERVER") {
            server = Some(value);
        }
    }

    let location = Url::parse(&location?).ok()?;
    let usn = usn?;
    let uuid = uuid_from_usn(&usn)?;

    Some(SsdpResponse {
        location,
        uuid,
        usn,
        urn,
        server,
    })
}

/// Extract the device id from a USN such as `uuid:<id>::<urn>`
fn uuid_from_usn(usn: &str) -> Option<String> {
    let rest = usn.strip_prefix("uuid:").unwrap_or(usn);
    let id = rest.split("::").next()?.trim();

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Value of `line` if it is a non-empty `header: value` line
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    let (name, value) = line.split_once(':')?;
    let value = value.trim();

    (name.trim().eq_ignore_ascii_case(header) && !value.is_empty()).then(|| value.to_string())
}
