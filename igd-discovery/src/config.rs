//! Configuration for SSDP gateway search
//!
//! Controls where the `M-SEARCH` request goes, what it asks for and how
//! long a search session waits for answers.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// Standard SSDP multicast group and port
pub const SSDP_MULTICAST_ADDR: SocketAddrV4 =
    SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900);

/// Search target for Internet Gateway Devices.
///
/// Version 2 gateways answer version 1 searches, so one target covers both.
pub const IGD_SEARCH_TARGET: &str = "urn:schemas-upnp-org:device:InternetGatewayDevice:1";

/// Configuration for an SSDP search session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Local address the search socket binds to
    /// Default: 0.0.0.0:0
    pub bind_addr: SocketAddr,

    /// Destination of the `M-SEARCH` request
    /// Default: 239.255.255.250:1900
    pub multicast_addr: SocketAddr,

    /// Value of the `ST` header
    /// Default: InternetGatewayDevice:1
    pub search_target: String,

    /// Maximum response delay devices may apply, in seconds (`MX` header)
    /// Default: 2
    pub mx: u8,

    /// How long a session waits for a response
    /// Default: 3 seconds
    pub search_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            multicast_addr: SocketAddr::V4(SSDP_MULTICAST_ADDR),
            search_target: IGD_SEARCH_TARGET.to_string(),
            mx: 2,
            search_timeout: Duration::from_secs(3),
        }
    }
}

impl SearchConfig {
    /// Create a new SearchConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time a session waits for a response
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Send the search to a specific address instead of the multicast group
    pub fn with_multicast_addr(mut self, addr: SocketAddr) -> Self {
        self.multicast_addr = addr;
        self
    }

    /// Bind the search socket to a specific local address
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Search for a different device or service type
    pub fn with_search_target(mut self, target: impl Into<String>) -> Self {
        self.search_target = target.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.search_timeout.is_zero() {
            return Err("search_timeout must be greater than zero".to_string());
        }

        if self.mx == 0 {
            return Err("mx must be at least 1".to_string());
        }

        if self.search_target.trim().is_empty() {
            return Err("search_target must not be empty".to_string());
        }

        Ok(())
    }
}
