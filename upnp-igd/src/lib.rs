//! UPnP Internet Gateway Device client
//!
//! This crate finds the gateway on the local network and asks it to open
//! port mappings or report its external address, using the WANIPConnection
//! and WANPPPConnection services of IGD versions 1 and 2.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use upnp_igd::{discover, Protocol};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateways = discover().await?;
//!
//! if let Some(igd) = gateways.first() {
//!     println!("external address: {}", igd.get_external_address().await?);
//!
//!     igd.add_port_mapping(Protocol::Tcp, 8080, 8080, "my app", Duration::from_secs(3600))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation
//!
//! [`Igd::stop`] aborts whatever the handle is doing and makes every later
//! operation fail with `Aborted`. Dropping the handle does the same.
//!
//! # Custom discovery
//!
//! [`discover_with`] accepts any [`Search`] implementation, which lets
//! callers supply responses from their own transport.

mod cancel;
mod discover;
mod error;
mod gateway;
pub mod logging;
mod route;
mod urn;

pub use cancel::{Aborted, Cancel, Registration};
pub use discover::{discover, discover_with, discover_with_config};
pub use error::{AddPortMappingError, DiscoverError, GetExternalAddressError};
pub use gateway::{Igd, Protocol};
pub use urn::SchemaVersion;

pub use igd_discovery::{
    Device, DiscoveryError, Search, SearchConfig, SearchSession, Service, SsdpResponse,
    SsdpSearch,
};
pub use soap_client::SoapError;
