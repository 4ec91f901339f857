//! UPnP Internet Gateway Device discovery
//!
//! This crate provides the collaborators gateway matching builds on:
//! an SSDP search for Internet Gateway Devices, the device description tree
//! and the HTTP fetch of a root device description.
//!
//! # Quick Start
//!
//! ```no_run
//! use igd_discovery::{query_root_device, Search, SearchConfig, SsdpSearch};
//!
//! # async fn example() -> igd_discovery::Result<()> {
//! let search = SsdpSearch::new(SearchConfig::default());
//! let mut session = search.start().await?;
//! let response = session.response().await?;
//!
//! let root = query_root_device(&response.location).await?;
//! println!("{} is a {}", response.uuid, root.device_type);
//! # Ok(())
//! # }
//! ```

mod config;
pub mod device;
mod error;
mod fetch;
mod search;
mod ssdp;

pub use config::{SearchConfig, IGD_SEARCH_TARGET, SSDP_MULTICAST_ADDR};
pub use device::{Device, Service};
pub use error::{DiscoveryError, Result};
pub use fetch::{query_root_device, DESCRIPTION_TIMEOUT, MAX_DESCRIPTION_BYTES};
pub use search::{Search, SearchSession, SsdpSearch};
pub use ssdp::{SsdpResponse, SsdpSession};
