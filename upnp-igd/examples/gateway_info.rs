//! Probe the local network for a UPnP gateway.
//!
//! Prints every connection service of the first gateway that answers, its
//! external address, and optionally asks it to open a port mapping.
//!
//! ```text
//! cargo run -p upnp-igd --example gateway_info -- --map 8080 --protocol udp
//! IGD_LOG_MODE=debug cargo run -p upnp-igd --example gateway_info
//! ```

use clap::{Parser, ValueEnum};
use std::time::Duration;
use upnp_igd::logging;
use upnp_igd::{discover_with_config, Protocol, SearchConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProtocolArg {
    Tcp,
    Udp,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Tcp => Protocol::Tcp,
            ProtocolArg::Udp => Protocol::Udp,
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Discover a UPnP Internet Gateway Device and query it")]
struct Args {
    /// Seconds to wait for a gateway to answer the search
    #[arg(long, default_value_t = 3)]
    timeout: u64,

    /// Map this port (external and internal) on the first handle
    #[arg(long)]
    map: Option<u16>,

    /// Protocol of the mapping
    #[arg(long, value_enum, default_value_t = ProtocolArg::Tcp)]
    protocol: ProtocolArg,

    /// Mapping lifetime in seconds, 0 for indefinite
    #[arg(long, default_value_t = 3600)]
    lease: u64,

    /// Description stored with the mapping
    #[arg(long, default_value = "gateway_info")]
    description: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging_from_env()?;
    let args = Args::parse();

    let config = SearchConfig::default().with_search_timeout(Duration::from_secs(args.timeout));
    let gateways = discover_with_config(config).await?;

    if gateways.is_empty() {
        println!("Gateway found, but it offers no WAN connection service");
        return Ok(());
    }

    for igd in &gateways {
        println!(
            "{} ({})",
            igd.friendly_name().unwrap_or("unnamed connection"),
            igd.urn()
        );
        println!("  uuid:        {}", igd.uuid());
        println!("  service id:  {}", igd.service_id());
        println!("  control URL: {}", igd.control_url());

        match igd.get_external_address().await {
            Ok(address) => println!("  external IP: {}", address),
            Err(e) => println!("  external IP: unavailable ({})", e),
        }
    }

    if let Some(port) = args.map {
        let igd = &gateways[0];
        let protocol = Protocol::from(args.protocol);

        igd.add_port_mapping(
            protocol,
            port,
            port,
            &args.description,
            Duration::from_secs(args.lease),
        )
        .await?;
        println!("Mapped {} port {} via {}", protocol, port, igd.service_id());
    }

    Ok(())
}
