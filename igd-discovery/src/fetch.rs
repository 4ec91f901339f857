//! Root device description retrieval.

use crate::device::Device;
use crate::error::{DiscoveryError, Result};
use soap_client::{read_body, USER_AGENT};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Deadline covering connect and transfer of a description document
pub const DESCRIPTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Largest description document accepted
pub const MAX_DESCRIPTION_BYTES: usize = 256 * 1024;

/// Fetch and parse the device description published at `url`.
///
/// No retry is attempted: any connection failure, non-OK status, body larger
/// than [`MAX_DESCRIPTION_BYTES`] or unparseable body fails the call.
pub async fn query_root_device(url: &Url) -> Result<Device> {
    let host = url
        .host_str()
        .ok_or_else(|| DiscoveryError::ParseError(format!("No host in location {}", url)))?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let client = reqwest::Client::builder()
        .timeout(DESCRIPTION_TIMEOUT)
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()?;

    let response = client
        .get(url.clone())
        .header("HOST", host)
        .header("USER-AGENT", USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        debug!(%url, %status, "device description request rejected");
        return Err(DiscoveryError::UnexpectedStatus(status.as_u16()));
    }

    let xml = read_body(response, MAX_DESCRIPTION_BYTES).await?;
    Device::from_xml(&xml)
}
