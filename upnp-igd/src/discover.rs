//! Gateway discovery: SSDP search, root device fetch and service matching.

use crate::error::DiscoverError;
use crate::gateway::Igd;
use crate::urn::{SchemaUrns, SchemaVersion};
use igd_discovery::{query_root_device, Device, Search, SearchConfig, Service, SsdpSearch};
use tracing::{debug, info, warn};
use url::Url;

/// Discover gateways on the local network with the default search settings.
///
/// Only the first device to answer the search is considered. The returned
/// list holds one handle per WANIPConnection or WANPPPConnection service of
/// that device and may be empty.
pub async fn discover() -> Result<Vec<Igd>, DiscoverError> {
    discover_with_config(SearchConfig::default()).await
}

/// Discover gateways using a custom SSDP search configuration
pub async fn discover_with_config(config: SearchConfig) -> Result<Vec<Igd>, DiscoverError> {
    discover_with(&SsdpSearch::new(config)).await
}

/// Discover gateways through any [`Search`] implementation
pub async fn discover_with(search: &dyn Search) -> Result<Vec<Igd>, DiscoverError> {
    let mut session = search.start().await.map_err(DiscoverError::SearchStart)?;
    let response = session.response().await.map_err(DiscoverError::NoResponse)?;

    debug!(uuid = %response.uuid, location = %response.location, "gateway candidate found");

    let root = query_root_device(&response.location)
        .await
        .map_err(DiscoverError::RootDevice)?;

    let gateways = match_gateways(&root, &response.location, &response.uuid)?;
    info!(
        uuid = %response.uuid,
        count = gateways.len(),
        "gateway discovery finished"
    );

    Ok(gateways)
}

/// Build one handle per connection service found under `root`.
pub(crate) fn match_gateways(
    root: &Device,
    location: &Url,
    uuid: &str,
) -> Result<Vec<Igd>, DiscoverError> {
    let version = SchemaVersion::from_gateway_type(&root.device_type)
        .ok_or_else(|| DiscoverError::NotAGateway(root.device_type.clone()))?;
    let urns = &SchemaUrns::for_version(version);

    let gateways = root
        .devices()
        .iter()
        .filter(|wan| wan.device_type == urns.wan_device)
        .flat_map(|wan| wan.devices())
        .filter(|conn| conn.device_type == urns.wan_connection_device)
        .flat_map(move |conn| {
            conn.services()
                .iter()
                .filter(move |service| urns.is_connection_service(&service.service_type))
                .map(move |service| (conn, service))
        })
        .filter_map(|(conn, service)| {
            let Some(url) = control_url(location, service) else {
                warn!(control_url = %service.control_url, "skipping service with unusable control URL");
                return None;
            };

            debug!(service = %service.service_type, %url, "matched connection service");
            Some(Igd::new(
                uuid.to_string(),
                conn.clone(),
                service.service_id.clone(),
                url,
                service.service_type.clone(),
            ))
        })
        .collect();

    Ok(gateways)
}

/// The location with its path and query replaced by the service's control path.
///
/// Only the path and query of an absolute control URL are kept, so requests
/// always go to the host and port that served the description. Anything but
/// plain `http` is rejected.
fn control_url(location: &Url, service: &Service) -> Option<Url> {
    if location.scheme() != "http" {
        return None;
    }

    let control = service.control_url.trim();

    let (path, query) = match Url::parse(control) {
        Ok(absolute) => {
            if absolute.scheme() != "http" {
                return None;
            }
            if absolute.host_str() != location.host_str()
                || absolute.port_or_known_default() != location.port_or_known_default()
            {
                debug!(
                    control_url = control,
                    location = %location,
                    "control URL names another host, using its path on the description host"
                );
            }
            (absolute.path().to_string(), absolute.query().map(str::to_string))
        }
        Err(_) => match control.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (control.to_string(), None),
        },
    };

    let mut url = location.clone();
    if path.starts_with('/') {
        url.set_path(&path);
    } else {
        url.set_path(&format!("/{}", path));
    }
    url.set_query(query.as_deref());
    url.set_fragment(None);

    Some(url)
}
