//! Device description parsing.
//!
//! This module turns a UPnP device description document into an immutable
//! tree of [`Device`] nodes, each carrying its embedded devices and
//! services in document order.

use crate::error::{DiscoveryError, Result};
use serde::Deserialize;
use soap_client::{check_depth, MAX_XML_DEPTH};

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
struct Root {
    device: Device,
}

/// One node of a device description tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device type URN, e.g. `urn:schemas-upnp-org:device:WANDevice:1`
    pub device_type: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(rename = "UDN", default)]
    pub udn: Option<String>,
    #[serde(default)]
    device_list: DeviceList,
    #[serde(default)]
    service_list: ServiceList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct DeviceList {
    #[serde(rename = "device", default)]
    devices: Vec<Device>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct ServiceList {
    #[serde(rename = "service", default)]
    services: Vec<Service>,
}

/// A service advertised by a device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service type URN, e.g. `urn:schemas-upnp-org:service:WANIPConnection:1`
    pub service_type: String,
    /// Service identifier, e.g. `urn:upnp-org:serviceId:WANIPConn1`
    #[serde(default)]
    pub service_id: String,
    /// Path (or absolute URL) accepting SOAP control requests
    #[serde(rename = "controlURL", default)]
    pub control_url: String,
    #[serde(rename = "SCPDURL", default)]
    pub scpd_url: Option<String>,
    #[serde(rename = "eventSubURL", default)]
    pub event_sub_url: Option<String>,
}

impl Device {
    /// Parse the root device of a description document.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the XML is malformed, nests
    /// deeper than [`MAX_XML_DEPTH`] or the root device lacks a device type.
    pub fn from_xml(xml: &str) -> Result<Self> {
        check_depth(xml, MAX_XML_DEPTH).map_err(|e| {
            DiscoveryError::ParseError(format!("Rejected device XML: {}", e))
        })?;

        let root: Root = quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))?;

        Ok(root.device)
    }

    /// Embedded devices, in document order
    pub fn devices(&self) -> &[Device] {
        &self.device_list.devices
    }

    /// Services of this device, in document order
    pub fn services(&self) -> &[Service] {
        &self.service_list.services
    }
}
