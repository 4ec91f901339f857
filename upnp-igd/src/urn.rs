//! Version-qualified URNs of the Internet Gateway Device schema.

const GATEWAY_PREFIX: &str = "urn:schemas-upnp-org:device:InternetGatewayDevice:";
const WAN_DEVICE_PREFIX: &str = "urn:schemas-upnp-org:device:WANDevice:";
const WAN_CONNECTION_DEVICE_PREFIX: &str = "urn:schemas-upnp-org:device:WANConnectionDevice:";
const WAN_IP_CONNECTION_PREFIX: &str = "urn:schemas-upnp-org:service:WANIPConnection:";
const WAN_PPP_CONNECTION_PREFIX: &str = "urn:schemas-upnp-org:service:WANPPPConnection:";

/// Supported IGD schema versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    /// Version of a root device type, if it is a supported gateway
    pub fn from_gateway_type(device_type: &str) -> Option<Self> {
        match device_type.trim().strip_prefix(GATEWAY_PREFIX)? {
            "1" => Some(SchemaVersion::V1),
            "2" => Some(SchemaVersion::V2),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1 => "1",
            SchemaVersion::V2 => "2",
        }
    }
}

/// URNs the device tree is matched against for one schema version
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemaUrns {
    pub wan_device: String,
    pub wan_connection_device: String,
    pub wan_ip_connection: String,
    pub wan_ppp_connection: String,
}

impl SchemaUrns {
    pub fn for_version(version: SchemaVersion) -> Self {
        let v = version.as_str();
        Self {
            wan_device: format!("{}{}", WAN_DEVICE_PREFIX, v),
            wan_connection_device: format!("{}{}", WAN_CONNECTION_DEVICE_PREFIX, v),
            wan_ip_connection: format!("{}{}", WAN_IP_CONNECTION_PREFIX, v),
            wan_ppp_connection: format!("{}{}", WAN_PPP_CONNECTION_PREFIX, v),
        }
    }

    pub fn is_connection_service(&self, service_type: &str) -> bool {
        service_type == self.wan_ip_connection || service_type == self.wan_ppp_connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("urn:schemas-upnp-org:device:InternetGatewayDevice:1", Some(SchemaVersion::V1))]
    #[case("urn:schemas-upnp-org:device:InternetGatewayDevice:2", Some(SchemaVersion::V2))]
    #[case("  urn:schemas-upnp-org:device:InternetGatewayDevice:2\n", Some(SchemaVersion::V2))]
    #[case("urn:schemas-upnp-org:device:InternetGatewayDevice:3", None)]
    #[case("urn:schemas-upnp-org:device:InternetGatewayDevice:", None)]
    #[case("urn:schemas-upnp-org:device:MediaRenderer:1", None)]
    #[case("", None)]
    fn test_gateway_version(#[case] device_type: &str, #[case] expected: Option<SchemaVersion>) {
        assert_eq!(SchemaVersion::from_gateway_type(device_type), expected);
    }

    #[test]
    fn test_urns_for_v2() {
        let urns = SchemaUrns::for_version(SchemaVersion::V2);

        assert_eq!(urns.wan_device, "urn:schemas-upnp-org:device:WANDevice:2");
        assert_eq!(urns.wan_connection_device, "urn:schemas-upnp-org:device:WANConnectionDevice:2");
        assert!(urns.is_connection_service("urn:schemas-upnp-org:service:WANIPConnection:2"));
        assert!(urns.is_connection_service("urn:schemas-upnp-org:service:WANPPPConnection:2"));
        assert!(!urns.is_connection_service("urn:schemas-upnp-org:service:WANIPConnection:1"));
    }
}
