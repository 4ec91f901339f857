//! Test helpers for fixture-based integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

/// Load a device description fixture from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// An SSDP search response as a gateway would send it
pub fn ssdp_response(location: &str, uuid: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=120\r\n\
         EXT:\r\n\
         LOCATION: {}\r\n\
         SERVER: OpenWRT/OpenWrt UPnP/1.1 MiniUPnPd/2.2.1\r\n\
         ST: urn:schemas-upnp-org:device:InternetGatewayDevice:1\r\n\
         USN: uuid:{}::urn:schemas-upnp-org:device:InternetGatewayDevice:1\r\n\r\n",
        location, uuid
    )
}
