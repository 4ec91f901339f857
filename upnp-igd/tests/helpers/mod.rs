//! Shared helpers for gateway integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use mockito::{Server, ServerGuard};
use std::fs;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use upnp_igd::{discover_with, DiscoveryError, Igd, Search, SearchSession, SsdpResponse};
use url::Url;

pub const GATEWAY_UUID: &str = "a1b2c3d4-0000-1000-8000-00163e5c0a01";

/// Load a device description fixture from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Search that answers with canned results instead of touching the network
pub struct FakeSearch {
    start: Result<(), DiscoveryError>,
    response: Result<SsdpResponse, DiscoveryError>,
}

impl FakeSearch {
    /// A search whose first responder publishes its description at `location`
    pub fn responding(location: &str, uuid: &str) -> Self {
        Self {
            start: Ok(()),
            response: Ok(SsdpResponse {
                location: Url::parse(location).unwrap(),
                uuid: uuid.to_string(),
                usn: format!(
                    "uuid:{}::urn:schemas-upnp-org:device:InternetGatewayDevice:1",
                    uuid
                ),
                urn: Some("urn:schemas-upnp-org:device:InternetGatewayDevice:1".to_string()),
                server: None,
            }),
        }
    }

    pub fn failing_to_start(error: DiscoveryError) -> Self {
        Self {
            start: Err(error),
            response: Err(DiscoveryError::Timeout),
        }
    }

    pub fn silent() -> Self {
        Self {
            start: Ok(()),
            response: Err(DiscoveryError::Timeout),
        }
    }
}

struct FakeSession {
    response: Result<SsdpResponse, DiscoveryError>,
}

#[async_trait]
impl Search for FakeSearch {
    async fn start(&self) -> Result<Box<dyn SearchSession>, DiscoveryError> {
        self.start.clone()?;
        Ok(Box::new(FakeSession {
            response: self.response.clone(),
        }))
    }
}

#[async_trait]
impl SearchSession for FakeSession {
    async fn response(&mut self) -> Result<SsdpResponse, DiscoveryError> {
        self.response.clone()
    }
}

/// Serve `description` at `/rootDesc.xml` on a fresh mock server
pub async fn gateway_server(description: String) -> ServerGuard {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rootDesc.xml")
        .with_status(200)
        .with_header("content-type", "text/xml; charset=\"utf-8\"")
        .with_body(description)
        .create_async()
        .await;
    server
}

/// Discover through a fake search pointed at `server`
pub async fn discover_from(server: &ServerGuard) -> Vec<Igd> {
    let location = format!("{}/rootDesc.xml", server.url());
    discover_with(&FakeSearch::responding(&location, GATEWAY_UUID))
        .await
        .expect("discovery should succeed")
}

/// Discover through a fake search whose responder publishes `location`
pub async fn discover_at(location: &str) -> Vec<Igd> {
    discover_with(&FakeSearch::responding(location, GATEWAY_UUID))
        .await
        .expect("discovery should succeed")
}

/// A gateway that serves `description` to every GET and never answers
/// anything else. Unanswered connections are handed to the receiver, which
/// keeps them open.
pub async fn silent_gateway(description: String) -> (String, UnboundedReceiver<TcpStream>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let location = format!("http://{}/rootDesc.xml", listener.local_addr().unwrap());
    let (held_tx, held_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let held_tx = held_tx.clone();
            let description = description.clone();
            tokio::spawn(async move {
                if read_request_head(&mut socket).await.starts_with("GET ") {
                    write_description(&mut socket, &description).await;
                } else {
                    let _ = held_tx.send(socket);
                }
            });
        }
    });

    (location, held_rx)
}

/// A gateway that serves `description` once and then stops listening, so
/// every later connection is refused
pub async fn one_shot_gateway(description: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let location = format!("http://{}/rootDesc.xml", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        drop(listener);
        read_request_head(&mut socket).await;
        write_description(&mut socket, &description).await;
    });

    location
}

async fn read_request_head(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

async fn write_description(socket: &mut TcpStream, description: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        description.len(),
        description
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// The single WANIPConnection:1 handle of the v1 fixture, served by `server`
pub async fn v1_gateway(server: &mut ServerGuard) -> Igd {
    let location = format!("{}/rootDesc.xml", server.url());
    server
        .mock("GET", "/rootDesc.xml")
        .with_status(200)
        .with_body(load_fixture("igd_v1.xml"))
        .create_async()
        .await;

    let mut gateways = discover_with(&FakeSearch::responding(&location, GATEWAY_UUID))
        .await
        .expect("discovery should succeed");
    assert_eq!(gateways.len(), 1);
    gateways.remove(0)
}

/// A SOAP response envelope for `action` with `inner` as its arguments
pub fn soap_response(action: &str, inner: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body>
<u:{action}Response xmlns:u="urn:schemas-upnp-org:service:WANIPConnection:1">{inner}</u:{action}Response>
</s:Body>
</s:Envelope>"#
    )
}

/// A UPnP fault envelope carrying `code`
pub fn soap_fault(code: u16, description: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body>
<s:Fault>
<faultcode>s:Client</faultcode>
<faultstring>UPnPError</faultstring>
<detail>
<UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
<errorCode>{code}</errorCode>
<errorDescription>{description}</errorDescription>
</UPnPError>
</detail>
</s:Fault>
</s:Body>
</s:Envelope>"#
    )
}
