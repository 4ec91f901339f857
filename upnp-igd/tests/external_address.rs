//! GetExternalIPAddress requests against a mock gateway

mod helpers;

use helpers::{soap_fault, soap_response, v1_gateway};
use mockito::Server;
use rstest::rstest;
use std::net::{IpAddr, Ipv4Addr};
use upnp_igd::{GetExternalAddressError, SoapError};

const GET_EXTERNAL_IP_ACTION: &str =
    "\"urn:schemas-upnp-org:service:WANIPConnection:1#GetExternalIPAddress\"";

#[tokio::test]
async fn test_external_address_is_returned() {
    let mut server = Server::new_async().await;
    let igd = v1_gateway(&mut server).await;

    let mock = server
        .mock("POST", "/ctl/IPConn")
        .match_header("soapaction", GET_EXTERNAL_IP_ACTION)
        .match_header("connection", "Close")
        .with_status(200)
        .with_body(soap_response(
            "GetExternalIPAddress",
            "<NewExternalIPAddress>203.0.113.5</NewExternalIPAddress>",
        ))
        .create_async()
        .await;

    let address = igd.get_external_address().await;

    assert_eq!(address, Ok(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 5))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_every_call_is_a_round_trip() {
    let mut server = Server::new_async().await;
    let igd = v1_gateway(&mut server).await;

    let mock = server
        .mock("POST", "/ctl/IPConn")
        .with_status(200)
        .with_body(soap_response(
            "GetExternalIPAddress",
            "<NewExternalIPAddress>198.51.100.7</NewExternalIPAddress>",
        ))
        .expect(2)
        .create_async()
        .await;

    assert!(igd.get_external_address().await.is_ok());
    assert!(igd.get_external_address().await.is_ok());
    mock.assert_async().await;
}

#[rstest]
#[case(
    soap_response("GetExternalIPAddress", ""),
    GetExternalAddressError::MissingField
)]
#[case(
    soap_response("GetExternalIPAddress", "<NewExternalIPAddress>abc</NewExternalIPAddress>"),
    GetExternalAddressError::InvalidValue("abc".to_string())
)]
#[case(
    soap_response("AddPortMapping", "<NewExternalIPAddress>203.0.113.5</NewExternalIPAddress>"),
    GetExternalAddressError::MissingField
)]
#[case(soap_fault(501, "ActionFailed"), GetExternalAddressError::MissingField)]
#[case(
    "<s:Envelope><s:Body>".to_string(),
    GetExternalAddressError::MalformedBody
)]
#[case(String::new(), GetExternalAddressError::MalformedBody)]
#[tokio::test]
async fn test_bad_response_bodies(
    #[case] body: String,
    #[case] expected: GetExternalAddressError,
) {
    let mut server = Server::new_async().await;
    let igd = v1_gateway(&mut server).await;

    server
        .mock("POST", "/ctl/IPConn")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    assert_eq!(igd.get_external_address().await, Err(expected));
}

#[tokio::test]
async fn test_non_ok_status_is_reported() {
    let mut server = Server::new_async().await;
    let igd = v1_gateway(&mut server).await;

    server
        .mock("POST", "/ctl/IPConn")
        .with_status(500)
        .with_body(soap_fault(501, "ActionFailed"))
        .create_async()
        .await;

    assert_eq!(
        igd.get_external_address().await,
        Err(GetExternalAddressError::UnexpectedStatus(500))
    );
}

#[tokio::test]
async fn test_oversized_response_is_transport_failure() {
    let mut server = Server::new_async().await;
    let igd = v1_gateway(&mut server).await;

    let padding = " ".repeat(soap_client::MAX_RESPONSE_BYTES + 1);
    server
        .mock("POST", "/ctl/IPConn")
        .with_status(200)
        .with_body(format!(
            "{}{}",
            padding,
            soap_response(
                "GetExternalIPAddress",
                "<NewExternalIPAddress>203.0.113.5</NewExternalIPAddress>",
            )
        ))
        .create_async()
        .await;

    assert!(matches!(
        igd.get_external_address().await,
        Err(GetExternalAddressError::TransportFailed(SoapError::Parse(_)))
    ));
}

#[tokio::test]
async fn test_deeply_nested_response_is_malformed() {
    let mut server = Server::new_async().await;
    let igd = v1_gateway(&mut server).await;

    let depth = 5_000;
    server
        .mock("POST", "/ctl/IPConn")
        .with_status(200)
        .with_body(soap_response(
            "GetExternalIPAddress",
            &format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth)),
        ))
        .create_async()
        .await;

    assert_eq!(
        igd.get_external_address().await,
        Err(GetExternalAddressError::MalformedBody)
    );
}
