//! Local address selection toward a gateway.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

/// The local address this host would use to reach `gateway`.
///
/// Connecting a UDP socket sends nothing; it only asks the OS routing table
/// to pick a source address.
pub(crate) async fn local_address_for(gateway: SocketAddr) -> Option<IpAddr> {
    let bind_addr: SocketAddr = match gateway {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };

    let socket = UdpSocket::bind(bind_addr).await.ok()?;
    socket.connect(gateway).await.ok()?;
    let local = socket.local_addr().ok()?.ip();

    (!local.is_unspecified()).then_some(local)
}
