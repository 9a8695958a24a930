//! Reference UDP multicast [`Provider`]: `udpm://host:port`.
//!
//! Grounded in `summitd::capability::{broadcast, listener}`'s
//! join/send/recv pattern, transposed from the teacher's IPv6
//! link-local scheme to spec.md's IPv4 example address
//! (`239.255.76.67:7667`). The socket itself is built with `socket2`
//! exactly the way `make_multicast_socket`/`make_listener_socket` in
//! those two teacher files do — construct via `socket2::Socket`, set
//! every option before anything touches the wire, then hand the
//! result to `std::net::UdpSocket` for the actual send/recv calls.
//! `handle` blocks on `recv_from` — this is deliberate:
//! `Runtime::timed_handle` wraps it in `tokio::task::spawn_blocking`
//! rather than this provider pretending to be async.
//!
//! Raw UDP has no channel concept, so each datagram carries a small
//! transport sub-header ahead of the wire frame: `u16 channel_len ‖
//! channel_bytes ‖ frame`. This is the "provider may further frame"
//! allowance from spec.md §6. A publish that would not fit in one
//! datagram is rejected with `Error::Transport` rather than
//! fragmented — fragmentation/reassembly is explicitly out of scope.

use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};
use std::os::unix::io::{AsRawFd, RawFd};

use socket2::{Domain, Protocol, Socket, Type};

use ripple_core::{Error, ParsedUrl};

use crate::provider::Provider;
use crate::registry::Registry;

pub const DEFAULT_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 76, 67);
pub const DEFAULT_PORT: u16 = 7667;

/// Largest IPv4 UDP payload that's safe to send without local
/// fragmentation on typical MTUs.
const MAX_DATAGRAM: usize = 65_507;

pub struct UdpMulticastProvider {
    socket: UdpSocket,
    multicast_addr: SocketAddrV4,
}

impl UdpMulticastProvider {
    fn default_target() -> SocketAddrV4 {
        SocketAddrV4::new(DEFAULT_MULTICAST_ADDR, DEFAULT_PORT)
    }
}

impl Provider for UdpMulticastProvider {
    fn create(url: &ParsedUrl) -> Result<Self, Error> {
        let target = match &url.target {
            Some(t) => t.parse::<SocketAddrV4>().map_err(|e| Error::Url(format!("invalid udpm target {t:?}: {e}")))?,
            None => Self::default_target(),
        };

        let socket = make_multicast_socket(target.port(), *target.ip())?;

        tracing::info!(target = %target, "udpm provider joined multicast group");

        Ok(Self {
            socket,
            multicast_addr: target,
        })
    }

    fn publish(&self, channel: &str, bytes: &[u8]) -> Result<(), Error> {
        let datagram = encode_datagram(channel, bytes)?;
        self.socket
            .send_to(&datagram, self.multicast_addr)
            .map_err(|e| Error::Transport(format!("send_to failed: {e}")))?;
        Ok(())
    }

    fn handle(&self, registry: &Registry) -> Result<(), Error> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let (len, _from) = self
            .socket
            .recv_from(&mut buf)
            .map_err(|e| Error::Transport(format!("recv_from failed: {e}")))?;

        match decode_datagram(&buf[..len]) {
            Some((channel, frame)) => registry.dispatch(channel, frame),
            None => tracing::warn!("dropped malformed udpm datagram"),
        }
        Ok(())
    }

    fn fileno(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

/// Builds a UDP socket bound to `port` and joined to `group`, the way
/// `summitd::capability::listener::make_listener_socket` builds its
/// IPv6 one: a `socket2::Socket` for the option calls, converted to a
/// plain `std::net::UdpSocket` once it's ready to send and receive.
fn make_multicast_socket(port: u16, group: Ipv4Addr) -> Result<UdpSocket, Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| Error::Transport(format!("socket() failed: {e}")))?;
    socket
        .set_reuse_address(true)
        .map_err(|e| Error::Transport(format!("SO_REUSEADDR failed: {e}")))?;

    let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    socket
        .bind(&bind_addr.into())
        .map_err(|e| Error::Transport(format!("bind failed: {e}")))?;
    socket
        .join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)
        .map_err(|e| Error::Transport(format!("IP_ADD_MEMBERSHIP failed: {e}")))?;
    // So a process can see its own publishes when it also subscribes.
    socket
        .set_multicast_loop_v4(true)
        .map_err(|e| Error::Transport(format!("set_multicast_loop_v4 failed: {e}")))?;

    Ok(socket.into())
}

fn encode_datagram(channel: &str, frame: &[u8]) -> Result<Vec<u8>, Error> {
    let total = 2 + channel.len() + frame.len();
    if total > MAX_DATAGRAM {
        return Err(Error::Transport(format!(
            "frame for channel {channel:?} ({} bytes) exceeds the single-datagram limit of {MAX_DATAGRAM}; fragmentation is out of scope",
            frame.len()
        )));
    }
    if channel.len() > u16::MAX as usize {
        return Err(Error::Transport(format!("channel name {channel:?} is too long to frame")));
    }

    let mut datagram = Vec::with_capacity(total);
    datagram.extend_from_slice(&(channel.len() as u16).to_be_bytes());
    datagram.extend_from_slice(channel.as_bytes());
    datagram.extend_from_slice(frame);
    Ok(datagram)
}

fn decode_datagram(datagram: &[u8]) -> Option<(&str, &[u8])> {
    if datagram.len() < 2 {
        return None;
    }
    let channel_len = u16::from_be_bytes([datagram[0], datagram[1]]) as usize;
    if datagram.len() < 2 + channel_len {
        return None;
    }
    let channel = std::str::from_utf8(&datagram[2..2 + channel_len]).ok()?;
    Some((channel, &datagram[2 + channel_len..]))
}
