// UDP Transport über embassy-net
//
// Der ControlLoop ist synchron und darf nicht warten. Statt `send_to().await`
// werden die poll-Varianten des Sockets mit einem No-op Waker benutzt:
// `Pending` heißt dann "Puffer voll" bzw. "nichts empfangen".

use core::task::{Context, Poll, Waker};

use embassy_net::udp::{BindError, PacketMetadata, SendError, UdpSocket};
use embassy_net::{IpAddress, IpEndpoint, Stack};
use esp_core::{DatagramTransport, Endpoint, TransportError};

/// Statische Puffer für einen UDP-Socket
pub struct UdpBuffers<const SIZE: usize, const META: usize> {
    pub rx_meta: [PacketMetadata; META],
    pub rx: [u8; SIZE],
    pub tx_meta: [PacketMetadata; META],
    pub tx: [u8; SIZE],
}

impl<const SIZE: usize, const META: usize> UdpBuffers<SIZE, META> {
    pub const fn new() -> Self {
        Self {
            rx_meta: [PacketMetadata::EMPTY; META],
            rx: [0; SIZE],
            tx_meta: [PacketMetadata::EMPTY; META],
            tx: [0; SIZE],
        }
    }
}

impl<const SIZE: usize, const META: usize> Default for UdpBuffers<SIZE, META> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct UdpTransport {
    socket: UdpSocket<'static>,
}

impl UdpTransport {
    /// Öffnet den Socket und bindet ihn an `local_port`
    pub fn bind<const SIZE: usize, const META: usize>(
        stack: Stack<'static>,
        buffers: &'static mut UdpBuffers<SIZE, META>,
        local_port: u16,
    ) -> Result<Self, BindError> {
        let mut socket = UdpSocket::new(
            stack,
            &mut buffers.rx_meta,
            &mut buffers.rx,
            &mut buffers.tx_meta,
            &mut buffers.tx,
        );
        socket.bind(local_port)?;
        Ok(Self { socket })
    }
}

impl DatagramTransport for UdpTransport {
    fn send_to(&mut self, endpoint: &Endpoint, payload: &[u8]) -> Result<(), TransportError> {
        let remote = IpEndpoint::new(IpAddress::Ipv4(endpoint.ip), endpoint.port);
        let mut cx = Context::from_waker(Waker::noop());

        match self.socket.poll_send_to(payload, remote, &mut cx) {
            Poll::Ready(Ok(())) => Ok(()),
            Poll::Ready(Err(SendError::NoRoute)) => Err(TransportError::NoRoute),
            Poll::Ready(Err(_)) => Err(TransportError::SendFailed),
            Poll::Pending => Err(TransportError::BufferFull),
        }
    }

    fn try_receive(&mut self, buffer: &mut [u8]) -> Option<usize> {
        let mut cx = Context::from_waker(Waker::noop());

        match self.socket.poll_recv_from(buffer, &mut cx) {
            Poll::Ready(Ok((len, _meta))) => Some(len),
            // Zu lang für den Puffer: trotzdem aus der Queue genommen
            Poll::Ready(Err(_)) => Some(buffer.len()),
            Poll::Pending => None,
        }
    }
}
