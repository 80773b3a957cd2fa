use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, UdpSocket};

/// Non-blocking UDP socket that hands out at most one datagram per call.
pub struct UdpReceiver {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

impl UdpReceiver {
    pub fn bind(addr: SocketAddr, max_datagram_size: usize) -> io::Result<Self> {
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
        // A restarted monitor can bind the port again straight away.
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;
        let socket: UdpSocket = socket.into();
        log::info!("Listening for sensor datagrams on {}", socket.local_addr()?);

        Ok(Self {
            socket,
            buffer: vec![0u8; max_datagram_size.max(1)],
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Returns `Ok(None)` when nothing is waiting.
    pub fn try_recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        match self.socket.recv_from(&mut self.buffer) {
            Ok((len, src)) => {
                log::trace!("{} bytes from {}", len, src);
                Ok(Some(self.buffer[..len].to_vec()))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}
