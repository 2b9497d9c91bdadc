//! Request/reply exchange with the volley server over UDP.

use log::{debug, warn};
use shared::{decode, encode, MatchState, Packet, ProtocolError, MAX_PACKET_SIZE};
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::time::{timeout, Duration};

/// How long to wait for the server before giving up on a request.
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(1);

pub struct CommandClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
}

impl CommandClient {
    pub async fn new(server_addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;
        debug!("Client socket bound to {}", socket.local_addr()?);

        Ok(CommandClient {
            socket,
            server_addr,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub async fn send(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = encode(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    /// Sends raw bytes, bypassing encoding.
    pub async fn send_raw(&self, data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        self.socket.send_to(data, self.server_addr).await?;
        Ok(())
    }

    /// Waits up to [`REPLY_TIMEOUT`] for the next packet from the server.
    pub async fn receive(&self) -> Result<Packet, Box<dyn std::error::Error>> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];

        loop {
            let (len, addr) = timeout(REPLY_TIMEOUT, self.socket.recv_from(&mut buffer)).await??;
            if addr != self.server_addr {
                warn!("Ignoring packet from unknown peer {}", addr);
                continue;
            }
            return Ok(decode(&buffer[..len])?);
        }
    }

    pub async fn request(&self, packet: &Packet) -> Result<Packet, Box<dyn std::error::Error>> {
        self.send(packet).await?;
        self.receive().await
    }

    /// Fetches the current tick and match state.
    pub async fn state(&self) -> Result<(u64, MatchState), Box<dyn std::error::Error>> {
        match self.request(&Packet::GetState).await? {
            Packet::State { tick, state } => Ok((tick, state)),
            Packet::Rejected { reason } => Err(format!("server rejected request: {}", reason).into()),
            other => Err(ProtocolError::Unexpected(other.kind()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_server_address() {
        let result = tokio_test::block_on(CommandClient::new("not-an-address"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_request_times_out_when_server_is_silent() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = silent.local_addr().unwrap().to_string();
        let client = CommandClient::new(&addr).await.unwrap();

        let started = std::time::Instant::now();
        assert!(client.request(&Packet::GetState).await.is_err());
        assert!(started.elapsed() >= REPLY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_state_reads_reply() {
        let fake_server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let client = CommandClient::new(&fake_server.local_addr().unwrap().to_string())
            .await
            .unwrap();

        let responder = tokio::spawn(async move {
            let mut buffer = [0u8; MAX_PACKET_SIZE];
            let (len, from) = fake_server.recv_from(&mut buffer).await.unwrap();
            assert_eq!(decode(&buffer[..len]).unwrap(), Packet::GetState);
            let reply = encode(&Packet::State {
                tick: 7,
                state: MatchState::new(),
            })
            .unwrap();
            fake_server.send_to(&reply, from).await.unwrap();
        });

        let (tick, state) = client.state().await.unwrap();
        assert_eq!(tick, 7);
        assert!(state.in_menu);
        responder.await.unwrap();
    }
}
