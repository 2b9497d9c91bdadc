//! UDP front end: decodes requests, applies them to the simulation, replies,
//! and streams frames to subscribers.

use crate::game::Command;
use crate::simulation::{Simulation, StateFrame};
use crate::subscribers::{SubscriberRoster, Subscription, SUBSCRIBER_TIMEOUT};
use log::{debug, error, info, warn};
use shared::{
    decode, encode, Difficulty, Direction, GameMode, Packet, ProtocolError, Side, MAX_PACKET_SIZE,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration};

/// A request after its string fields have been validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetState,
    Command(Command),
    /// Well-formed but names nothing the simulation knows (an unknown paddle).
    Ignored,
    Subscribe,
    Unsubscribe,
}

impl Request {
    /// Validates a decoded packet. Packets that only the server sends are
    /// refused as [`ProtocolError::Unexpected`].
    pub fn from_packet(packet: Packet) -> Result<Self, ProtocolError> {
        let request = match packet {
            Packet::GetState => Request::GetState,
            Packet::MovePaddle { side, direction } => match Side::parse(&side) {
                Some(side) => Request::Command(Command::MovePaddle {
                    side,
                    direction: Direction::parse(&direction),
                }),
                None => Request::Ignored,
            },
            Packet::TogglePause => Request::Command(Command::TogglePause),
            Packet::ResetMatch => Request::Command(Command::ResetMatch),
            Packet::StartMatch {
                game_mode,
                difficulty,
            } => Request::Command(Command::StartMatch {
                mode: GameMode::parse(&game_mode),
                difficulty: Difficulty::parse(&difficulty),
            }),
            Packet::ReturnToMenu => Request::Command(Command::ReturnToMenu),
            Packet::Subscribe => Request::Subscribe,
            Packet::Unsubscribe => Request::Unsubscribe,
            other => return Err(ProtocolError::Unexpected(other.kind())),
        };
        Ok(request)
    }
}

/// The UDP face of the simulation.
///
/// Every datagram gets exactly one reply: `State` for state queries, `Ack`
/// for commands and subscription changes, `Rejected` for anything that fails
/// to decode or is not a request. Subscribers additionally receive every
/// frame the driver publishes.
pub struct Server {
    /// Shared with the broadcaster task.
    socket: Arc<UdpSocket>,
    /// Handle to the authoritative match.
    simulation: Simulation,
    /// Clients receiving the frame stream, shared with the timeout checker.
    subscribers: Arc<RwLock<SubscriberRoster>>,
}

impl Server {
    /// Binds the UDP socket on `addr`. Nothing is received until
    /// [`Server::run`] is called.
    ///
    /// Accepts at most `max_subscribers` streaming clients at a time.
    pub async fn bind(
        addr: &str,
        simulation: Simulation,
        max_subscribers: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        Ok(Server {
            socket,
            simulation,
            subscribers: Arc::new(RwLock::new(SubscriberRoster::new(max_subscribers))),
        })
    }

    /// The address actually bound, useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sends every new frame to all subscribers.
    fn spawn_frame_broadcaster(&self, mut frames: watch::Receiver<StateFrame>) -> JoinHandle<()> {
        let socket = Arc::clone(&self.socket);
        let subscribers = Arc::clone(&self.subscribers);

        tokio::spawn(async move {
            while frames.changed().await.is_ok() {
                let frame = frames.borrow_and_update().clone();

                let addrs = subscribers.read().await.addrs();
                if addrs.is_empty() {
                    continue;
                }

                let packet = Packet::State {
                    tick: frame.tick,
                    state: frame.state,
                };
                let data = match encode(&packet) {
                    Ok(data) => data,
                    Err(e) => {
                        error!("Failed to encode frame {}: {}", frame.tick, e);
                        continue;
                    }
                };

                for addr in addrs {
                    if let Err(e) = socket.send_to(&data, addr).await {
                        error!("Failed to send frame to {}: {}", addr, e);
                    }
                }
            }
        })
    }

    /// Drops subscribers that have gone quiet.
    fn spawn_timeout_checker(&self) -> JoinHandle<()> {
        let subscribers = Arc::clone(&self.subscribers);

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));

            loop {
                ticker.tick().await;
                let expired = subscribers.write().await.expire(SUBSCRIBER_TIMEOUT);
                if !expired.is_empty() {
                    debug!("{} subscriber(s) expired", expired.len());
                }
            }
        })
    }

    async fn send_packet(&self, packet: &Packet, addr: SocketAddr) {
        let result = match encode(packet) {
            Ok(data) => self.socket.send_to(&data, addr).await.map(|_| ()),
            Err(e) => {
                error!("Failed to encode {} for {}: {}", packet.kind(), addr, e);
                return;
            }
        };

        if let Err(e) = result {
            error!("Failed to send {} to {}: {}", packet.kind(), addr, e);
        }
    }

    async fn handle_datagram(&self, bytes: &[u8], addr: SocketAddr) {
        self.subscribers.write().await.touch(&addr);

        let response = match decode(bytes).and_then(Request::from_packet) {
            Ok(request) => self.respond(request, addr).await,
            Err(e) => {
                warn!("Rejected datagram from {}: {}", addr, e);
                Packet::Rejected {
                    reason: e.to_string(),
                }
            }
        };

        self.send_packet(&response, addr).await;
    }

    /// Carries out a validated request and builds the reply for `addr`.
    pub async fn respond(&self, request: Request, addr: SocketAddr) -> Packet {
        match request {
            Request::GetState => {
                let frame = self.simulation.frame().await;
                Packet::State {
                    tick: frame.tick,
                    state: frame.state,
                }
            }
            Request::Command(command) => {
                self.simulation.apply(command).await;
                Packet::Ack
            }
            Request::Ignored => {
                debug!("Ignoring request from {} for an unknown paddle", addr);
                Packet::Ack
            }
            Request::Subscribe => match self.subscribers.write().await.subscribe(addr) {
                Subscription::Full => Packet::Rejected {
                    reason: "Server full".to_string(),
                },
                Subscription::Added | Subscription::Refreshed => Packet::Ack,
            },
            Request::Unsubscribe => {
                self.subscribers.write().await.unsubscribe(&addr);
                Packet::Ack
            }
        }
    }

    /// Serves requests until `shutdown` carries `true` or its sender is dropped.
    pub async fn run(&self, frames: watch::Receiver<StateFrame>, mut shutdown: watch::Receiver<bool>) {
        let broadcaster = self.spawn_frame_broadcaster(frames);
        let timeout_checker = self.spawn_timeout_checker();
        let mut buffer = [0u8; MAX_PACKET_SIZE];

        info!("Server started successfully");

        loop {
            tokio::select! {
                received = self.socket.recv_from(&mut buffer) => match received {
                    Ok((len, addr)) => self.handle_datagram(&buffer[..len], addr).await,
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        sleep(Duration::from_millis(10)).await;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        broadcaster.abort();
        timeout_checker.abort();
        info!("Server shutting down");
    }
}
