//! # Volley Server Library
//!
//! Authoritative server for a two-paddle volley game. The server owns the only
//! live copy of the match, advances it at a fixed cadence, and accepts player
//! commands from any number of clients over UDP.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! The ball, both paddles, the scores and the match flags live in a single
//! [`game::GameState`]. Clients never hold state of their own; they send
//! commands and read back snapshots.
//!
//! ### Serialized Access
//! The simulation driver and every incoming command go through one
//! [`simulation::Simulation`] handle. Each tick (computer paddle, physics,
//! scoring and the rally reset that may follow) and each command is a single
//! critical section, so no caller can observe a half-applied update.
//!
//! ### State Streaming
//! Besides answering one-off state queries, the server pushes every frame to
//! clients that subscribed, dropping the ones that go silent.
//!
//! ## Module Organization
//!
//! - `physics`: ball integration, wall and paddle collisions, out-of-bounds detection
//! - `ai`: the rule-based right paddle and its difficulty profiles
//! - `game`: scoring, win detection and the menu/play/pause/game-over transitions
//! - `simulation`: the mutex-guarded handle shared by the driver and the network
//! - `driver`: the fixed 16ms tick loop
//! - `network`: UDP request handling and frame broadcasting
//! - `subscribers`: bookkeeping for streaming clients
//! - `config`: command line options
//! - `supervisor`: shutdown coordination between the driver and network tasks
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::driver::SimulationDriver;
//! use server::network::Server;
//! use server::simulation::Simulation;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let simulation = Simulation::new();
//!     let (driver, frames) = SimulationDriver::new(simulation.clone()).await;
//!     let (_shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//!     tokio::spawn(driver.run(shutdown_rx.clone()));
//!
//!     let server = Server::bind("127.0.0.1:8080", simulation, 8).await?;
//!     server.run(frames, shutdown_rx).await;
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod config;
pub mod driver;
pub mod game;
pub mod network;
pub mod physics;
pub mod simulation;
pub mod subscribers;
pub mod supervisor;
