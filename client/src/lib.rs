//! # Volley Command Client
//!
//! Terminal counterpart of the volley server. Each invocation sends one
//! command (or subscribes to the live state stream) and prints what the
//! server answers.
//!
//! ## Module Organization
//!
//! - `cli`: command line arguments and the request each action maps to
//! - `network`: UDP request/reply handling with a bounded wait per reply
//! - `display`: human-readable one-line match summaries
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::CommandClient;
//! use shared::Packet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CommandClient::new("127.0.0.1:8080").await?;
//!
//!     client
//!         .request(&Packet::StartMatch {
//!             game_mode: "ai".to_string(),
//!             difficulty: "hard".to_string(),
//!         })
//!         .await?;
//!
//!     let (tick, state) = client.state().await?;
//!     println!("{}", client::display::describe(tick, &state));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod display;
pub mod network;
