//! Command line configuration for the server binary.
//!
//! Only the network surface is configurable. The tick period and the game
//! rules are fixed constants.

use clap::Parser;

/// Command line configuration of the volley server.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Maximum number of clients streaming state at once
    #[arg(short, long, default_value = "8")]
    pub max_subscribers: usize,
}

impl ServerConfig {
    /// The `host:port` string the UDP socket binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
