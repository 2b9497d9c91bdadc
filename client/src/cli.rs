use clap::{Parser, Subcommand};
use shared::Packet;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Server address to send commands to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    pub server: String,

    /// Print states as JSON instead of a summary line
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Print the current match state
    State,
    /// Move a paddle one step ("left"/"right", "up"/"down")
    Move { side: String, direction: String },
    /// Pause or resume the match
    Pause,
    /// Clear the scores and play again
    Reset,
    /// Start a match ("ai" or "2player"; "easy", "medium" or "hard")
    Start {
        mode: String,
        #[arg(default_value = "medium")]
        difficulty: String,
    },
    /// Go back to the menu
    Menu,
    /// Stream live states from the server
    Watch {
        /// Number of frames to print before unsubscribing
        #[arg(short, long, default_value = "60")]
        frames: u32,
    },
}

impl Action {
    /// The single request this action sends. `Watch` streams instead.
    pub fn request(&self) -> Option<Packet> {
        let packet = match self {
            Action::State => Packet::GetState,
            Action::Move { side, direction } => Packet::MovePaddle {
                side: side.clone(),
                direction: direction.clone(),
            },
            Action::Pause => Packet::TogglePause,
            Action::Reset => Packet::ResetMatch,
            Action::Start { mode, difficulty } => Packet::StartMatch {
                game_mode: mode.clone(),
                difficulty: difficulty.clone(),
            },
            Action::Menu => Packet::ReturnToMenu,
            Action::Watch { .. } => return None,
        };
        Some(packet)
    }
}
