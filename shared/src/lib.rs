//! Types shared between the volley server and its command client.
//!
//! Holds the table geometry, the match entities that make up a state snapshot,
//! the closed enumerations commands are decoded into, and the UDP wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const TABLE_WIDTH: f64 = 1200.0;
pub const TABLE_HEIGHT: f64 = 600.0;
pub const PADDLE_WIDTH: f64 = 20.0;
pub const PADDLE_HEIGHT: f64 = 120.0;
pub const BALL_RADIUS: f64 = 10.0;
/// Distance a paddle travels per manual move command.
pub const PADDLE_STEP: f64 = 10.0;
pub const WIN_SCORE: u32 = 11;
pub const SERVE_SPEED_X: f64 = 6.0;
pub const SERVE_SPEED_Y: f64 = 4.0;

/// Receive buffer size for every datagram exchanged with the server.
pub const MAX_PACKET_SIZE: usize = 2048;

/// A vector in table space. Positive y points down the table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn add(&self, other: &Vector2) -> Vector2 {
        Vector2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Vector of the given length pointing `angle` radians from the positive x-axis.
    pub fn from_polar(length: f64, angle: f64) -> Vector2 {
        Vector2 {
            x: length * angle.cos(),
            y: length * angle.sin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    #[serde(rename = "pos")]
    pub position: Vector2,
    #[serde(rename = "vel")]
    pub velocity: Vector2,
    pub radius: f64,
}

impl Ball {
    /// Ball at the table centre travelling with the given velocity.
    pub fn served(velocity: Vector2) -> Self {
        Self {
            position: Vector2::new(TABLE_WIDTH / 2.0, TABLE_HEIGHT / 2.0),
            velocity,
            radius: BALL_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top edge of the paddle.
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

impl Paddle {
    /// A paddle vertically centred on the table.
    pub fn centered() -> Self {
        Self {
            y: TABLE_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
            height: PADDLE_HEIGHT,
            width: PADDLE_WIDTH,
        }
    }

    pub fn center(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Highest `y` the paddle may take while staying on the table.
    pub fn max_y(&self) -> f64 {
        TABLE_HEIGHT - self.height
    }

    /// Moves the paddle by `delta`, keeping it on the table.
    pub fn shift(&mut self, delta: f64) {
        self.y = (self.y + delta).clamp(0.0, self.max_y());
    }

    /// Whether a point at height `y` lies within the paddle's face, edges included.
    pub fn covers(&self, y: f64) -> bool {
        y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "2player")]
    TwoPlayer,
}

impl GameMode {
    /// Decodes a wire value. Every mode other than `"ai"` plays as two humans.
    pub fn parse(value: &str) -> Self {
        match value {
            "ai" => GameMode::Ai,
            _ => GameMode::TwoPlayer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Ai => "ai",
            GameMode::TwoPlayer => "2player",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Any difficulty the server does not recognise. The string the client
    /// sent is not kept; snapshots report `"unrated"`.
    Unrated,
}

impl Difficulty {
    pub fn parse(value: &str) -> Self {
        match value {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Unrated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unrated => "unrated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Decodes a wire value; unknown sides yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Side::Left),
            "right" => Some(Side::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Decodes a wire value. Anything other than `"up"` moves down.
    pub fn parse(value: &str) -> Self {
        if value == "up" {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Sign of the y displacement this direction produces.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }
}

/// Which of the four visible situations a match is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    InMenu,
    Playing,
    Paused,
    GameOver,
}

/// Complete state of the table. The server owns the only live copy; everyone
/// else sees clones of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub ball: Ball,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub left_score: u32,
    pub right_score: u32,
    pub paused: bool,
    pub game_over: bool,
    pub winner: String,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    pub in_menu: bool,
}

impl MatchState {
    /// The pre-play configuration the server starts in.
    pub fn new() -> Self {
        Self {
            ball: Ball::served(Vector2::new(SERVE_SPEED_X, SERVE_SPEED_Y)),
            left_paddle: Paddle::centered(),
            right_paddle: Paddle::centered(),
            left_score: 0,
            right_score: 0,
            paused: false,
            game_over: false,
            winner: String::new(),
            game_mode: GameMode::Ai,
            difficulty: Difficulty::Medium,
            in_menu: true,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        if self.in_menu {
            MatchPhase::InMenu
        } else if self.game_over {
            MatchPhase::GameOver
        } else if self.paused {
            MatchPhase::Paused
        } else {
            MatchPhase::Playing
        }
    }

    /// True when ticks must leave the table untouched.
    pub fn is_idle(&self) -> bool {
        self.phase() != MatchPhase::Playing
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left_paddle,
            Side::Right => &mut self.right_paddle,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Datagrams exchanged between command clients and the server.
///
/// Command fields stay as raw strings on the wire; the server turns them into
/// [`Side`], [`Direction`], [`GameMode`] and [`Difficulty`] once on receipt.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    GetState,
    MovePaddle {
        side: String,
        direction: String,
    },
    TogglePause,
    ResetMatch,
    StartMatch {
        game_mode: String,
        difficulty: String,
    },
    ReturnToMenu,
    Subscribe,
    Unsubscribe,

    State {
        tick: u64,
        state: MatchState,
    },
    Ack,
    Rejected {
        reason: String,
    },
}

impl Packet {
    pub fn kind(&self) -> &'static str {
        match self {
            Packet::GetState => "GetState",
            Packet::MovePaddle { .. } => "MovePaddle",
            Packet::TogglePause => "TogglePause",
            Packet::ResetMatch => "ResetMatch",
            Packet::StartMatch { .. } => "StartMatch",
            Packet::ReturnToMenu => "ReturnToMenu",
            Packet::Subscribe => "Subscribe",
            Packet::Unsubscribe => "Unsubscribe",
            Packet::State { .. } => "State",
            Packet::Ack => "Ack",
            Packet::Rejected { .. } => "Rejected",
        }
    }
}

/// Failures at the wire boundary. The simulation itself never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// The datagram could not be decoded or encoded.
    Malformed(String),
    /// A well-formed packet the receiver has no use for.
    Unexpected(&'static str),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(reason) => write!(f, "malformed packet: {}", reason),
            ProtocolError::Unexpected(kind) => write!(f, "unexpected packet: {}", kind),
        }
    }
}

impl std::error::Error for ProtocolError {}

pub fn encode(packet: &Packet) -> Result<Vec<u8>, ProtocolError> {
    bincode::serialize(packet).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<Packet, ProtocolError> {
    bincode::deserialize(bytes).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
