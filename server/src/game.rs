//! Match rules: scoring, win detection, and the menu/play/pause/game-over
//! transitions driven by player commands.

use crate::{ai, physics};
use log::{debug, info};
use shared::{
    Ball, Difficulty, Direction, GameMode, MatchPhase, MatchState, Paddle, Side, Vector2,
    PADDLE_STEP, SERVE_SPEED_X, SERVE_SPEED_Y, TABLE_WIDTH, WIN_SCORE,
};

/// A validated player command. Built once from the wire and applied as is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MovePaddle { side: Side, direction: Direction },
    TogglePause,
    ResetMatch,
    StartMatch {
        mode: GameMode,
        difficulty: Difficulty,
    },
    ReturnToMenu,
}

/// A point scored during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEvent {
    pub scorer: Side,
    pub left_score: u32,
    pub right_score: u32,
    /// Set when this point won the match.
    pub match_over: bool,
}

/// The authoritative match together with the number of ticks simulated.
///
/// A `GameState` is plain data until it is handed to
/// [`Simulation`](crate::simulation::Simulation). From then on it is only
/// reachable through commands and snapshots.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Ticks simulated so far, idle ones included.
    pub tick: u64,
    /// The table as clients see it.
    pub state: MatchState,
}

impl GameState {
    /// A game sitting in the menu at tick zero.
    pub fn new() -> Self {
        Self {
            tick: 0,
            state: MatchState::new(),
        }
    }

    /// The phase derived from the match flags.
    pub fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    /// A detached copy of the match.
    pub fn snapshot(&self) -> MatchState {
        self.state.clone()
    }

    /// Runs one tick: the computer paddle reacts, then the ball moves. A point
    /// scored here is awarded before returning.
    pub fn step(&mut self) -> Option<ScoreEvent> {
        self.tick += 1;
        ai::update(&mut self.state);
        let scorer = physics::step(&mut self.state)?;
        Some(self.award_point(scorer))
    }

    /// Dispatches a decoded command to the matching transition.
    pub fn apply(&mut self, command: Command) {
        debug!("Applying {:?}", command);
        match command {
            Command::MovePaddle { side, direction } => self.move_paddle(side, direction),
            Command::TogglePause => self.toggle_pause(),
            Command::ResetMatch => self.reset_match(),
            Command::StartMatch { mode, difficulty } => self.start_match(mode, difficulty),
            Command::ReturnToMenu => self.return_to_menu(),
        }
    }

    /// Shifts one paddle by a fixed step, clamped to the table.
    ///
    /// Moves are accepted in every phase, so players can line up their
    /// paddle while the match is paused or over.
    pub fn move_paddle(&mut self, side: Side, direction: Direction) {
        self.state
            .paddle_mut(side)
            .shift(PADDLE_STEP * direction.sign());
    }

    /// Flips the pause flag. Has no visible effect in the menu or after the
    /// match is over, where those phases take precedence.
    pub fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
        info!(
            "Match {}",
            if self.state.paused { "paused" } else { "resumed" }
        );
    }

    /// Clears scores and flags and re-centres the table. Menu, mode and
    /// difficulty are left alone.
    pub fn reset_match(&mut self) {
        self.full_reset();
        info!("Match reset");
    }

    /// Leaves the menu and starts a fresh match.
    ///
    /// `mode` and `difficulty` replace the previous selection; scores, flags,
    /// ball and paddles are reset as in [`GameState::reset_match`].
    pub fn start_match(&mut self, mode: GameMode, difficulty: Difficulty) {
        self.state.game_mode = mode;
        self.state.difficulty = difficulty;
        self.state.in_menu = false;
        self.full_reset();
        info!(
            "Match started: mode={} difficulty={}",
            mode.as_str(),
            difficulty.as_str()
        );
    }

    /// Abandons the current match and goes back to the menu.
    ///
    /// The table is reset so the menu shows a clean board. The last mode and
    /// difficulty are kept as the menu's current selection.
    pub fn return_to_menu(&mut self) {
        self.state.in_menu = true;
        self.full_reset();
        info!("Returned to menu");
    }

    fn full_reset(&mut self) {
        let state = &mut self.state;
        state.left_score = 0;
        state.right_score = 0;
        state.game_over = false;
        state.winner.clear();
        state.paused = false;
        state.ball = Ball::served(Vector2::new(SERVE_SPEED_X, SERVE_SPEED_Y));
        state.left_paddle = Paddle::centered();
        state.right_paddle = Paddle::centered();
    }

    /// Credits `scorer` with a point and either ends the match or serves the
    /// next rally.
    fn award_point(&mut self, scorer: Side) -> ScoreEvent {
        let state = &mut self.state;
        match scorer {
            Side::Left => state.left_score += 1,
            Side::Right => state.right_score += 1,
        }

        let match_over = state.score(scorer) >= WIN_SCORE;
        if match_over {
            state.game_over = true;
            state.winner = winner_label(state.game_mode, scorer).to_string();
            state.ball.position.x = state.ball.position.x.clamp(0.0, TABLE_WIDTH);
            info!(
                "Game over at {}-{}: {}",
                state.left_score, state.right_score, state.winner
            );
        } else {
            self.serve_rally();
            info!(
                "{:?} scores, {}-{}",
                scorer, self.state.left_score, self.state.right_score
            );
        }

        ScoreEvent {
            scorer,
            left_score: self.state.left_score,
            right_score: self.state.right_score,
            match_over,
        }
    }

    /// Re-centres ball and paddles after a point, serving away from whoever
    /// leads on the right.
    fn serve_rally(&mut self) {
        let state = &mut self.state;
        let direction = if state.right_score > state.left_score {
            -1.0
        } else {
            1.0
        };
        state.ball = Ball::served(Vector2::new(SERVE_SPEED_X * direction, SERVE_SPEED_Y));
        state.left_paddle = Paddle::centered();
        state.right_paddle = Paddle::centered();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn winner_label(mode: GameMode, scorer: Side) -> &'static str {
    match (mode, scorer) {
        (GameMode::Ai, Side::Left) => "You Win!",
        (GameMode::Ai, Side::Right) => "Computer Wins!",
        (GameMode::TwoPlayer, Side::Left) => "Left Player Wins!",
        (GameMode::TwoPlayer, Side::Right) => "Right Player Wins!",
    }
}
