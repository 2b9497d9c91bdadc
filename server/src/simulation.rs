//! Exclusive access to the single live match.
//!
//! Every tick and every command takes the lock exactly once and releases it
//! only after the whole operation, including any rally reset a point
//! triggers, has finished. Nothing awaits while the lock is held.

use crate::game::{Command, GameState, ScoreEvent};
use shared::{Difficulty, Direction, GameMode, MatchState, Side};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A consistent copy of the match as of a given tick.
#[derive(Debug, Clone, PartialEq)]
pub struct StateFrame {
    pub tick: u64,
    pub state: MatchState,
}

/// What one tick did, captured inside the same critical section.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub event: Option<ScoreEvent>,
    pub frame: StateFrame,
}

/// Cloneable handle to the authoritative match.
#[derive(Debug, Clone)]
pub struct Simulation {
    game: Arc<Mutex<GameState>>,
}

impl Simulation {
    /// A simulation holding a fresh game in the menu.
    pub fn new() -> Self {
        Self::from_state(GameState::new())
    }

    /// Takes ownership of a prepared game. After this the game is only
    /// reachable through the handle's commands and snapshots.
    pub fn from_state(game: GameState) -> Self {
        Self {
            game: Arc::new(Mutex::new(game)),
        }
    }

    /// A copy of the match taken under the lock.
    pub async fn snapshot(&self) -> MatchState {
        self.game.lock().await.snapshot()
    }

    /// Like [`Simulation::snapshot`], paired with the current tick.
    pub async fn frame(&self) -> StateFrame {
        let game = self.game.lock().await;
        StateFrame {
            tick: game.tick,
            state: game.snapshot(),
        }
    }

    /// Runs the computer paddle and the physics step as one atomic update.
    pub async fn tick(&self) -> TickReport {
        let mut game = self.game.lock().await;
        let event = game.step();
        TickReport {
            event,
            frame: StateFrame {
                tick: game.tick,
                state: game.snapshot(),
            },
        }
    }

    /// Applies one command as a single critical section.
    pub async fn apply(&self, command: Command) {
        self.game.lock().await.apply(command);
    }

    pub async fn move_paddle(&self, side: Side, direction: Direction) {
        self.apply(Command::MovePaddle { side, direction }).await;
    }

    pub async fn toggle_pause(&self) {
        self.apply(Command::TogglePause).await;
    }

    pub async fn reset_match(&self) {
        self.apply(Command::ResetMatch).await;
    }

    pub async fn start_match(&self, mode: GameMode, difficulty: Difficulty) {
        self.apply(Command::StartMatch { mode, difficulty }).await;
    }

    pub async fn return_to_menu(&self) {
        self.apply(Command::ReturnToMenu).await;
    }

}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MatchPhase, Vector2, BALL_RADIUS, PADDLE_HEIGHT, TABLE_HEIGHT};

    fn assert_in_bounds(state: &MatchState) {
        for paddle in [&state.left_paddle, &state.right_paddle] {
            assert!(paddle.y >= 0.0 && paddle.y <= TABLE_HEIGHT - PADDLE_HEIGHT);
        }
        let y = state.ball.position.y;
        assert!((BALL_RADIUS..=TABLE_HEIGHT - BALL_RADIUS).contains(&y));
        assert!(state.winner.is_empty() || state.game_over);
    }

    #[tokio::test]
    async fn test_snapshot_is_a_detached_copy() {
        let sim = Simulation::new();
        let mut copy = sim.snapshot().await;
        copy.left_score = 99;

        assert_eq!(sim.snapshot().await.left_score, 0);
    }

    #[test]
    fn test_handle_usable_outside_a_runtime_task() {
        let sim = Simulation::new();
        tokio_test::block_on(sim.start_match(GameMode::Ai, Difficulty::Easy));

        let state = tokio_test::block_on(sim.snapshot());
        assert_eq!(state.difficulty, Difficulty::Easy);
        assert_eq!(state.phase(), MatchPhase::Playing);
    }

    #[tokio::test]
    async fn test_tick_reports_frame() {
        let sim = Simulation::new();
        sim.start_match(GameMode::Ai, Difficulty::Medium).await;

        let report = sim.tick().await;

        assert_eq!(report.frame.tick, 1);
        assert!(report.event.is_none());
        assert_eq!(report.frame.state.ball.position, Vector2::new(606.0, 304.0));
        assert_eq!(sim.frame().await, report.frame);
    }

    #[tokio::test]
    async fn test_commands_through_handle() {
        let sim = Simulation::new();
        sim.start_match(GameMode::TwoPlayer, Difficulty::Easy).await;
        sim.move_paddle(Side::Right, Direction::Up).await;
        sim.toggle_pause().await;

        let state = sim.snapshot().await;
        assert_eq!(state.right_paddle.y, 230.0);
        assert_eq!(state.phase(), MatchPhase::Paused);

        sim.reset_match().await;
        assert_eq!(sim.snapshot().await.phase(), MatchPhase::Playing);

        sim.return_to_menu().await;
        assert_eq!(sim.snapshot().await.phase(), MatchPhase::InMenu);
    }

    #[tokio::test]
    async fn test_score_and_rally_reset_are_one_step() {
        let mut game = GameState::new();
        game.start_match(GameMode::TwoPlayer, Difficulty::Medium);
        game.state.left_paddle.y = 0.0;
        game.state.ball.position = Vector2::new(3.0, 500.0);
        game.state.ball.velocity = Vector2::new(-6.0, 0.0);
        let sim = Simulation::from_state(game);

        let report = sim.tick().await;

        // The frame captured with the point already shows the re-served ball.
        let event = report.event.expect("point scored");
        assert_eq!(event.scorer, Side::Right);
        assert_eq!(report.frame.state.right_score, 1);
        assert_eq!(report.frame.state.ball.position, Vector2::new(600.0, 300.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commands_and_ticks_keep_invariants() {
        let sim = Simulation::new();
        sim.start_match(GameMode::Ai, Difficulty::Hard).await;

        let ticker = {
            let sim = sim.clone();
            tokio::spawn(async move {
                for _ in 0..2_000 {
                    let report = sim.tick().await;
                    assert_in_bounds(&report.frame.state);
                }
            })
        };

        let mut callers = Vec::new();
        for worker in 0..8 {
            let sim = sim.clone();
            callers.push(tokio::spawn(async move {
                for i in 0..250 {
                    let direction = if (i + worker) % 2 == 0 {
                        Direction::Up
                    } else {
                        Direction::Down
                    };
                    sim.move_paddle(Side::Left, direction).await;
                    if i % 97 == 0 {
                        sim.toggle_pause().await;
                    }
                    assert_in_bounds(&sim.snapshot().await);
                }
            }));
        }

        ticker.await.unwrap();
        for caller in callers {
            caller.await.unwrap();
        }
        assert_in_bounds(&sim.snapshot().await);
    }
}
