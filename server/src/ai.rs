//! Rule-based controller for the right paddle in single-player matches.

use shared::{Difficulty, GameMode, MatchState};

/// How fast the computer paddle moves and how far off the ball it tolerates
/// before reacting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Distance moved per tick while chasing the ball.
    pub speed: f64,
    /// Offset between ball and paddle centre the controller ignores.
    pub deadzone: f64,
}

impl DifficultyProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (speed, deadzone) = match difficulty {
            Difficulty::Easy => (4.0, 50.0),
            Difficulty::Medium => (7.0, 20.0),
            Difficulty::Hard => (10.0, 5.0),
            // Unrecognised difficulties leave the computer paddle parked.
            Difficulty::Unrated => (0.0, 0.0),
        };
        Self { speed, deadzone }
    }
}

/// Moves the right paddle one tick toward the ball.
///
/// Only acts in single-player mode while the match is being played.
pub fn update(state: &mut MatchState) {
    if state.game_mode != GameMode::Ai || state.is_idle() {
        return;
    }

    let profile = DifficultyProfile::for_difficulty(state.difficulty);
    let target = state.ball.position.y;
    let paddle = &mut state.right_paddle;
    let offset = target - paddle.center();

    if offset.abs() > profile.deadzone {
        paddle.shift(profile.speed * offset.signum());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Vector2, PADDLE_HEIGHT, TABLE_HEIGHT};

    fn ai_match(difficulty: Difficulty) -> MatchState {
        let mut state = MatchState::new();
        state.in_menu = false;
        state.difficulty = difficulty;
        state
    }

    #[test]
    fn test_profiles() {
        let easy = DifficultyProfile::for_difficulty(Difficulty::Easy);
        let medium = DifficultyProfile::for_difficulty(Difficulty::Medium);
        let hard = DifficultyProfile::for_difficulty(Difficulty::Hard);

        assert_eq!((easy.speed, easy.deadzone), (4.0, 50.0));
        assert_eq!((medium.speed, medium.deadzone), (7.0, 20.0));
        assert_eq!((hard.speed, hard.deadzone), (10.0, 5.0));
        assert!(hard.speed > medium.speed && medium.speed > easy.speed);
        assert!(hard.deadzone < medium.deadzone && medium.deadzone < easy.deadzone);
    }

    #[test]
    fn test_hard_ai_tracks_until_within_deadzone() {
        let mut state = ai_match(Difficulty::Hard);
        state.ball.position = Vector2::new(600.0, 400.0);
        assert_eq!(state.right_paddle.center(), 300.0);

        let mut centres = Vec::new();
        for _ in 0..12 {
            update(&mut state);
            centres.push(state.right_paddle.center());
        }

        assert_eq!(&centres[..3], &[310.0, 320.0, 330.0]);
        // 400 - 390 = 10 > 5, one more step lands exactly on the ball.
        assert_eq!(centres[9], 400.0);
        assert_eq!(centres[11], 400.0);
    }

    #[test]
    fn test_ai_moves_up_toward_ball() {
        let mut state = ai_match(Difficulty::Medium);
        state.ball.position = Vector2::new(600.0, 100.0);

        update(&mut state);

        assert_eq!(state.right_paddle.y, 240.0 - 7.0);
    }

    #[test]
    fn test_deadzone_holds_paddle_still() {
        let mut state = ai_match(Difficulty::Easy);
        state.ball.position = Vector2::new(600.0, 350.0);

        update(&mut state);

        assert_eq!(state.right_paddle.y, 240.0);
    }

    #[test]
    fn test_ai_is_clamped_to_table() {
        let mut state = ai_match(Difficulty::Hard);
        state.right_paddle.y = TABLE_HEIGHT - PADDLE_HEIGHT - 3.0;
        state.ball.position = Vector2::new(600.0, 590.0);

        update(&mut state);

        assert_eq!(state.right_paddle.y, TABLE_HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn test_unrated_difficulty_never_moves() {
        let mut state = ai_match(Difficulty::Unrated);
        state.ball.position = Vector2::new(600.0, 590.0);

        for _ in 0..10 {
            update(&mut state);
        }

        assert_eq!(state.right_paddle.y, 240.0);
    }

    #[test]
    fn test_inactive_outside_single_player_play() {
        let cases: [fn(&mut MatchState); 4] = [
            |s| s.game_mode = GameMode::TwoPlayer,
            |s| s.paused = true,
            |s| s.game_over = true,
            |s| s.in_menu = true,
        ];

        for setup in cases {
            let mut state = ai_match(Difficulty::Hard);
            state.ball.position = Vector2::new(600.0, 500.0);
            setup(&mut state);

            update(&mut state);

            assert_eq!(state.right_paddle.y, 240.0);
        }
    }
}
