use shared::{GameMode, MatchPhase, MatchState};

/// One-line summary of a match for terminal output.
pub fn describe(tick: u64, state: &MatchState) -> String {
    let phase = match state.phase() {
        MatchPhase::InMenu => "menu",
        MatchPhase::Playing => "playing",
        MatchPhase::Paused => "paused",
        MatchPhase::GameOver => "game over",
    };

    let opponent = match state.game_mode {
        GameMode::Ai => format!("vs computer ({})", state.difficulty.as_str()),
        GameMode::TwoPlayer => "2 players".to_string(),
    };

    let mut line = format!(
        "tick {:>6} | {:<9} | {} | {} : {} | ball ({:.1}, {:.1}) | paddles {:.0} / {:.0}",
        tick,
        phase,
        opponent,
        state.left_score,
        state.right_score,
        state.ball.position.x,
        state.ball.position.y,
        state.left_paddle.y,
        state.right_paddle.y,
    );

    if state.game_over {
        line.push_str(" | ");
        line.push_str(&state.winner);
    }

    line
}
