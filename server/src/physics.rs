//! Ball integration, wall and paddle collisions, and out-of-bounds detection.

use shared::{Ball, MatchState, Paddle, Side, PADDLE_WIDTH, TABLE_HEIGHT, TABLE_WIDTH};
use std::f64::consts::PI;

/// Speed multiplier applied on every paddle contact. There is no speed cap.
pub const PADDLE_SPEEDUP: f64 = 1.08;
/// Outgoing angle for a ball striking the very edge of a paddle.
pub const MAX_DEFLECTION: f64 = PI / 3.0;

/// Advances the ball by one tick.
///
/// Does nothing while the match is idle. Returns the side that won the point
/// when the ball leaves the table; awarding it is up to the caller.
pub fn step(state: &mut MatchState) -> Option<Side> {
    if state.is_idle() {
        return None;
    }

    let ball = &mut state.ball;
    ball.position = ball.position.add(&ball.velocity);

    bounce_off_walls(ball);

    if ball.position.x - ball.radius <= PADDLE_WIDTH && state.left_paddle.covers(ball.position.y) {
        deflect(ball, &state.left_paddle, Side::Left);
    }

    if ball.position.x + ball.radius >= TABLE_WIDTH - PADDLE_WIDTH
        && state.right_paddle.covers(ball.position.y)
    {
        deflect(ball, &state.right_paddle, Side::Right);
    }

    out_of_bounds(ball)
}

/// Reflects the vertical velocity when the ball touches the top or bottom edge.
pub fn bounce_off_walls(ball: &mut Ball) {
    let y = ball.position.y;
    if y - ball.radius <= 0.0 || y + ball.radius >= TABLE_HEIGHT {
        ball.velocity.y = -ball.velocity.y;
        ball.position.y = y.clamp(ball.radius, TABLE_HEIGHT - ball.radius);
    }
}

/// Sends the ball back off `paddle`, which sits on `side` of the table.
///
/// The outgoing angle grows linearly with the contact's distance from the
/// paddle centre, and the ball is placed flush against the paddle face so the
/// same contact cannot trigger again next tick.
pub fn deflect(ball: &mut Ball, paddle: &Paddle, side: Side) {
    let relative_y = (ball.position.y - paddle.center()) / (paddle.height / 2.0);
    let angle = relative_y * MAX_DEFLECTION;
    let speed = ball.velocity.magnitude() * PADDLE_SPEEDUP;

    let mut velocity = shared::Vector2::from_polar(speed, angle);
    match side {
        Side::Left => {
            ball.position.x = paddle.width + ball.radius;
        }
        Side::Right => {
            velocity.x = -velocity.x;
            ball.position.x = TABLE_WIDTH - paddle.width - ball.radius;
        }
    }
    ball.velocity = velocity;
}

/// Side credited with the point if the ball centre has left the table.
pub fn out_of_bounds(ball: &Ball) -> Option<Side> {
    if ball.position.x < 0.0 {
        Some(Side::Right)
    } else if ball.position.x > TABLE_WIDTH {
        Some(Side::Left)
    } else {
        None
    }
}
