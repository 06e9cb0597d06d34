#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy single-axis path tracing shared by corridor carving and enemy pursuit.
//!
//! The tracer is not a shortest-path search and ignores tile contents. From
//! each point it considers one step along x and one step along y toward the
//! goal, keeps the candidate closer to the goal by Euclidean distance, and
//! breaks exact ties in favour of the vertical step. Step directions are fixed
//! once from the signs of the initial deltas, so every step reduces the
//! Manhattan distance by one.

use crawl_core::Position;

/// Produces the ordered points from `from` to `to`, both endpoints included.
///
/// The returned path always holds `from.manhattan_distance(to) + 1` points.
#[must_use]
pub fn trace(from: Position, to: Position) -> Vec<Position> {
    let step_x = (to.x() - from.x()).signum();
    let step_y = (to.y() - from.y()).signum();
    let length = usize::try_from(from.manhattan_distance(to)).unwrap_or(0);

    let mut path = Vec::with_capacity(length.saturating_add(1));
    let mut current = from;
    path.push(current);
    while current != to {
        current = greedy_step(current, to, step_x, step_y);
        path.push(current);
    }
    path
}

/// First point after `from` along the trace toward `to`.
///
/// Returns `None` when both positions coincide.
#[must_use]
pub fn next_step(from: Position, to: Position) -> Option<Position> {
    if from == to {
        return None;
    }

    let step_x = (to.x() - from.x()).signum();
    let step_y = (to.y() - from.y()).signum();
    Some(greedy_step(from, to, step_x, step_y))
}

fn greedy_step(current: Position, goal: Position, step_x: i32, step_y: i32) -> Position {
    // An aligned axis yields a zero-length candidate, so only the other one moves.
    if current.x() == goal.x() {
        return Position::new(current.x(), current.y() + step_y);
    }
    if current.y() == goal.y() {
        return Position::new(current.x() + step_x, current.y());
    }

    let horizontal = Position::new(current.x() + step_x, current.y());
    let vertical = Position::new(current.x(), current.y() + step_y);
    if horizontal.squared_distance(goal) < vertical.squared_distance(goal) {
        horizontal
    } else {
        vertical
    }
}
