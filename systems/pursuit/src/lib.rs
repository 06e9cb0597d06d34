#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pursuit system that proposes one step per enemy toward the player.

use crawl_core::{Command, Position};
use crawl_system_path_tracer::next_step;

/// Pursuit system that emits `Command::StepEnemy` entries for every enemy.
#[derive(Debug, Default)]
pub struct Pursuit {
    scratch: Vec<Command>,
}

impl Pursuit {
    /// Creates a new pursuit system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one pursuit step per enemy, preserving the order of `enemies`.
    ///
    /// Each step is the first point of the trace from the enemy toward the
    /// player's current cell, recomputed on every call. Enemies already on the
    /// player's cell produce no command.
    pub fn handle(&mut self, player: Position, enemies: &[Position], out: &mut Vec<Command>) {
        self.scratch.clear();

        for &enemy in enemies {
            if let Some(to) = next_step(enemy, player) {
                self.scratch.push(Command::StepEnemy { from: enemy, to });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
