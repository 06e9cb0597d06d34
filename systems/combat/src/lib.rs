#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Battle resolution between the player and a single enemy.
//!
//! A battle is a sequential exchange loop rather than simultaneous damage.
//! Each exchange draws a uniform value in `[0, 1)`: below the player's current
//! hit chance the player lands a hit and the chance resets, otherwise the enemy
//! lands a hit and the player's chance grows. The loop stops the instant either
//! side drops to zero health or below.

use crawl_core::{BattleOutcome, Combatant, EnemyStats, PlayerStats};
use rand::Rng;

/// Hit chance the player starts every battle with.
pub const BASE_HIT_CHANCE: f64 = 0.5;
/// Hit chance gained by the player each time the enemy lands a hit. Uncapped.
pub const MISS_BONUS: f64 = 0.1;

/// Pure system resolving battles with an injected random source.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs the exchange loop to completion, mutating both stat blocks.
    ///
    /// Every landed hit deals at least one point of damage, so the loop ends
    /// with exactly one side at zero health or below.
    pub fn resolve<R>(
        &self,
        player: &mut PlayerStats,
        enemy: &mut EnemyStats,
        rng: &mut R,
    ) -> BattleOutcome
    where
        R: Rng + ?Sized,
    {
        let mut hit_chance = BASE_HIT_CHANCE;
        let mut exchanges = 0_u32;

        while player.is_alive() && enemy.is_alive() {
            exchanges = exchanges.saturating_add(1);
            if rng.gen::<f64>() < hit_chance {
                enemy.health = enemy.health.saturating_sub(player.strength.max(1));
                hit_chance = BASE_HIT_CHANCE;
            } else {
                player.health = player.health.saturating_sub(enemy.strength.max(1));
                hit_chance += MISS_BONUS;
            }
        }

        let victor = if enemy.is_alive() {
            Combatant::Enemy
        } else {
            Combatant::Player
        };
        BattleOutcome { victor, exchanges }
    }

    /// Samples the gold dropped by a defeated enemy from its inclusive range.
    pub fn roll_gold_drop<R>(&self, enemy: &EnemyStats, rng: &mut R) -> u32
    where
        R: Rng + ?Sized,
    {
        enemy.gold_drop.sample(rng)
    }
}
