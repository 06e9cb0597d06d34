//! Locating and seeding entity-carrying tiles.

use crawl_core::{EnemyStats, GenerationConfig, GridError, PlayerStats, Position, Tile, TileKind};
use log::warn;
use rand::Rng;

use crate::grid::Grid;

/// Counts of entities actually placed while seeding a floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Cell the player landed on.
    pub player: Position,
    /// Whether the floor key was placed.
    pub key_placed: bool,
    /// Gold piles placed.
    pub gold: u32,
    /// Enemies placed.
    pub enemies: u32,
}

/// Cell of the first player tile in row-major order.
#[must_use]
pub(crate) fn player_position(grid: &Grid) -> Option<Position> {
    grid.find_tiles(TileKind::Player).into_iter().next()
}

/// Stats carried by the player tile, if one exists.
#[must_use]
pub(crate) fn player_stats(grid: &Grid) -> Option<PlayerStats> {
    let position = player_position(grid)?;
    grid.tile_at(position).ok()?.player_stats().copied()
}

/// Cells holding enemies in row-major order.
#[must_use]
pub(crate) fn enemy_positions(grid: &Grid) -> Vec<Position> {
    grid.find_tiles(TileKind::Enemy)
}

/// Places the player, the key, gold piles and enemies in that order.
///
/// Exhausted placements for pickups and enemies are logged and skipped. The
/// player falls back to the first empty cell and only fails when none exists.
pub(crate) fn seed_entities<R>(
    grid: &mut Grid,
    config: &GenerationConfig,
    player: PlayerStats,
    rng: &mut R,
) -> Result<SeedReport, GridError>
where
    R: Rng + ?Sized,
{
    let attempts = config.placement_attempts;
    let player = place_player(grid, Tile::player(player), rng, attempts)?;
    let mut report = SeedReport {
        player,
        ..SeedReport::default()
    };

    report.key_placed = place_or_warn(grid, Tile::key(), rng, attempts, "key");

    let gold_piles = config.gold_piles.sample(rng);
    for _ in 0..gold_piles {
        if place_or_warn(grid, Tile::gold(), rng, attempts, "gold") {
            report.gold += 1;
        }
    }

    let enemies = config.enemies.sample(rng);
    for _ in 0..enemies {
        let stats = roll_enemy(config, rng);
        if place_or_warn(grid, Tile::enemy(stats), rng, attempts, "enemy") {
            report.enemies += 1;
        }
    }

    Ok(report)
}

fn place_player<R>(
    grid: &mut Grid,
    tile: Tile,
    rng: &mut R,
    attempts: u32,
) -> Result<Position, GridError>
where
    R: Rng + ?Sized,
{
    match grid.place_randomly(tile, rng, attempts) {
        Ok(position) => Ok(position),
        Err(GridError::PlacementExhausted { attempts }) => {
            let Some(fallback) = grid.find_tiles(TileKind::Empty).into_iter().next() else {
                return Err(GridError::PlacementExhausted { attempts });
            };
            warn!("player placement exhausted after {attempts} attempts; using {fallback}");
            let _ = grid.place(fallback, tile)?;
            Ok(fallback)
        }
        Err(error) => Err(error),
    }
}

fn place_or_warn<R>(grid: &mut Grid, tile: Tile, rng: &mut R, attempts: u32, label: &str) -> bool
where
    R: Rng + ?Sized,
{
    match grid.place_randomly(tile, rng, attempts) {
        Ok(_) => true,
        Err(error) => {
            warn!("skipping {label}: {error}");
            false
        }
    }
}

fn roll_enemy<R>(config: &GenerationConfig, rng: &mut R) -> EnemyStats
where
    R: Rng + ?Sized,
{
    let health = config.enemy_health.sample(rng);
    let strength = config.enemy_strength.sample(rng);
    EnemyStats::new(
        i32::try_from(health).unwrap_or(i32::MAX),
        i32::try_from(strength).unwrap_or(i32::MAX),
        config.enemy_gold_drop,
    )
}
