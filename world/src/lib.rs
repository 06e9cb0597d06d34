#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Crawl engine.
//!
//! The world owns the tile grid and both random streams. Adapters mutate it
//! exclusively through [`apply`] and observe it through the read-only
//! [`query`] functions.

mod generation;
mod grid;
mod registry;
mod turn;

use crawl_core::{
    Command, ConfigError, Event, GenerationConfig, GridError, PlayerStats, Position, RunStatus,
    Size, TileKind,
};
use crawl_system_combat::CombatResolver;
use crawl_system_pursuit::Pursuit;
use log::info;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use generation::generate_floor;
pub use grid::Grid;
pub use registry::SeedReport;
pub use turn::resolve_move;

/// Reasons the world may refuse to build or to apply a command.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The generation settings or the supplied player were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    /// A grid access or placement failed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The player has been defeated and no further turns resolve.
    #[error("the run is over")]
    RunOver,
    /// A supplied grid does not have the configured dimensions.
    #[error("grid {grid} does not match the configured size {config}")]
    SizeMismatch {
        /// Dimensions of the supplied grid.
        grid: Size,
        /// Dimensions every generated floor uses.
        config: Size,
    },
    /// The grid holds no player tile.
    #[error("no player on the grid")]
    PlayerMissing,
    /// A supplied grid holds the wrong number of player tiles.
    #[error("expected exactly one player tile, found {found}")]
    PlayerCount {
        /// Number of player tiles present.
        found: usize,
    },
    /// A step command named a cell that holds no enemy.
    #[error("no enemy stands on {position}")]
    NotAnEnemy {
        /// Cell named by the command.
        position: Position,
    },
    /// A step command does not match the enemy's pursuit step.
    #[error("enemy at {from} cannot step to {to}")]
    InvalidStep {
        /// Cell holding the enemy.
        from: Position,
        /// Rejected destination.
        to: Position,
    },
}

/// Represents the authoritative dungeon state for one run.
#[derive(Debug)]
pub struct World {
    config: GenerationConfig,
    seed: u64,
    floor: u32,
    grid: Grid,
    turn_rng: ChaCha8Rng,
    status: RunStatus,
    combat: CombatResolver,
    pursuit: Pursuit,
    pending: Vec<Command>,
}

impl World {
    /// Validates the settings and generates floor zero for `seed`.
    ///
    /// `player` defaults to a fresh player with 100 health and 10 strength.
    pub fn initialize(
        config: GenerationConfig,
        seed: u64,
        player: Option<PlayerStats>,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        let player = player.unwrap_or_default();
        config.validate_player(&player)?;

        let mut rng = generation::floor_rng(seed, 0);
        let (grid, report) = generate_floor(&config, player, &mut rng)?;
        info!(
            "initialized run with seed {seed}; player starts at {}",
            report.player
        );
        Ok(Self::assemble(config, seed, grid))
    }

    /// Wraps a prepared grid holding exactly one player.
    ///
    /// `config` drives the floors generated after a key pickup, so its size
    /// must match the grid.
    pub fn from_grid(config: GenerationConfig, seed: u64, grid: Grid) -> Result<Self, WorldError> {
        config.validate()?;
        if grid.size() != config.size {
            return Err(WorldError::SizeMismatch {
                grid: grid.size(),
                config: config.size,
            });
        }
        let players = grid.find_tiles(TileKind::Player);
        if players.len() != 1 {
            return Err(WorldError::PlayerCount {
                found: players.len(),
            });
        }
        if let Some(stats) = registry::player_stats(&grid) {
            config.validate_player(&stats)?;
        }
        Ok(Self::assemble(config, seed, grid))
    }

    fn assemble(config: GenerationConfig, seed: u64, grid: Grid) -> Self {
        Self {
            config,
            seed,
            floor: 0,
            grid,
            turn_rng: generation::turn_rng(seed),
            status: RunStatus::InProgress,
            combat: CombatResolver::new(),
            pursuit: Pursuit::new(),
            pending: Vec::new(),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// `MovePlayer` resolves one complete turn, enemy pursuit included.
/// `StepEnemy` applies a single pursuit step.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::MovePlayer { direction } => turn::take_turn(world, direction, out_events),
        Command::StepEnemy { from, to } => turn::step_enemy(world, from, to, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use crawl_core::{
        Direction, MoveResolution, PlayerStats, Position, RunStatus, Tile,
        TileKind,
    };

    use super::{registry, turn, Grid, World, WorldError};

    /// Tile matrix backing the current floor.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Tile stored at `position` on the current floor.
    pub fn tile_at(world: &World, position: Position) -> Result<&Tile, WorldError> {
        Ok(world.grid.tile_at(position)?)
    }

    /// Cells holding tiles of `kind` in row-major order.
    #[must_use]
    pub fn find_tiles(world: &World, kind: TileKind) -> Vec<Position> {
        world.grid.find_tiles(kind)
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player_position(world: &World) -> Option<Position> {
        registry::player_position(&world.grid)
    }

    /// Current player stats.
    #[must_use]
    pub fn player_stats(world: &World) -> Option<PlayerStats> {
        registry::player_stats(&world.grid)
    }

    /// Cells holding enemies in row-major order.
    #[must_use]
    pub fn enemy_positions(world: &World) -> Vec<Position> {
        registry::enemy_positions(&world.grid)
    }

    /// Zero-based index of the current floor.
    #[must_use]
    pub fn floor(world: &World) -> u32 {
        world.floor
    }

    /// Whether the run still accepts moves.
    #[must_use]
    pub fn status(world: &World) -> RunStatus {
        world.status
    }

    /// Seed the run was created with.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Previews the player's move in `direction` without side effects.
    pub fn resolve_move(world: &World, direction: Direction) -> Result<MoveResolution, WorldError> {
        let origin = player_position(world).ok_or(WorldError::PlayerMissing)?;
        Ok(turn::resolve_move(&world.grid, origin, direction)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawl_core::{Direction, Size};

    #[test]
    fn invalid_configuration_is_rejected_before_generation() {
        let config = GenerationConfig {
            room_attempts: 0,
            ..GenerationConfig::default()
        };
        assert_eq!(
            World::initialize(config, 1, None).map(|_| ()),
            Err(WorldError::InvalidConfiguration(ConfigError::NoRoomAttempts))
        );
    }

    #[test]
    fn weak_player_is_rejected() {
        let player = PlayerStats::new(10, 0);
        assert!(matches!(
            World::initialize(GenerationConfig::default(), 1, Some(player)),
            Err(WorldError::InvalidConfiguration(ConfigError::InvalidPlayer { .. }))
        ));
    }

    #[test]
    fn initialized_world_starts_on_floor_zero() {
        let world = World::initialize(GenerationConfig::default(), 3, None).expect("valid");
        assert_eq!(query::floor(&world), 0);
        assert_eq!(query::status(&world), RunStatus::InProgress);
        assert_eq!(query::seed(&world), 3);
        assert_eq!(query::player_stats(&world), Some(PlayerStats::default()));
        assert_eq!(query::grid(&world).size(), Size::new(72, 15));
    }

    #[test]
    fn grid_without_player_is_rejected() {
        let config = GenerationConfig::with_size(Size::new(7, 7));
        let grid = Grid::new(Size::new(7, 7));
        assert_eq!(
            World::from_grid(config, 0, grid).map(|_| ()),
            Err(WorldError::PlayerCount { found: 0 })
        );
    }

    #[test]
    fn grid_and_configured_size_must_agree() {
        let grid = Grid::new(Size::new(9, 4));
        assert_eq!(
            World::from_grid(GenerationConfig::default(), 0, grid).map(|_| ()),
            Err(WorldError::SizeMismatch {
                grid: Size::new(9, 4),
                config: Size::new(72, 15),
            })
        );
    }

    #[test]
    fn step_command_on_empty_cell_is_refused() {
        let mut world = World::initialize(GenerationConfig::default(), 5, None).expect("valid");
        let Some(player) = query::player_position(&world) else {
            panic!("player placed");
        };
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::StepEnemy {
                from: player,
                to: player.step(Direction::Up),
            },
            &mut events,
        );

        assert_eq!(result, Err(WorldError::NotAnEnemy { position: player }));
        assert!(events.is_empty());
    }
}
