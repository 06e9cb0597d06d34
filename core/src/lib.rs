#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Crawl engine.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing a requested turn, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing every observable change. Systems consume immutable positions and
//! stat blocks and respond with new command batches or resolved outcomes.

mod config;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, GenerationConfig, InclusiveRange, MAX_GRID_AREA, MAX_GRID_SIDE};

/// Health assigned to a freshly created player when none is supplied.
pub const DEFAULT_PLAYER_HEALTH: i32 = 100;
/// Strength assigned to a freshly created player when none is supplied.
pub const DEFAULT_PLAYER_STRENGTH: i32 = 10;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Resolves one full turn with the player attempting a single step.
    MovePlayer {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests that the enemy standing on `from` takes its pursuit step.
    StepEnemy {
        /// Cell currently holding the enemy.
        from: Position,
        /// Cell the enemy steps onto.
        to: Position,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The player walked into rock and stayed in place.
    MoveBlocked {
        /// Cell the player still occupies.
        at: Position,
        /// Direction of the cancelled step.
        direction: Direction,
    },
    /// The player tile moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Position,
        /// Cell the player occupies after the move.
        to: Position,
    },
    /// A battle between the player and the enemy on `at` finished.
    BattleResolved {
        /// Cell of the defending enemy.
        at: Position,
        /// Terminal result of the exchange loop.
        outcome: BattleOutcome,
    },
    /// The player defeated the enemy on `at` and took its cell.
    BattleWon {
        /// Cell that held the defeated enemy.
        at: Position,
        /// Gold sampled from the enemy's drop range.
        gold_dropped: u32,
    },
    /// The player's health reached zero; the run is over.
    PlayerDefeated {
        /// Cell the player occupied when it fell.
        at: Position,
    },
    /// The player picked up gold.
    GoldCollected {
        /// Cell of the collected pile.
        at: Position,
        /// Gold counter after the pickup.
        gold: u32,
    },
    /// The player picked up the floor key.
    KeyCollected {
        /// Cell the key was picked up from.
        at: Position,
        /// Key counter after the pickup.
        keys: u32,
    },
    /// A fresh dungeon floor was generated.
    FloorGenerated {
        /// Zero-based floor index.
        floor: u32,
        /// Number of rooms carved into the floor.
        rooms: usize,
    },
    /// An enemy took a pursuit step.
    EnemyAdvanced {
        /// Cell the enemy left.
        from: Position,
        /// Cell the enemy now occupies.
        to: Position,
    },
    /// An enemy refused its pursuit step because another character stood there.
    EnemyHeld {
        /// Cell the enemy still occupies.
        at: Position,
        /// Kind of tile occupying the pursuit step.
        blocked_by: TileKind,
    },
    /// An enemy trampled a pickup while pursuing the player.
    PickupDestroyed {
        /// Cell of the destroyed pickup.
        at: Position,
        /// Kind of pickup that was lost.
        kind: TileKind,
    },
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Every direction in clockwise order starting at [`Direction::Up`].
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Column and row delta applied by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that offsets past the grid edge stay
/// representable and can be rejected as out of bounds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Position one cell away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Squared Euclidean distance, exact for every representable grid.
    #[must_use]
    pub fn squared_distance(self, other: Position) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx * dx + dy * dy
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells covered by the size.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the position lies within `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        u32::try_from(position.x()).map_or(false, |x| x < self.width)
            && u32::try_from(position.y()).map_or(false, |y| y < self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned room footprint anchored at its upper-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    position: Position,
    size: Size,
}

impl Rect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Reports whether the padded bounding boxes of both rectangles overlap on
    /// both axes.
    #[must_use]
    pub fn collides(&self, other: &Rect, padding: u32) -> bool {
        let padding = i64::from(padding);
        let (left, top) = (i64::from(self.position.x()), i64::from(self.position.y()));
        let (right, bottom) = (
            left + i64::from(self.size.width()),
            top + i64::from(self.size.height()),
        );
        let (other_left, other_top) = (i64::from(other.position.x()), i64::from(other.position.y()));
        let (other_right, other_bottom) = (
            other_left + i64::from(other.size.width()),
            other_top + i64::from(other.size.height()),
        );

        left - padding < other_right
            && right + padding > other_left
            && top - padding < other_bottom
            && bottom + padding > other_top
    }

    /// Iterator over every interior cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let origin = self.position;
        let width = i32::try_from(self.size.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.size.height()).unwrap_or(i32::MAX);
        (0..height).flat_map(move |dy| {
            (0..width).map(move |dx| Position::new(origin.x() + dx, origin.y() + dy))
        })
    }
}

/// Closed set of tile categories stored in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Walkable floor with no occupant.
    Empty,
    /// Unexcavated rock.
    Fill,
    /// Hostile character.
    Enemy,
    /// Floor key; picking it up descends to a new floor.
    Key,
    /// Gold pile.
    Gold,
    /// The player character.
    Player,
}

impl TileKind {
    /// Reports whether the kind is something the player can pick up.
    #[must_use]
    pub const fn is_pickup(self) -> bool {
        matches!(self, Self::Key | Self::Gold)
    }
}

/// Stat block carried by the player tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Remaining health; zero or below ends the run.
    pub health: i32,
    /// Damage dealt per landed hit.
    pub strength: i32,
    /// Keys collected so far, one per floor descended.
    pub keys: u32,
    /// Gold collected so far.
    pub gold: u32,
}

impl PlayerStats {
    /// Creates a player with empty key and gold counters.
    #[must_use]
    pub const fn new(health: i32, strength: i32) -> Self {
        Self {
            health,
            strength,
            keys: 0,
            gold: 0,
        }
    }

    /// Reports whether the player is still standing.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_HEALTH, DEFAULT_PLAYER_STRENGTH)
    }
}

/// Stat block carried by enemy tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Remaining health; zero or below removes the enemy.
    pub health: i32,
    /// Damage dealt per landed hit.
    pub strength: i32,
    /// Inclusive range the enemy's gold drop is sampled from.
    pub gold_drop: InclusiveRange,
}

impl EnemyStats {
    /// Creates a new enemy stat block.
    #[must_use]
    pub const fn new(health: i32, strength: i32, gold_drop: InclusiveRange) -> Self {
        Self {
            health,
            strength,
            gold_drop,
        }
    }

    /// Reports whether the enemy is still standing.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Payload carried by pickup tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pickup {
    /// Amount granted on pickup; `None` marks a plain marker worth one unit.
    pub value: Option<u32>,
}

impl Pickup {
    /// Valueless pickup marker.
    #[must_use]
    pub const fn marker() -> Self {
        Self { value: None }
    }

    /// Amount credited to the player when the pickup is collected.
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.value.unwrap_or(1)
    }
}

/// Entity payload attached to an occupied tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// Player stat block.
    Player(PlayerStats),
    /// Enemy stat block.
    Enemy(EnemyStats),
    /// Key or gold payload.
    Pickup(Pickup),
}

/// One grid cell: its kind plus an optional entity payload.
///
/// Tiles are plain values; copying a tile never shares state with the source
/// cell. Constructors keep the payload consistent with the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    kind: TileKind,
    entity: Option<Entity>,
}

impl Tile {
    /// Walkable floor.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            kind: TileKind::Empty,
            entity: None,
        }
    }

    /// Unexcavated rock.
    #[must_use]
    pub const fn fill() -> Self {
        Self {
            kind: TileKind::Fill,
            entity: None,
        }
    }

    /// Tile carrying the player.
    #[must_use]
    pub const fn player(stats: PlayerStats) -> Self {
        Self {
            kind: TileKind::Player,
            entity: Some(Entity::Player(stats)),
        }
    }

    /// Tile carrying an enemy.
    #[must_use]
    pub const fn enemy(stats: EnemyStats) -> Self {
        Self {
            kind: TileKind::Enemy,
            entity: Some(Entity::Enemy(stats)),
        }
    }

    /// Floor key marker.
    #[must_use]
    pub const fn key() -> Self {
        Self {
            kind: TileKind::Key,
            entity: Some(Entity::Pickup(Pickup::marker())),
        }
    }

    /// Valueless gold marker worth a single coin.
    #[must_use]
    pub const fn gold() -> Self {
        Self {
            kind: TileKind::Gold,
            entity: Some(Entity::Pickup(Pickup::marker())),
        }
    }

    /// Gold pile worth an explicit amount.
    #[must_use]
    pub const fn gold_worth(value: u32) -> Self {
        Self {
            kind: TileKind::Gold,
            entity: Some(Entity::Pickup(Pickup { value: Some(value) })),
        }
    }

    /// Category of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Entity payload, if the tile is occupied.
    #[must_use]
    pub const fn entity(&self) -> Option<&Entity> {
        self.entity.as_ref()
    }

    /// Reports whether the tile is unoccupied floor.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.kind, TileKind::Empty)
    }

    /// Player stats carried by the tile.
    #[must_use]
    pub fn player_stats(&self) -> Option<&PlayerStats> {
        match &self.entity {
            Some(Entity::Player(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Mutable access to the player stats carried by the tile.
    pub fn player_stats_mut(&mut self) -> Option<&mut PlayerStats> {
        match &mut self.entity {
            Some(Entity::Player(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Enemy stats carried by the tile.
    #[must_use]
    pub fn enemy_stats(&self) -> Option<&EnemyStats> {
        match &self.entity {
            Some(Entity::Enemy(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Pickup payload carried by key and gold tiles.
    #[must_use]
    pub fn pickup(&self) -> Option<&Pickup> {
        match &self.entity {
            Some(Entity::Pickup(pickup)) => Some(pickup),
            _ => None,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::fill()
    }
}

/// Classification of what the player ran into when inspecting a move target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveEvent {
    /// The move was cancelled; the player stays put.
    Null,
    /// The target is free floor.
    Step,
    /// The target holds an enemy.
    Battle,
    /// The target holds a key or gold.
    Pickup,
}

/// Result of classifying a requested player move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResolution {
    /// Classification of the target tile.
    pub event: MoveEvent,
    /// Copy of the tile found at the inspected target.
    pub tile: Tile,
    /// Cell the player started on.
    pub origin: Position,
    /// Cell the player ends on; equals `origin` for [`MoveEvent::Null`].
    pub destination: Position,
}

/// Side that won a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combatant {
    /// The player character.
    Player,
    /// The defending enemy.
    Enemy,
}

/// Terminal result of a battle exchange loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BattleOutcome {
    /// Side left standing.
    pub victor: Combatant,
    /// Number of hits exchanged before the loop stopped.
    pub exchanges: u32,
}

/// Progress of the current run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// The player is alive and accepting moves.
    #[default]
    InProgress,
    /// The player fell in battle; no further turns resolve.
    Defeated,
}

/// Reasons a grid access or placement may fail.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside the grid extents.
    #[error("position {position} lies outside the {size} grid")]
    OutOfBounds {
        /// Rejected coordinate.
        position: Position,
        /// Extents of the grid that was accessed.
        size: Size,
    },
    /// Random placement found no empty tile within its attempt budget.
    #[error("no empty tile found within {attempts} placement attempts")]
    PlacementExhausted {
        /// Number of positions drawn before giving up.
        attempts: u32,
    },
}
