//! Dungeon generation parameters and their validation rules.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PlayerStats, Size};

/// Largest accepted grid side.
pub const MAX_GRID_SIDE: u32 = 4096;
/// Largest accepted number of tiles on one floor.
pub const MAX_GRID_AREA: u64 = 1 << 20;

/// Inclusive `min..=max` range of unsigned values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InclusiveRange {
    min: u32,
    max: u32,
}

impl InclusiveRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether `min <= max`.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Draws a uniform value from the range.
    ///
    /// A collapsed or inverted range yields `min` without consuming randomness.
    pub fn sample<R>(&self, rng: &mut R) -> u32
    where
        R: Rng + ?Sized,
    {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Tuning knobs for a generated floor.
///
/// Every field falls back to its default when omitted from a configuration
/// file, so `GenerationConfig::default()` describes the stock 72x15 dungeon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Dimensions of the tile grid.
    pub size: Size,
    /// Number of random room placements attempted per floor.
    pub room_attempts: u32,
    /// Inclusive range of room widths.
    pub room_width: InclusiveRange,
    /// Inclusive range of room heights.
    pub room_height: InclusiveRange,
    /// Rock margin kept between rooms and the grid edge.
    pub outer_padding: u32,
    /// Inclusive range of gold piles seeded per floor.
    pub gold_piles: InclusiveRange,
    /// Inclusive range of enemies seeded per floor.
    pub enemies: InclusiveRange,
    /// Inclusive range of starting enemy health.
    pub enemy_health: InclusiveRange,
    /// Inclusive range of enemy strength.
    pub enemy_strength: InclusiveRange,
    /// Inclusive range enemy gold drops are sampled from.
    pub enemy_gold_drop: InclusiveRange,
    /// Random positions drawn per entity before placement gives up.
    pub placement_attempts: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            size: Size::new(72, 15),
            room_attempts: 12,
            room_width: InclusiveRange::new(2, 5),
            room_height: InclusiveRange::new(2, 5),
            outer_padding: 1,
            gold_piles: InclusiveRange::new(2, 5),
            enemies: InclusiveRange::new(2, 5),
            enemy_health: InclusiveRange::new(5, 25),
            enemy_strength: InclusiveRange::new(1, 10),
            enemy_gold_drop: InclusiveRange::new(5, 10),
            placement_attempts: 10_000,
        }
    }
}

impl GenerationConfig {
    /// Creates the default configuration resized to the provided grid.
    #[must_use]
    pub fn with_size(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Rejects mutually inconsistent parameters before any generation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.size.width(), self.size.height());
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE || self.size.area() > MAX_GRID_AREA {
            return Err(ConfigError::GridTooLarge { size: self.size });
        }
        if self.room_attempts == 0 {
            return Err(ConfigError::NoRoomAttempts);
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::NoPlacementAttempts);
        }

        for (field, range) in [
            ("room_width", self.room_width),
            ("room_height", self.room_height),
            ("gold_piles", self.gold_piles),
            ("enemies", self.enemies),
            ("enemy_health", self.enemy_health),
            ("enemy_strength", self.enemy_strength),
            ("enemy_gold_drop", self.enemy_gold_drop),
        ] {
            if !range.is_ordered() {
                return Err(ConfigError::InvertedRange {
                    field,
                    min: range.min(),
                    max: range.max(),
                });
            }
        }

        if self.room_width.min() == 0 || self.room_height.min() == 0 {
            return Err(ConfigError::ZeroRoomDimension);
        }

        let margin = u64::from(self.outer_padding) * 2;
        let fits_horizontally = u64::from(self.room_width.max()) + margin <= u64::from(width);
        let fits_vertically = u64::from(self.room_height.max()) + margin <= u64::from(height);
        if !fits_horizontally || !fits_vertically {
            return Err(ConfigError::RoomExceedsGrid {
                room: Size::new(self.room_width.max(), self.room_height.max()),
                grid: self.size,
                padding: self.outer_padding,
            });
        }

        if self.enemy_health.min() == 0 {
            return Err(ConfigError::UnarmedOrLifeless {
                field: "enemy_health",
            });
        }
        if self.enemy_strength.min() == 0 {
            return Err(ConfigError::UnarmedOrLifeless {
                field: "enemy_strength",
            });
        }
        if self.enemy_health.max() > i32::MAX as u32 || self.enemy_strength.max() > i32::MAX as u32 {
            return Err(ConfigError::StatOverflow);
        }

        Ok(())
    }

    /// Rejects player stat blocks that could never finish a battle.
    pub fn validate_player(&self, player: &PlayerStats) -> Result<(), ConfigError> {
        if player.health <= 0 || player.strength <= 0 {
            return Err(ConfigError::InvalidPlayer {
                health: player.health,
                strength: player.strength,
            });
        }
        Ok(())
    }
}

/// Reasons a generation configuration may be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The grid has a zero dimension.
    #[error("grid must have a non-zero width and height")]
    EmptyGrid,
    /// The grid exceeds the supported side length or tile count.
    #[error(
        "grid {size} exceeds the limits of {side} per side and {area} tiles",
        side = MAX_GRID_SIDE,
        area = MAX_GRID_AREA
    )]
    GridTooLarge {
        /// Requested grid dimensions.
        size: Size,
    },
    /// No room placement attempts were requested.
    #[error("at least one room placement attempt is required")]
    NoRoomAttempts,
    /// No entity placement attempts were requested.
    #[error("at least one entity placement attempt is required")]
    NoPlacementAttempts,
    /// A range has its bounds swapped.
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        /// Name of the offending field.
        field: &'static str,
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// Rooms could be drawn with zero width or height.
    #[error("rooms must be at least one cell wide and tall")]
    ZeroRoomDimension,
    /// The largest room does not fit inside the padded grid.
    #[error("room of up to {room} does not fit a {grid} grid with padding {padding}")]
    RoomExceedsGrid {
        /// Largest room that may be drawn.
        room: Size,
        /// Grid dimensions.
        grid: Size,
        /// Rock margin required on every side.
        padding: u32,
    },
    /// Enemies could spawn without health or strength.
    #[error("{field} must start at one or above")]
    UnarmedOrLifeless {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Enemy stats exceed the signed stat range.
    #[error("enemy stats must fit in a signed 32-bit integer")]
    StatOverflow,
    /// The supplied player cannot take part in a battle.
    #[error("player needs positive health and strength (health {health}, strength {strength})")]
    InvalidPlayer {
        /// Supplied health.
        health: i32,
        /// Supplied strength.
        strength: i32,
    },
}
