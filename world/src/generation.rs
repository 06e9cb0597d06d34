//! Floor generation pipeline: rooms, corridors, then entities.

use crawl_core::{GenerationConfig, GridError, PlayerStats};
use crawl_system_rooms::{RoomPlacer, RoomRequest};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use crate::{
    grid::Grid,
    registry::{self, SeedReport},
};

const GENERATION_STREAM_LABEL: &str = "crawl/generation";
const TURN_STREAM_LABEL: &str = "crawl/turns";

/// Generates a complete floor on a fresh grid.
///
/// Rooms are placed first, every pair of room anchors is joined by a traced
/// corridor, and the player, key, gold and enemies are seeded last.
pub fn generate_floor<R>(
    config: &GenerationConfig,
    player: PlayerStats,
    rng: &mut R,
) -> Result<(Grid, SeedReport), GridError>
where
    R: Rng + ?Sized,
{
    let mut grid = Grid::new(config.size);

    let placer = RoomPlacer::new(RoomRequest::from_config(config));
    let summary = grid.place_rooms_randomly(&placer, rng)?;
    debug!(
        "room placement accepted {} of {} candidates",
        summary.accepted,
        summary.accepted + summary.rejected
    );

    let corridors = grid.carve_corridors()?;
    debug!("carved {corridors} corridors");

    let report = registry::seed_entities(&mut grid, config, player, rng)?;
    info!(
        "generated {} grid with {} rooms, {} gold piles and {} enemies",
        config.size,
        grid.rooms().len(),
        report.gold,
        report.enemies
    );
    Ok((grid, report))
}

/// Random stream used to generate the given floor of a run.
pub(crate) fn floor_rng(seed: u64, floor: u32) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(GENERATION_STREAM_LABEL.as_bytes());
    hasher.update(floor.to_le_bytes());
    ChaCha8Rng::seed_from_u64(finalize_seed(hasher))
}

/// Random stream used for combat rolls and gold drops.
pub(crate) fn turn_rng(seed: u64) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(TURN_STREAM_LABEL.as_bytes());
    ChaCha8Rng::seed_from_u64(finalize_seed(hasher))
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
