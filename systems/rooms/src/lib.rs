#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-effort random placement of non-overlapping rectangular rooms.
//!
//! The placer never touches tiles directly. Accepted rooms are appended to the
//! caller's room list and every interior cell is handed to a `carve` callback,
//! which lets the owner of the tile matrix decide how excavation happens.

use crawl_core::{GenerationConfig, InclusiveRange, Position, Rect, Size};
use rand::Rng;

/// Padding applied when testing a candidate room against accepted rooms.
pub const COLLISION_PADDING: u32 = 1;

/// Parameters describing one batch of random room placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomRequest {
    /// Number of candidates drawn.
    pub attempts: u32,
    /// Inclusive range of candidate widths.
    pub width: InclusiveRange,
    /// Inclusive range of candidate heights.
    pub height: InclusiveRange,
    /// Rock margin kept between rooms and the grid edge.
    pub outer_padding: u32,
}

impl RoomRequest {
    /// Creates a request with the default outer padding of one cell.
    #[must_use]
    pub const fn new(attempts: u32, width: InclusiveRange, height: InclusiveRange) -> Self {
        Self {
            attempts,
            width,
            height,
            outer_padding: 1,
        }
    }

    /// Extracts the room parameters from a floor configuration.
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            attempts: config.room_attempts,
            width: config.room_width,
            height: config.room_height,
            outer_padding: config.outer_padding,
        }
    }
}

/// Tally of a placement batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoomSummary {
    /// Candidates that were accepted and carved.
    pub accepted: u32,
    /// Candidates that collided or did not fit the bounds.
    pub rejected: u32,
}

/// Pure system that draws candidate rooms and accepts the non-colliding ones.
#[derive(Clone, Debug)]
pub struct RoomPlacer {
    request: RoomRequest,
}

impl RoomPlacer {
    /// Creates a placer for the provided request.
    #[must_use]
    pub const fn new(request: RoomRequest) -> Self {
        Self { request }
    }

    /// Draws up to `attempts` candidates inside `bounds` and carves the accepted ones.
    ///
    /// Rooms that cannot be placed are dropped silently; the summary reports
    /// how many candidates were kept. Errors only surface from `carve`.
    pub fn place_randomly<R, F, E>(
        &self,
        bounds: Size,
        rooms: &mut Vec<Rect>,
        rng: &mut R,
        mut carve: F,
    ) -> Result<RoomSummary, E>
    where
        R: Rng + ?Sized,
        F: FnMut(Position) -> Result<(), E>,
    {
        let mut summary = RoomSummary::default();
        for _ in 0..self.request.attempts {
            let accepted = match self.draw_candidate(bounds, rng) {
                Some(candidate) => Self::try_place(rooms, candidate, &mut carve)?,
                None => false,
            };

            if accepted {
                summary.accepted += 1;
            } else {
                summary.rejected += 1;
            }
        }
        Ok(summary)
    }

    /// Accepts `candidate` unless it collides with an accepted room, carving it on success.
    pub fn try_place<F, E>(rooms: &mut Vec<Rect>, candidate: Rect, mut carve: F) -> Result<bool, E>
    where
        F: FnMut(Position) -> Result<(), E>,
    {
        if rooms
            .iter()
            .any(|room| candidate.collides(room, COLLISION_PADDING))
        {
            return Ok(false);
        }

        rooms.push(candidate);
        for cell in candidate.cells() {
            carve(cell)?;
        }
        Ok(true)
    }

    fn draw_candidate<R>(&self, bounds: Size, rng: &mut R) -> Option<Rect>
    where
        R: Rng + ?Sized,
    {
        let width = self.request.width.sample(rng);
        let height = self.request.height.sample(rng);
        let padding = i64::from(self.request.outer_padding);

        let max_x = i64::from(bounds.width()) - i64::from(width) - padding;
        let max_y = i64::from(bounds.height()) - i64::from(height) - padding;
        if max_x < padding || max_y < padding {
            return None;
        }

        let x = i32::try_from(rng.gen_range(padding..=max_x)).ok()?;
        let y = i32::try_from(rng.gen_range(padding..=max_y)).ok()?;
        Some(Rect::new(Position::new(x, y), Size::new(width, height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn oversized_request_is_rejected_without_panicking() {
        let placer = RoomPlacer::new(RoomRequest::new(
            4,
            InclusiveRange::new(6, 6),
            InclusiveRange::new(2, 2),
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(placer.draw_candidate(Size::new(7, 10), &mut rng).is_none());
    }
}
