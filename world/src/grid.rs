//! Dense tile matrix owned by the world.

use crawl_core::{GridError, Position, Rect, Size, Tile, TileKind};
use crawl_system_path_tracer::trace;
use crawl_system_rooms::{RoomPlacer, RoomSummary};
use rand::Rng;

/// Fixed-size row-major matrix of tiles plus the rooms carved into it.
///
/// Every accessor validates coordinates and reports
/// [`GridError::OutOfBounds`] instead of clamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: Size,
    tiles: Vec<Tile>,
    rooms: Vec<Rect>,
}

impl Grid {
    /// Creates a grid of unexcavated rock with no rooms.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let capacity = usize::try_from(size.area()).unwrap_or(0);
        Self {
            size,
            tiles: vec![Tile::fill(); capacity],
            rooms: Vec::new(),
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Rooms accepted during generation, in placement order.
    #[must_use]
    pub fn rooms(&self) -> &[Rect] {
        &self.rooms
    }

    /// Iterator over the tile rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.size.width()).unwrap_or(1).max(1);
        self.tiles.chunks(width)
    }

    /// Tile stored at `position`.
    pub fn tile_at(&self, position: Position) -> Result<&Tile, GridError> {
        let index = index_of(self.size, position)?;
        Ok(&self.tiles[index])
    }

    pub(crate) fn tile_at_mut(&mut self, position: Position) -> Result<&mut Tile, GridError> {
        let index = index_of(self.size, position)?;
        Ok(&mut self.tiles[index])
    }

    /// Overwrites the tile at `position`, returning the previous tile.
    pub(crate) fn replace(&mut self, position: Position, tile: Tile) -> Result<Tile, GridError> {
        let slot = self.tile_at_mut(position)?;
        Ok(std::mem::replace(slot, tile))
    }

    /// Every position holding a tile of `kind`, in row-major order.
    #[must_use]
    pub fn find_tiles(&self, kind: TileKind) -> Vec<Position> {
        let width = usize::try_from(self.size.width()).unwrap_or(1).max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.kind() == kind)
            .filter_map(|(index, _)| {
                let x = i32::try_from(index % width).ok()?;
                let y = i32::try_from(index / width).ok()?;
                Some(Position::new(x, y))
            })
            .collect()
    }

    /// Stores `tile` at `position` only if that cell is currently empty floor.
    ///
    /// Returns `Ok(false)` without touching the grid when the cell is occupied.
    pub fn place(&mut self, position: Position, tile: Tile) -> Result<bool, GridError> {
        let slot = self.tile_at_mut(position)?;
        if !slot.is_empty() {
            return Ok(false);
        }
        *slot = tile;
        Ok(true)
    }

    /// Draws uniform positions until `tile` lands on empty floor.
    ///
    /// Reports [`GridError::PlacementExhausted`] once `max_attempts` draws
    /// failed; callers decide whether that is fatal.
    pub fn place_randomly<R>(
        &mut self,
        tile: Tile,
        rng: &mut R,
        max_attempts: u32,
    ) -> Result<Position, GridError>
    where
        R: Rng + ?Sized,
    {
        let width = i32::try_from(self.size.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.size.height()).unwrap_or(i32::MAX);
        if width == 0 || height == 0 {
            return Err(GridError::PlacementExhausted { attempts: 0 });
        }

        for _ in 0..max_attempts {
            let position = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
            if self.place(position, tile)? {
                return Ok(position);
            }
        }
        Err(GridError::PlacementExhausted {
            attempts: max_attempts,
        })
    }

    /// Moves the tile at `from` onto `to` and leaves empty floor behind.
    ///
    /// The destination is overwritten unconditionally; whatever stood there is
    /// lost. Moving a tile onto itself leaves the grid untouched.
    pub fn move_entity(&mut self, from: Position, to: Position) -> Result<(), GridError> {
        let from_index = index_of(self.size, from)?;
        let to_index = index_of(self.size, to)?;
        if from_index == to_index {
            return Ok(());
        }

        let moved = std::mem::replace(&mut self.tiles[from_index], Tile::empty());
        self.tiles[to_index] = moved;
        Ok(())
    }

    /// Turns the cell at `position` into empty floor.
    pub fn carve(&mut self, position: Position) -> Result<(), GridError> {
        carve_cell(&mut self.tiles, self.size, position)
    }

    /// Turns every listed cell into empty floor, stopping at the first invalid one.
    pub fn carve_many<I>(&mut self, positions: I) -> Result<(), GridError>
    where
        I: IntoIterator<Item = Position>,
    {
        for position in positions {
            self.carve(position)?;
        }
        Ok(())
    }

    /// Records and carves `room` unless it collides with an existing room.
    ///
    /// Rooms reaching past the grid edge are reported before anything is recorded.
    pub fn place_room(&mut self, room: Rect) -> Result<bool, GridError> {
        let size = self.size;
        if let Some(position) = room.cells().find(|cell| !size.contains(*cell)) {
            return Err(GridError::OutOfBounds { position, size });
        }
        let tiles = &mut self.tiles;
        RoomPlacer::try_place(&mut self.rooms, room, |cell| carve_cell(tiles, size, cell))
    }

    /// Runs a random placement batch, carving every accepted room.
    pub fn place_rooms_randomly<R>(
        &mut self,
        placer: &RoomPlacer,
        rng: &mut R,
    ) -> Result<RoomSummary, GridError>
    where
        R: Rng + ?Sized,
    {
        let size = self.size;
        let tiles = &mut self.tiles;
        placer.place_randomly(size, &mut self.rooms, rng, |cell| {
            carve_cell(tiles, size, cell)
        })
    }

    /// Carves a traced corridor between the anchors of every pair of rooms.
    ///
    /// Returns the number of corridors carved.
    pub fn carve_corridors(&mut self) -> Result<usize, GridError> {
        let anchors: Vec<Position> = self.rooms.iter().map(Rect::position).collect();
        let mut corridors = 0;
        for (index, &from) in anchors.iter().enumerate() {
            for &to in &anchors[index + 1..] {
                self.carve_many(trace(from, to))?;
                corridors += 1;
            }
        }
        Ok(corridors)
    }
}

fn carve_cell(tiles: &mut [Tile], size: Size, position: Position) -> Result<(), GridError> {
    let index = index_of(size, position)?;
    tiles[index] = Tile::empty();
    Ok(())
}

fn index_of(size: Size, position: Position) -> Result<usize, GridError> {
    if !size.contains(position) {
        return Err(GridError::OutOfBounds { position, size });
    }

    let width = usize::try_from(size.width()).map_err(|_| GridError::OutOfBounds { position, size })?;
    let column = usize::try_from(position.x()).map_err(|_| GridError::OutOfBounds { position, size })?;
    let row = usize::try_from(position.y()).map_err(|_| GridError::OutOfBounds { position, size })?;
    Ok(row * width + column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawl_core::PlayerStats;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_grid(width: u32, height: u32) -> Grid {
        let mut grid = Grid::new(Size::new(width, height));
        let cells: Vec<_> = Rect::new(Position::new(0, 0), Size::new(width, height))
            .cells()
            .collect();
        grid.carve_many(cells).expect("cells inside grid");
        grid
    }

    #[test]
    fn new_grid_is_solid_rock() {
        let grid = Grid::new(Size::new(4, 3));
        assert_eq!(grid.find_tiles(TileKind::Fill).len(), 12);
        assert!(grid.rooms().is_empty());
        assert_eq!(grid.rows().count(), 3);
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let grid = Grid::new(Size::new(4, 3));
        for position in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(4, 0),
            Position::new(0, 3),
        ] {
            assert_eq!(
                grid.tile_at(position),
                Err(GridError::OutOfBounds {
                    position,
                    size: Size::new(4, 3),
                })
            );
        }
    }

    #[test]
    fn find_tiles_scans_row_major() {
        let mut grid = open_grid(3, 3);
        assert_eq!(grid.place(Position::new(2, 0), Tile::gold()), Ok(true));
        assert_eq!(grid.place(Position::new(0, 1), Tile::gold()), Ok(true));
        assert_eq!(grid.place(Position::new(1, 2), Tile::gold()), Ok(true));

        assert_eq!(
            grid.find_tiles(TileKind::Gold),
            vec![Position::new(2, 0), Position::new(0, 1), Position::new(1, 2)]
        );
    }

    #[test]
    fn place_refuses_occupied_cells() {
        let mut grid = open_grid(2, 2);
        let cell = Position::new(1, 1);
        assert_eq!(grid.place(cell, Tile::key()), Ok(true));
        assert_eq!(grid.place(cell, Tile::gold()), Ok(false));
        assert_eq!(grid.tile_at(cell).map(Tile::kind), Ok(TileKind::Key));

        let rock = Grid::new(Size::new(2, 2)).place(cell, Tile::gold());
        assert_eq!(rock, Ok(false));
    }

    #[test]
    fn place_randomly_exhausts_on_solid_rock() {
        let mut grid = Grid::new(Size::new(3, 3));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            grid.place_randomly(Tile::gold(), &mut rng, 50),
            Err(GridError::PlacementExhausted { attempts: 50 })
        );
    }

    #[test]
    fn place_randomly_finds_the_only_free_cell() {
        let mut grid = Grid::new(Size::new(3, 3));
        grid.carve(Position::new(1, 2)).expect("inside grid");
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        assert_eq!(
            grid.place_randomly(Tile::key(), &mut rng, 10_000),
            Ok(Position::new(1, 2))
        );
    }

    #[test]
    fn move_entity_overwrites_destination_and_clears_source() {
        let mut grid = open_grid(3, 1);
        let player = Tile::player(PlayerStats::default());
        let _ = grid.replace(Position::new(0, 0), player).expect("inside grid");
        let _ = grid.replace(Position::new(1, 0), Tile::gold()).expect("inside grid");

        grid.move_entity(Position::new(0, 0), Position::new(1, 0))
            .expect("inside grid");

        assert_eq!(grid.tile_at(Position::new(0, 0)), Ok(&Tile::empty()));
        assert_eq!(grid.tile_at(Position::new(1, 0)), Ok(&player));
    }

    #[test]
    fn move_entity_onto_itself_is_a_no_op() {
        let mut grid = open_grid(2, 1);
        let player = Tile::player(PlayerStats::default());
        let _ = grid.replace(Position::new(0, 0), player).expect("inside grid");

        grid.move_entity(Position::new(0, 0), Position::new(0, 0))
            .expect("inside grid");

        assert_eq!(grid.tile_at(Position::new(0, 0)), Ok(&player));
    }

    #[test]
    fn room_scenario_carves_interior_only() {
        let mut grid = Grid::new(Size::new(5, 5));
        let room = Rect::new(Position::new(1, 1), Size::new(3, 3));

        assert_eq!(grid.place_room(room), Ok(true));

        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                    TileKind::Empty
                } else {
                    TileKind::Fill
                };
                assert_eq!(
                    grid.tile_at(Position::new(x, y)).map(Tile::kind),
                    Ok(expected),
                    "cell ({x}, {y})",
                );
            }
        }
        assert_eq!(grid.rooms(), &[room]);
    }

    #[test]
    fn room_outside_grid_reports_out_of_bounds() {
        let mut grid = Grid::new(Size::new(4, 4));
        let room = Rect::new(Position::new(3, 3), Size::new(2, 2));
        assert_eq!(
            grid.place_room(room),
            Err(GridError::OutOfBounds {
                position: Position::new(4, 3),
                size: Size::new(4, 4),
            })
        );
        assert!(grid.rooms().is_empty());
    }

    #[test]
    fn corridors_join_every_room_anchor() {
        let mut grid = Grid::new(Size::new(12, 8));
        assert_eq!(
            grid.place_room(Rect::new(Position::new(1, 1), Size::new(2, 2))),
            Ok(true)
        );
        assert_eq!(
            grid.place_room(Rect::new(Position::new(8, 5), Size::new(2, 2))),
            Ok(true)
        );

        assert_eq!(grid.carve_corridors(), Ok(1));

        for cell in trace(Position::new(1, 1), Position::new(8, 5)) {
            assert_eq!(grid.tile_at(cell).map(Tile::kind), Ok(TileKind::Empty));
        }
    }
}
