//! Static enemy route plus the tower placement grid rasterized from it.

use thiserror::Error;
use tower_defense_core::{CellCoord, CellState, PlacementError, Vector2D};

/// Reasons a [`PathMap`] cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The route needs a start and an end.
    #[error("a path needs at least two waypoints, got {0}")]
    TooFewWaypoints(usize),
    /// Tiles must have a positive edge length.
    #[error("tile size must be positive")]
    ZeroTileSize,
    /// The play area does not contain a single whole tile.
    #[error("play area {width}x{height} holds no whole tile of size {tile_size}")]
    EmptyGrid {
        /// Play area width in world units.
        width: u32,
        /// Play area height in world units.
        height: u32,
        /// Tile edge length in world units.
        tile_size: u32,
    },
}

/// Ordered enemy route and the placement grid derived from it.
///
/// The grid is rasterized once at construction. Only purely horizontal or
/// purely vertical segments (in grid space) are marked as [`CellState::Path`];
/// a diagonal segment leaves the cells it crosses placeable.
#[derive(Clone, Debug)]
pub struct PathMap {
    waypoints: Vec<Vector2D>,
    tile_size: u32,
    columns: u32,
    rows: u32,
    cells: Vec<CellState>,
}

impl PathMap {
    /// Builds a map covering `width` x `height` world units split into square tiles.
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        waypoints: Vec<Vector2D>,
    ) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()));
        }
        if tile_size == 0 {
            return Err(PathError::ZeroTileSize);
        }

        let columns = width / tile_size;
        let rows = height / tile_size;
        if columns == 0 || rows == 0 {
            return Err(PathError::EmptyGrid {
                width,
                height,
                tile_size,
            });
        }

        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut map = Self {
            waypoints,
            tile_size,
            columns,
            rows,
            cells: vec![CellState::Empty; capacity],
        };
        map.rasterize_path();
        Ok(map)
    }

    /// Waypoints enemies follow, in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vector2D] {
        &self.waypoints
    }

    /// Edge length of a grid cell in world units.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Dense cell states stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Sum of the lengths of every path segment.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .sum()
    }

    /// Maps a pixel position to the grid cell containing it.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellCoord> {
        let tile = i64::from(self.tile_size);
        let column = i64::from(x).div_euclid(tile);
        let row = i64::from(y).div_euclid(tile);
        self.cell_from_signed(column, row)
    }

    /// Current state of a grid cell, if it lies inside the grid.
    #[must_use]
    pub fn cell_state(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Centre of a grid cell in world units.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vector2D {
        let tile = self.tile_size as f32;
        let half = (self.tile_size / 2) as f32;
        Vector2D::new(
            cell.column() as f32 * tile + half,
            cell.row() as f32 * tile + half,
        )
    }

    /// Resolves the cell a tower would occupy, or why it cannot go there.
    pub fn placement_cell(&self, x: i32, y: i32) -> Result<CellCoord, PlacementError> {
        let cell = self.cell_at(x, y).ok_or(PlacementError::OutOfBounds)?;
        match self.cell_state(cell) {
            Some(CellState::Empty) => Ok(cell),
            Some(CellState::Path) => Err(PlacementError::OnPath),
            Some(CellState::Occupied) => Err(PlacementError::Occupied),
            None => Err(PlacementError::OutOfBounds),
        }
    }

    /// Reports whether a tower may be placed at the pixel position.
    #[must_use]
    pub fn can_place_tower(&self, x: i32, y: i32) -> bool {
        self.placement_cell(x, y).is_ok()
    }

    /// Marks the cell under the pixel position as occupied.
    ///
    /// Returns `false` without side effects when the cell is not placeable.
    pub fn place_tower(&mut self, x: i32, y: i32) -> bool {
        let Ok(cell) = self.placement_cell(x, y) else {
            return false;
        };
        self.set(cell, CellState::Occupied)
    }

    /// Releases an occupied cell back to [`CellState::Empty`].
    ///
    /// Returns `false` when the cell was not occupied.
    pub fn remove_tower(&mut self, x: i32, y: i32) -> bool {
        let Some(cell) = self.cell_at(x, y) else {
            return false;
        };
        if self.cell_state(cell) != Some(CellState::Occupied) {
            return false;
        }
        self.set(cell, CellState::Empty)
    }

    fn rasterize_path(&mut self) {
        let tile = self.tile_size as f32;
        let segments: Vec<((i64, i64), (i64, i64))> = self
            .waypoints
            .windows(2)
            .map(|pair| {
                let start = (grid_index(pair[0].x(), tile), grid_index(pair[0].y(), tile));
                let end = (grid_index(pair[1].x(), tile), grid_index(pair[1].y(), tile));
                (start, end)
            })
            .collect();

        for ((start_column, start_row), (end_column, end_row)) in segments {
            if start_row == end_row {
                for column in start_column.min(end_column)..=start_column.max(end_column) {
                    self.mark_path(column, start_row);
                }
            } else if start_column == end_column {
                for row in start_row.min(end_row)..=start_row.max(end_row) {
                    self.mark_path(start_column, row);
                }
            }
        }
    }

    fn mark_path(&mut self, column: i64, row: i64) {
        if let Some(cell) = self.cell_from_signed(column, row) {
            let _ = self.set(cell, CellState::Path);
        }
    }

    fn set(&mut self, cell: CellCoord, state: CellState) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = state;
                true
            }
            None => false,
        }
    }

    fn cell_from_signed(&self, column: i64, row: i64) -> Option<CellCoord> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn grid_index(coordinate: f32, tile: f32) -> i64 {
    (coordinate / tile).floor() as i64
}
