#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns construction requests into world commands and
//! computes placement previews for the cursor.

use tower_defense_core::{CellCoord, Command, InputRequest, PlacementError, TowerKind, Vector2D};

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Cell the tower would occupy, set only when that cell accepts a tower.
    /// `None` when the cursor is outside the grid or over a path or occupied cell.
    pub cell: Option<CellCoord>,
    /// Centre of the cell under the cursor.
    pub center: Vector2D,
    /// Whether the cell is free for construction.
    pub placeable: bool,
    /// Whether the player can pay for the tower.
    pub affordable: bool,
    /// Reason the cell itself refuses the tower, if any.
    pub rejection: Option<PlacementError>,
}

impl PlacementPreview {
    /// Reports whether confirming the preview would place a tower.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.placeable && self.affordable
    }
}

/// Snaps a pixel position to the centre of the tile containing it.
#[must_use]
pub fn snap_to_cell_center(x: i32, y: i32, tile_size: u32) -> Vector2D {
    let tile = i64::from(tile_size.max(1));
    let snap = |value: i32| (i64::from(value).div_euclid(tile) * tile + tile / 2) as f32;
    Vector2D::new(snap(x), snap(y))
}

/// Construction system that translates input requests into placement commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits the world command matching a construction or pause request.
    ///
    /// Wave requests are not construction requests and are ignored; the
    /// world performs every validation and reports rejections as events.
    pub fn handle(&mut self, request: InputRequest, out: &mut Vec<Command>) {
        match request {
            InputRequest::PlaceTower { x, y, kind } => out.push(Command::PlaceTower { kind, x, y }),
            InputRequest::UpgradeTower { tower } => out.push(Command::UpgradeTower { tower }),
            InputRequest::RemoveTower { tower } => out.push(Command::RemoveTower { tower }),
            InputRequest::PauseToggle => out.push(Command::TogglePause),
            InputRequest::StartWave => {}
        }
    }

    /// Describes what confirming a placement of `kind` at the cursor would do.
    ///
    /// The `placement_cell` closure should mirror the semantics of the
    /// world's path map placement check.
    pub fn preview<F>(
        &self,
        kind: TowerKind,
        x: i32,
        y: i32,
        tile_size: u32,
        money: u32,
        mut placement_cell: F,
    ) -> PlacementPreview
    where
        F: FnMut(i32, i32) -> Result<CellCoord, PlacementError>,
    {
        let (cell, rejection) = match placement_cell(x, y) {
            Ok(cell) => (Some(cell), None),
            Err(reason) => (None, Some(reason)),
        };

        PlacementPreview {
            kind,
            cell,
            center: snap_to_cell_center(x, y, tile_size),
            placeable: rejection.is_none(),
            affordable: money >= kind.cost(),
            rejection,
        }
    }
}
