//! A finished grid together with the two points a solver travels between.

use error_chain::bail;

use crate::cells::{Cartesian2DCoordinate, CellValue, CompassPrimary, DirectionSmallVec};
use crate::errors::*;
use crate::grid::Grid;
use crate::grid_traits::MazeView;
use crate::units::{Height, Width};

/// Read only view of a carved grid.
///
/// The grid can no longer be changed once it is wrapped; get it back with `into_grid` to carve
/// again.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    start: Cartesian2DCoordinate,
    finish: Cartesian2DCoordinate,
}

impl Maze {
    /// A maze running from the top left cell to the bottom right cell.
    pub fn new(grid: Grid) -> Maze {
        let finish = Cartesian2DCoordinate::new(grid.width().0 as u32 - 1, grid.height().0 as u32 - 1);
        Maze {
            grid,
            start: Cartesian2DCoordinate::new(0, 0),
            finish,
        }
    }

    pub fn with_endpoints(grid: Grid,
                          start: Cartesian2DCoordinate,
                          finish: Cartesian2DCoordinate)
                          -> Result<Maze> {
        for point in &[start, finish] {
            if !grid.is_valid_coordinate(*point) {
                bail!(ErrorKind::InvalidCoordinate(point.x, point.y));
            }
        }
        Ok(Maze { grid, start, finish })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

impl MazeView for Maze {
    #[inline]
    fn start(&self) -> Cartesian2DCoordinate {
        self.start
    }

    #[inline]
    fn finish(&self) -> Cartesian2DCoordinate {
        self.finish
    }

    #[inline]
    fn width(&self) -> Width {
        self.grid.width()
    }

    #[inline]
    fn height(&self) -> Height {
        self.grid.height()
    }

    #[inline]
    fn cell_at(&self, coord: Cartesian2DCoordinate) -> CellValue {
        self.grid.cell(coord).unwrap_or(0)
    }

    fn potential_exits(&self, coord: Cartesian2DCoordinate) -> DirectionSmallVec {
        CompassPrimary::open_in(self.cell_at(coord))
    }

    #[inline]
    fn in_bounds(&self, coord: Cartesian2DCoordinate) -> bool {
        self.grid.is_valid_coordinate(coord)
    }
}
