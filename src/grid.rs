use error_chain::bail;
use std::fmt;
use std::slice;

use crate::cells::{is_open, Cartesian2DCoordinate, CellValue, CompassPrimary,
                   CoordinateSmallVec, ALL_DIRECTIONS};
use crate::errors::*;
use crate::grid_iterators::{RectBatchIter, RectGridCellIter};
use crate::units::{self, Height, Width};


/// A rectangular grid of cells, each cell a bitmask of the passages open out of it.
///
/// Passages are always two way: if a cell has a direction's bit set then the neighbour in that
/// direction has the opposite bit set. `link` and `unlink` are the only ways to change a cell, and
/// both keep that invariant.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<CellValue>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    NoNeighbour,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, cells: {:?}",
               self.width.0, self.height.0, self.cells)
    }
}

impl Grid {
    /// Create a grid with every passage closed.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        match units::cells_count(width, height) {
            Some(count) if count > 0 => {
                Ok(Grid {
                    width,
                    height,
                    cells: vec![0; count],
                })
            }
            _ => Err(ErrorKind::InvalidDimension(w, h).into()),
        }
    }

    /// Create a grid from row major cell values.
    ///
    /// Every open passage must be opened from both sides and lead to a cell on the grid, and no
    /// value may use bits beyond the four directions.
    pub fn from_cells(width: Width, height: Height, cells: Vec<CellValue>) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let grid = match units::cells_count(width, height) {
            Some(count) if count > 0 && count == cells.len() => Grid { width, height, cells },
            _ => bail!(ErrorKind::InvalidDimension(w, h)),
        };

        let all_directions_mask = ALL_DIRECTIONS.iter().fold(0, |mask, dir| mask | dir.bit());
        for (index, &cell) in grid.cells.iter().enumerate() {
            let coord = Cartesian2DCoordinate::from_row_major_index(index, width);
            let two_way = ALL_DIRECTIONS.iter().filter(|dir| is_open(cell, **dir)).all(|dir| {
                grid.neighbour_at_direction(coord, *dir)
                    .and_then(|neighbour| grid.cell(neighbour))
                    .map_or(false, |neighbour_cell| is_open(neighbour_cell, dir.opposite()))
            });
            if cell & !all_directions_mask != 0 || !two_way {
                bail!(ErrorKind::InvalidPassage(coord.x, coord.y));
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// The row major cell values.
    #[inline]
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// The passage bits of a cell, or None if the coordinate is not on the grid.
    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<CellValue> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    /// Open the passage from `coord` in `direction`, and from the neighbour back to `coord`.
    /// Returns the neighbour's coordinate.
    pub fn link(&mut self,
                coord: Cartesian2DCoordinate,
                direction: CompassPrimary)
                -> ::std::result::Result<Cartesian2DCoordinate, CellLinkError> {
        let (index, neighbour_index, neighbour) = self.passage_indices(coord, direction)?;
        self.cells[index] |= direction.bit();
        self.cells[neighbour_index] |= direction.opposite().bit();
        Ok(neighbour)
    }

    /// Close the passage from `coord` in `direction` in both cells.
    /// Returns true if a passage was open before.
    pub fn unlink(&mut self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        if let Ok((index, neighbour_index, _)) = self.passage_indices(coord, direction) {
            let was_open = is_open(self.cells[index], direction);
            self.cells[index] &= !direction.bit();
            self.cells[neighbour_index] &= !direction.opposite().bit();
            was_open
        } else {
            false
        }
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|cell| {
            ALL_DIRECTIONS.iter()
                          .filter(|dir| is_open(cell, **dir))
                          .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                          .collect()
        })
    }

    /// Cells to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        ALL_DIRECTIONS.iter()
                      .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                      .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction)
             .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        ALL_DIRECTIONS.iter()
                      .any(|dir| self.neighbour_at_direction(a, *dir) == Some(b) &&
                                 self.is_neighbour_linked(a, *dir))
    }

    pub fn is_neighbour_linked(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() &&
        self.cell(coord).map_or(false, |cell| is_open(cell, direction))
    }

    /// Number of open passages, each counted once no matter which of its two cells is asked.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    #[inline]
    pub fn iter(&self) -> RectGridCellIter {
        RectGridCellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> RectBatchIter {
        RectBatchIter::rows(self.width, self.height)
    }

    /// Each open passage once, as (cell, neighbour) where the neighbour is to the south or east.
    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            grid: self,
            cells_iter: self.cells.iter().enumerate(),
            pending_east: None,
        }
    }

    fn passage_indices(&self,
                       coord: Cartesian2DCoordinate,
                       direction: CompassPrimary)
                       -> ::std::result::Result<(usize, usize, Cartesian2DCoordinate), CellLinkError> {
        let index = self.grid_coordinate_to_index(coord)
                        .ok_or(CellLinkError::InvalidGridCoordinate)?;
        let neighbour = self.neighbour_at_direction(coord, direction)
                            .ok_or(CellLinkError::NoNeighbour)?;
        let neighbour_index = self.grid_coordinate_to_index(neighbour)
                                  .ok_or(CellLinkError::NoNeighbour)?;
        Ok((index, neighbour_index, neighbour))
    }
}

pub struct LinksIter<'a> {
    grid: &'a Grid,
    cells_iter: ::std::iter::Enumerate<slice::Iter<'a, CellValue>>,
    pending_east: Option<(Cartesian2DCoordinate, Cartesian2DCoordinate)>,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (Cartesian2DCoordinate, Cartesian2DCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(link) = self.pending_east.take() {
            return Some(link);
        }

        let grid = self.grid;
        while let Some((index, cell)) = self.cells_iter.next() {
            let coord = Cartesian2DCoordinate::from_row_major_index(index, grid.width);
            let passage = |dir| {
                if is_open(*cell, dir) {
                    grid.neighbour_at_direction(coord, dir).map(|n| (coord, n))
                } else {
                    None
                }
            };
            let south = passage(CompassPrimary::South);
            let east = passage(CompassPrimary::East);

            match (south, east) {
                (Some(s), e) => {
                    self.pending_east = e;
                    return Some(s);
                }
                (None, Some(e)) => return Some(e),
                (None, None) => {}
            }
        }

        None
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cells iter : {:?}", self.cells_iter)
    }
}
