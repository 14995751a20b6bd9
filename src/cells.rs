//! Cell values, directions and coordinates.
//!
//! A cell is a small bitmask: one bit per cardinal direction whose passage is open. Directions
//! combine with bitwise or, so a cell value of `North | East` (5) has passages to the north and
//! east.

use smallvec::SmallVec;
use std::convert::From;
use std::ops::BitOr;

use crate::units::{ColumnIndex, RowIndex, Width};

/// Bitmask of open passages out of a cell.
pub type CellValue = u8;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum CompassPrimary {
    North = 1,
    South = 2,
    East = 4,
    West = 8,
}

/// The four directions in the order their bits are numbered.
pub const ALL_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                 CompassPrimary::South,
                                                 CompassPrimary::East,
                                                 CompassPrimary::West];

impl CompassPrimary {
    /// The bit this direction occupies in a cell value.
    #[inline(always)]
    pub fn bit(self) -> CellValue {
        self as CellValue
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Unit column displacement, east is positive.
    #[inline]
    pub fn dx(self) -> i32 {
        match self {
            CompassPrimary::East => 1,
            CompassPrimary::West => -1,
            CompassPrimary::North | CompassPrimary::South => 0,
        }
    }

    /// Unit row displacement, south (down the page) is positive.
    #[inline]
    pub fn dy(self) -> i32 {
        match self {
            CompassPrimary::North => -1,
            CompassPrimary::South => 1,
            CompassPrimary::East | CompassPrimary::West => 0,
        }
    }

    /// The directions whose bits are set in `cell`, in bit order.
    pub fn open_in(cell: CellValue) -> DirectionSmallVec {
        ALL_DIRECTIONS.iter()
                      .cloned()
                      .filter(|dir| is_open(cell, *dir))
                      .collect()
    }
}

impl BitOr for CompassPrimary {
    type Output = CellValue;

    fn bitor(self, rhs: CompassPrimary) -> CellValue {
        self.bit() | rhs.bit()
    }
}

impl BitOr<CompassPrimary> for CellValue {
    type Output = CellValue;

    fn bitor(self, rhs: CompassPrimary) -> CellValue {
        self | rhs.bit()
    }
}

/// Is the passage out of `cell` in `direction` open?
#[inline(always)]
pub fn is_open(cell: CellValue, direction: CompassPrimary) -> bool {
    cell & direction.bit() != 0
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> Cartesian2DCoordinate {
        let Width(w) = width;
        Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    /// The coordinate one step away in `direction`.
    /// Returns None if that would leave the non-negative quadrant; the upper bounds are the grid's business.
    pub fn offset(self, direction: CompassPrimary) -> Option<Cartesian2DCoordinate> {
        let x = i64::from(self.x) + i64::from(direction.dx());
        let y = i64::from(self.y) + i64::from(direction.dy());
        if x < 0 || y < 0 || x > i64::from(u32::MAX) || y > i64::from(u32::MAX) {
            None
        } else {
            Some(Cartesian2DCoordinate::new(x as u32, y as u32))
        }
    }

    /// Straight line distance to `other`.
    pub fn euclidean_distance(self, other: Cartesian2DCoordinate) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}
