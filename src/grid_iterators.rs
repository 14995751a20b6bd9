use crate::cells::Cartesian2DCoordinate;
use crate::units::{ColumnIndex, Height, RowIndex, Width};

/// Row major iteration over every coordinate of a grid.
#[derive(Debug, Copy, Clone)]
pub struct RectGridCellIter {
    width: Width,
    current_cell_number: usize,
    cells_count: usize,
}

impl RectGridCellIter {
    pub fn new(width: Width, height: Height) -> RectGridCellIter {
        RectGridCellIter {
            width,
            current_cell_number: 0,
            cells_count: width.0 * height.0,
        }
    }
}

impl ExactSizeIterator for RectGridCellIter {} // default impl using size_hint()
impl Iterator for RectGridCellIter {
    type Item = Cartesian2DCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Cartesian2DCoordinate::from_row_major_index(self.current_cell_number, self.width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Iteration over whole rows of a grid, top to bottom.
#[derive(Debug, Copy, Clone)]
pub struct RectBatchIter {
    current_index: usize,
    width: Width,
    height: Height,
}

impl RectBatchIter {
    pub fn rows(width: Width, height: Height) -> RectBatchIter {
        RectBatchIter {
            current_index: 0,
            width,
            height,
        }
    }
}

impl ExactSizeIterator for RectBatchIter {} // default impl using size_hint()
impl Iterator for RectBatchIter {
    type Item = Vec<Cartesian2DCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.height.0 {
            return None;
        }

        let row_index = RowIndex(self.current_index);
        let coords = (0..self.width.0)
            .map(|i: usize| Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(i), row_index))
            .collect();
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.height.0 - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
