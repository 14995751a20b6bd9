//! Newtypes for the quantities passed across the grid API so a width is never confused with a height.

/// Number of columns in a maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
/// Number of rows in a maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnIndex(pub usize);

/// The number of cells in a `width` by `height` maze, if it is addressable with `u32` coordinates.
pub fn cells_count(width: Width, height: Height) -> Option<usize> {
    let (Width(w), Height(h)) = (width, height);
    if w > u32::MAX as usize || h > u32::MAX as usize {
        return None;
    }
    w.checked_mul(h)
}
