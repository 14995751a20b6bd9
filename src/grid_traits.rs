use crate::cells::{Cartesian2DCoordinate, CellValue, CompassPrimary, DirectionSmallVec};
use crate::units::{Height, Width};

/// What a solver needs to know about a maze.
pub trait MazeView {
    /// Where a solution path begins.
    fn start(&self) -> Cartesian2DCoordinate;

    /// Where a solution path ends.
    fn finish(&self) -> Cartesian2DCoordinate;

    fn width(&self) -> Width;

    fn height(&self) -> Height;

    /// The passage bits open at a cell. Coordinates off the maze have no passages.
    fn cell_at(&self, coord: Cartesian2DCoordinate) -> CellValue;

    /// Directions worth trying out of a cell.
    ///
    /// This is at least every direction open in `cell_at`. Callers still check the cell bits and
    /// the bounds of whatever lies in each direction.
    fn potential_exits(&self, coord: Cartesian2DCoordinate) -> DirectionSmallVec;

    fn in_bounds(&self, coord: Cartesian2DCoordinate) -> bool;

    #[inline]
    fn opposite(&self, direction: CompassPrimary) -> CompassPrimary {
        direction.opposite()
    }

    #[inline]
    fn dx(&self, direction: CompassPrimary) -> i32 {
        direction.dx()
    }

    #[inline]
    fn dy(&self, direction: CompassPrimary) -> i32 {
        direction.dy()
    }

    /// The in bounds coordinate one step from `coord` in `direction`, if there is one.
    fn move_towards(&self,
                    coord: Cartesian2DCoordinate,
                    direction: CompassPrimary)
                    -> Option<Cartesian2DCoordinate> {
        let x = i64::from(coord.x) + i64::from(self.dx(direction));
        let y = i64::from(coord.y) + i64::from(self.dy(direction));
        if x < 0 || y < 0 || x > i64::from(u32::MAX) || y > i64::from(u32::MAX) {
            return None;
        }
        Some(Cartesian2DCoordinate::new(x as u32, y as u32)).filter(|next| self.in_bounds(*next))
    }
}

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}
