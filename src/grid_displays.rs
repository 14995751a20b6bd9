use std::fmt;

use crate::cells::{is_open, Cartesian2DCoordinate, CellValue, CompassPrimary,
                   CoordinateSmallVec};
use crate::grid::Grid;
use crate::grid_traits::{GridDisplay, MazeView};
use crate::pathing::Distances;
use crate::utils::FnvHashSet;


impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        // Distances worked out on a different grid can still be asked about any coordinate.
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}


#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}


#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }

    /// Marks the start and finish of a maze.
    pub fn for_maze<M: MazeView>(maze: &M) -> StartEndPointsDisplay {
        let mut starts = CoordinateSmallVec::new();
        starts.push(maze.start());
        let mut ends = CoordinateSmallVec::new();
        ends.push(maze.finish());
        StartEndPointsDisplay::new(starts, ends)
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {

        let contains_coordinate =
            |coordinates: &CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            String::from(" S ")

        } else if contains_coordinate(&self.end_coordinates) {

            String::from(" E ")

        } else {
            String::from("   ")
        }
    }
}


/// How a cell is drawn when each cell only owns its east and south walls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellClass {
    /// Open to the east and the south.
    Floor,
    /// Wall on the east side only.
    Right,
    /// Wall on the south side only.
    Bottom,
    RightBottom,
}

impl CellClass {
    pub fn of(cell: CellValue) -> CellClass {
        match (is_open(cell, CompassPrimary::East), is_open(cell, CompassPrimary::South)) {
            (true, true) => CellClass::Floor,
            (false, true) => CellClass::Right,
            (true, false) => CellClass::Bottom,
            (false, false) => CellClass::RightBottom,
        }
    }

    /// Class names for a table based rendering.
    pub fn css_class(self) -> &'static str {
        match self {
            CellClass::Floor => "floor",
            CellClass::Right => "right",
            CellClass::Bottom => "bottom",
            CellClass::RightBottom => "right bottom",
        }
    }
}


/// Box drawing rendering of a grid, with an optional overlay drawn in each cell body.
pub struct TextRender<'a> {
    grid: &'a Grid,
    display: Option<&'a dyn GridDisplay>,
}

impl<'a> TextRender<'a> {
    pub fn new(grid: &'a Grid) -> TextRender<'a> {
        TextRender { grid, display: None }
    }

    pub fn with_display(grid: &'a Grid, display: &'a dyn GridDisplay) -> TextRender<'a> {
        TextRender {
            grid,
            display: Some(display),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", TextRender::new(self))
    }
}

impl<'a> fmt::Display for TextRender<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";
        let default_cell_body = String::from("   ");

        let grid = self.grid;
        let columns_count = grid.width().0;
        let rows_count = grid.height().0;

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        if let Some(first_grid_row) = grid.iter_row().next() {
            for (index, coord) in first_grid_row.iter().enumerate() {
                output.push_str(WALL_LR_3);
                let is_east_open = grid.is_neighbour_linked(*coord, CompassPrimary::East);
                if is_east_open {
                    output.push_str(WALL_LR);
                } else {
                    let is_last_cell = index == (columns_count - 1);
                    if is_last_cell {
                        output.push_str(WALL_LD);
                    } else {
                        output.push_str(WALL_LRD);
                    }
                }
            }
        }
        output.push_str("\n");

        for (index_row, row) in grid.iter_row().enumerate() {

            let is_last_row = index_row == (rows_count - 1);

            // The west most boundary of the row is a special case.
            // The top section of the cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::from("");

            for (index_column, cell_coord) in row.into_iter().enumerate() {

                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    if grid.is_neighbour_linked(cell_coord, direction) {
                        passage_clear_text
                    } else {
                        blocking_wall_text
                    }
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let east_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::East);
                let south_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::South);

                // Each cell uses the southern wall of the cell above as its northern wall, so only
                // the body, the eastern boundary and the southern boundary are drawn here.
                let east_boundary = render_cell_side(CompassPrimary::East, " ", WALL_UD);

                match self.display {
                    Some(displayer) => {
                        row_middle_section_render.push_str(&displayer.render_cell_body(cell_coord))
                    }
                    None => row_middle_section_render.push_str(&default_cell_body),
                }

                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = render_cell_side(CompassPrimary::South, "   ", WALL_LR_3);
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            grid.neighbour_at_direction(cell_coord, CompassPrimary::East)
                                .map_or(false,
                                        |c| grid.is_neighbour_linked(c, CompassPrimary::South));
                        let access_se_from_south =
                            grid.neighbour_at_direction(cell_coord, CompassPrimary::South)
                                .map_or(false,
                                        |c| grid.is_neighbour_linked(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push_str("\n");
            output.push_str(&row_bottom_section_render);
            output.push_str("\n");
        }

        write!(f, "{}", output)
    }
}
