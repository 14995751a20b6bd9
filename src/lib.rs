//! **mazes** carves perfect mazes with a seeded recursive backtracker and finds routes through
//! them with a step by step A* search.
//!
//! A maze is a `grid::Grid` of cells, each cell a bitmask of the passages open out of it. The
//! generator owns the grid while carving and hands it over finished; from then on it is only read,
//! through a `maze::Maze` that adds the start and finish points the solver works between.

pub mod astar;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_traits;
pub mod maze;
pub mod path_node;
pub mod pathing;
pub mod units;
mod utils;
