use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, DirectionSmallVec, ALL_DIRECTIONS};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Width used when none is asked for.
pub const DEFAULT_WIDTH: usize = 10;

/// How to build a maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Number of columns.
    pub width: usize,
    /// Number of rows, the same as the width if not given.
    pub height: Option<usize>,
    /// Seed for the carving random number stream, drawn from entropy if not given.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            width: DEFAULT_WIDTH,
            height: None,
            seed: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn new() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder { options: GeneratorOptions::default() }
    }

    pub fn width(mut self, width: usize) -> Self {
        self.options.width = width;
        self
    }

    pub fn height(mut self, height: Option<usize>) -> Self {
        self.options.height = height;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.options.seed = seed;
        self
    }

    pub fn build(self) -> GeneratorOptions {
        self.options
    }
}

/// A carved grid and the seed that carved it, so the run can be repeated.
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    pub grid: Grid,
    pub seed: u64,
}

impl GeneratorOptions {
    pub fn dimensions(&self) -> (Width, Height) {
        (Width(self.width), Height(self.height.unwrap_or(self.width)))
    }

    /// Carve a perfect maze as configured, drawing a seed from entropy if there is none.
    pub fn generate(&self) -> Result<GeneratedMaze> {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let (width, height) = self.dimensions();
        let grid = generate(width, height, seed)?;
        Ok(GeneratedMaze { grid, seed })
    }
}

/// Read a seed written as any 64 bit integer. Negative seeds wrap around to the top of the `u64`
/// range, so `-1` and `18446744073709551615` carve the same maze.
pub fn parse_seed(text: &str) -> Result<u64> {
    let text = text.trim();
    text.parse::<u64>()
        .or_else(|_| text.parse::<i64>().map(|signed| signed as u64))
        .map_err(|_| ErrorKind::InvalidSeed(text.to_string()).into())
}

/// Carve a perfect maze of the given size.
///
/// The same width, height and seed always carve the same maze.
pub fn generate(width: Width, height: Height, seed: u64) -> Result<Grid> {
    let mut grid = Grid::new(width, height)?;
    let mut rng = XorShiftRng::seed_from_u64(seed);
    debug!("Carving {}x{} maze with seed {}", width.0, height.0, seed);
    recursive_backtracker(&mut grid, &mut rng);
    Ok(grid)
}

/// Apply the recursive backtracker maze generation algorithm to a grid with no passages.
///
/// A depth first walk starting from the top left cell: each cell tries its four directions in a
/// shuffled order and carves into any neighbour that has no passages yet, walking on from there
/// before trying the rest. When a cell runs out of directions the walk backs up to the cell it came
/// from. Every cell is reached exactly once so the passages form a spanning tree.
///
/// The walk keeps its own stack on the heap, so the longest corridor is only bounded by memory.
pub fn recursive_backtracker(grid: &mut Grid, rng: &mut XorShiftRng) {
    struct Frame {
        coord: Cartesian2DCoordinate,
        directions: DirectionSmallVec,
        next_direction: usize,
    }

    let new_frame = |coord, rng: &mut XorShiftRng| {
        let mut directions: DirectionSmallVec = ALL_DIRECTIONS.iter().cloned().collect();
        directions.shuffle(rng);
        Frame {
            coord,
            directions,
            next_direction: 0,
        }
    };

    let mut carved = 0;
    let mut stack = vec![new_frame(Cartesian2DCoordinate::new(0, 0), rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next_direction >= frame.directions.len() {
            stack.pop();
            continue;
        }

        let direction = frame.directions[frame.next_direction];
        frame.next_direction += 1;
        let coord = frame.coord;

        let unvisited_neighbour = grid.neighbour_at_direction(coord, direction)
                                      .filter(|neighbour| grid.cell(*neighbour) == Some(0));
        if let Some(neighbour) = unvisited_neighbour {
            if grid.link(coord, direction).is_ok() {
                carved += 1;
                trace!("Carved {:?} from {:?} to {:?}", direction, coord, neighbour);
                stack.push(new_frame(neighbour, rng));
            }
        }
    }

    debug!("Carved {} passages", carved);
}

/// Close up to `count` randomly chosen open passages.
///
/// Closing passages in a perfect maze cuts it into disconnected regions. Returns the number of
/// passages closed, which is less than `count` only when the grid runs out of passages.
pub fn block_random_passages<R: Rng>(grid: &mut Grid, count: usize, rng: &mut R) -> usize {
    let mut open: Vec<(Cartesian2DCoordinate, CompassPrimary)> =
        grid.iter_links()
            .map(|(cell, neighbour)| {
                let direction = if neighbour.x > cell.x {
                    CompassPrimary::East
                } else {
                    CompassPrimary::South
                };
                (cell, direction)
            })
            .collect();

    let (chosen, _) = open.partial_shuffle(rng, count);
    for &(cell, direction) in chosen.iter() {
        grid.unlink(cell, direction);
    }

    let blocked = chosen.len();
    debug!("Blocked {} of {} requested passages", blocked, count);
    blocked
}
