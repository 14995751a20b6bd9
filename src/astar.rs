//! A* search for the shortest path through a maze.
//!
//! The solver is driven one `step` at a time so a caller can draw the search as it goes, pause it,
//! or give up on it. Each step expands at most one cell, and each cell is expanded at most once per
//! layer, so any maze is finished within `width * height` steps.
//!
//! Works on mazes with loops and on mazes cut into disconnected parts as well as perfect mazes,
//! though a perfect maze only ever has one route to find.

use bit_set::BitSet;
use log::{debug, trace};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;

use crate::cells::{is_open, Cartesian2DCoordinate};
use crate::grid_traits::MazeView;
pub use crate::path_node::Layer;
use crate::path_node::PathNode;
use crate::units::{Height, Width};
use crate::utils::{self, FnvHashMap};

const LAYERS_COUNT: usize = 2;

/// Straight line distance to the finish. Never more than the steps still needed, as each step
/// moves one cell along one axis.
#[inline]
pub fn estimate(from: Cartesian2DCoordinate, finish: Cartesian2DCoordinate) -> f64 {
    from.euclidean_distance(finish)
}

/// Which (cell, layer) pairs have been expanded.
#[derive(Debug, Clone)]
pub struct VisitedTable {
    visits: BitSet,
    width: Width,
    height: Height,
}

impl VisitedTable {
    pub fn new(width: Width, height: Height) -> VisitedTable {
        VisitedTable {
            visits: BitSet::with_capacity(width.0 * height.0 * LAYERS_COUNT),
            width,
            height,
        }
    }

    /// Record a visit. Returns false if it was visited already or is not on the grid.
    pub fn visit(&mut self, coord: Cartesian2DCoordinate, layer: Layer) -> bool {
        match self.bit_index(coord, layer) {
            Some(index) => self.visits.insert(index),
            None => false,
        }
    }

    /// Coordinates off the grid count as visited, nothing there can be expanded.
    pub fn is_visited(&self, coord: Cartesian2DCoordinate, layer: Layer) -> bool {
        self.bit_index(coord, layer)
            .map_or(true, |index| self.visits.contains(index))
    }

    /// The layer bits visited at a cell.
    pub fn mask(&self, coord: Cartesian2DCoordinate) -> u8 {
        [Layer::Surface, Layer::Under].iter()
                                      .filter(|layer| {
                                          self.bit_index(coord, **layer)
                                              .map_or(false, |index| self.visits.contains(index))
                                      })
                                      .fold(0, |mask, layer| mask | layer.bit())
    }

    fn bit_index(&self, coord: Cartesian2DCoordinate, layer: Layer) -> Option<usize> {
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width.0 || y >= self.height.0 {
            return None;
        }
        let layer_offset = match layer {
            Layer::Surface => 0,
            Layer::Under => 1,
        };
        Some((y * self.width.0 + x) * LAYERS_COUNT + layer_offset)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverState {
    Searching,
    /// The path from start to finish inclusive.
    Solved(Vec<Cartesian2DCoordinate>),
    /// Every reachable cell was expanded without finding the finish.
    Exhausted,
}

/// What a single step did.
#[derive(Debug, Clone)]
pub enum Step {
    /// This node's cell was expanded and its unvisited neighbours joined the open set.
    Expanded(Rc<PathNode>),
    /// This node is at the finish.
    Solved(Rc<PathNode>),
    /// The open set is empty, there is no path.
    Exhausted,
}

pub struct Solver<'m, M: MazeView> {
    maze: &'m M,
    finish: Cartesian2DCoordinate,
    open: BinaryHeap<Reverse<Rc<PathNode>>>,
    // Cheapest total cost of any node queued per (position, layer).
    queued: FnvHashMap<(Cartesian2DCoordinate, Layer), f64>,
    visits: VisitedTable,
    arrivals: u64,
    expansions: usize,
    state: SolverState,
    terminal: Option<Rc<PathNode>>,
}

impl<'m, M: MazeView> Solver<'m, M> {
    /// A solver searching from the maze's start to its finish.
    pub fn new(maze: &'m M) -> Solver<'m, M> {
        let (start, finish) = (maze.start(), maze.finish());
        let (width, height) = (maze.width(), maze.height());
        let mut solver = Solver {
            maze,
            finish,
            open: BinaryHeap::new(),
            queued: utils::fnv_hashmap(width.0 + height.0),
            visits: VisitedTable::new(width, height),
            arrivals: 0,
            expansions: 0,
            state: SolverState::Searching,
            terminal: None,
        };
        let first = PathNode::start(start, estimate(start, finish), solver.next_arrival());
        solver.enqueue(first);
        solver
    }

    #[inline]
    pub fn state(&self) -> &SolverState {
        &self.state
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.state == SolverState::Searching
    }

    /// Number of cells expanded so far.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    #[inline]
    pub fn visits(&self) -> &VisitedTable {
        &self.visits
    }

    /// The path found, once solved.
    pub fn solution(&self) -> Option<&[Cartesian2DCoordinate]> {
        match self.state {
            SolverState::Solved(ref path) => Some(path),
            _ => None,
        }
    }

    /// The open set in the order it will be expanded, one node per position.
    pub fn open_nodes(&self) -> Vec<Rc<PathNode>> {
        let mut nodes: Vec<Rc<PathNode>> = self.open
            .iter()
            .filter(|entry| !self.is_superseded(&entry.0))
            .map(|entry| Rc::clone(&entry.0))
            .collect();
        nodes.sort();
        nodes
    }

    /// The path to the most promising node still open, or the solution once solved.
    pub fn current_solution(&self) -> Option<Vec<Cartesian2DCoordinate>> {
        match self.state {
            SolverState::Solved(ref path) => Some(path.clone()),
            SolverState::Exhausted => None,
            SolverState::Searching => self.open.peek().map(|entry| entry.0.path()),
        }
    }

    /// Expand the most promising open node.
    ///
    /// Once the search has ended every further step reports the same end again.
    pub fn step(&mut self) -> Step {
        match self.state {
            SolverState::Searching => {}
            SolverState::Solved(_) => {
                if let Some(ref node) = self.terminal {
                    return Step::Solved(Rc::clone(node));
                }
            }
            SolverState::Exhausted => return Step::Exhausted,
        }

        let current = match self.open.pop() {
            Some(Reverse(node)) => node,
            None => {
                self.exhaust();
                return Step::Exhausted;
            }
        };

        if current.position() == self.finish {
            let path = current.path();
            debug!("Solved after {} expansions, path of {} cells", self.expansions, path.len());
            self.state = SolverState::Solved(path);
            self.terminal = Some(Rc::clone(&current));
            self.open.clear();
            self.queued.clear();
            return Step::Solved(current);
        }

        self.expand(&current);
        self.discard_stale();
        if self.open.is_empty() {
            self.exhaust();
        }

        Step::Expanded(current)
    }

    /// Step until the search ends, returning the path if there is one.
    pub fn solve(&mut self) -> Option<Vec<Cartesian2DCoordinate>> {
        while self.is_searching() {
            self.step();
        }
        self.solution().map(|path| path.to_vec())
    }

    fn expand(&mut self, current: &Rc<PathNode>) {
        let position = current.position();
        self.visits.visit(position, current.layer());
        self.expansions += 1;

        let cell = self.maze.cell_at(position);
        for direction in self.maze.potential_exits(position).iter().cloned() {
            if !is_open(cell, direction) {
                continue;
            }
            let neighbour = match self.maze.move_towards(position, direction) {
                Some(coord) => coord,
                None => continue,
            };
            let layer = Layer::Surface;
            if self.visits.is_visited(neighbour, layer) {
                continue;
            }

            let arrival = self.next_arrival();
            let node = PathNode::step_from(current,
                                           neighbour,
                                           layer,
                                           estimate(neighbour, self.finish),
                                           arrival);
            self.enqueue(node);
        }

        trace!("Expanded {:?} at cost {}, {} open", position, current.path_cost(), self.open.len());
    }

    // Queue a node unless one at least as cheap is already queued for the same place.
    fn enqueue(&mut self, node: PathNode) {
        let key = (node.position(), node.layer());
        let cheaper_queued = self.queued
            .get(&key)
            .map_or(false, |queued_cost| *queued_cost <= node.total_cost());
        if !cheaper_queued {
            self.queued.insert(key, node.total_cost());
            self.open.push(Reverse(Rc::new(node)));
        }
    }

    // A node whose place is already expanded, or which a cheaper node for the same place replaced.
    // Superseded nodes stay in the heap until they reach the head and are never expanded.
    fn is_superseded(&self, node: &PathNode) -> bool {
        let key = (node.position(), node.layer());
        self.visits.is_visited(key.0, key.1) ||
        self.queued.get(&key).map_or(false, |cheapest| *cheapest < node.total_cost())
    }

    // Drop superseded nodes from the head of the open set.
    fn discard_stale(&mut self) {
        loop {
            let stale = match self.open.peek() {
                Some(entry) => self.is_superseded(&entry.0),
                None => break,
            };
            if stale {
                self.open.pop();
            } else {
                break;
            }
        }
    }

    fn exhaust(&mut self) {
        debug!("Exhausted after {} expansions, no path", self.expansions);
        self.state = SolverState::Exhausted;
        self.queued.clear();
    }

    fn next_arrival(&mut self) -> u64 {
        let arrival = self.arrivals;
        self.arrivals += 1;
        arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use crate::cells::{CompassPrimary, ALL_DIRECTIONS};
    use crate::generators;
    use crate::grid::Grid;
    use crate::maze::Maze;
    use crate::pathing::{self, Distances};

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn open_grid(w: usize, h: usize) -> Grid {
        let mut g = Grid::new(Width(w), Height(h)).unwrap();
        for coord in g.iter().collect::<Vec<_>>() {
            for dir in ALL_DIRECTIONS.iter() {
                let _ = g.link(coord, *dir);
            }
        }
        g
    }

    fn bfs_length(maze: &Maze) -> Option<usize> {
        let distances = Distances::new(maze.grid(), maze.start())?;
        pathing::shortest_path(maze.grid(), &distances, maze.finish()).map(|path| path.len())
    }

    fn is_walkable(grid: &Grid, path: &[Cartesian2DCoordinate]) -> bool {
        path.windows(2).all(|pair| grid.is_linked(pair[0], pair[1]))
    }

    // Link `count` random cells to a random neighbour, opening loops in a perfect maze.
    fn open_random_passages(grid: &mut Grid, count: usize, rng: &mut XorShiftRng) {
        let (w, h) = (grid.width().0 as u32, grid.height().0 as u32);
        for _ in 0..count {
            let coord = gc(rng.gen_range(0..w), rng.gen_range(0..h));
            if let Some(dir) = ALL_DIRECTIONS.choose(rng) {
                let _ = grid.link(coord, *dir);
            }
        }
    }

    #[test]
    fn start_at_finish_is_solved_on_first_step() {
        let maze = Maze::new(Grid::new(Width(1), Height(1)).unwrap());
        let mut solver = Solver::new(&maze);
        assert!(solver.is_searching());
        match solver.step() {
            Step::Solved(node) => assert_eq!(node.path(), vec![gc(0, 0)]),
            other => panic!("expected Solved, got {:?}", other),
        }
        assert_eq!(solver.state(), &SolverState::Solved(vec![gc(0, 0)]));
        assert_eq!(solver.expansions(), 0);

        let grid = generators::generate(Width(4), Height(4), 1).unwrap();
        let maze = Maze::with_endpoints(grid, gc(2, 1), gc(2, 1)).unwrap();
        assert_eq!(Solver::new(&maze).solve(), Some(vec![gc(2, 1)]));
    }

    #[test]
    fn solves_the_seed_42_fixture() {
        let maze = Maze::new(generators::generate(Width(3), Height(3), 42).unwrap());
        let mut solver = Solver::new(&maze);
        let path = solver.solve().unwrap();
        assert_eq!(path, vec![gc(0, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(2, 2)]);
        assert_eq!(Some(path.len()), bfs_length(&maze));
        assert_eq!(solver.solution(), Some(&path[..]));
    }

    #[test]
    fn equal_costs_expand_in_arrival_order() {
        let maze = Maze::new(open_grid(2, 2));
        let mut solver = Solver::new(&maze);

        let expanded = |step: Step| match step {
            Step::Expanded(node) => node.position(),
            other => panic!("expected Expanded, got {:?}", other),
        };
        assert_eq!(expanded(solver.step()), gc(0, 0));
        // south is tried before east, both cost the same
        assert_eq!(expanded(solver.step()), gc(0, 1));
        assert_eq!(expanded(solver.step()), gc(1, 0));
        match solver.step() {
            Step::Solved(node) => {
                assert_eq!(node.history(), vec![gc(0, 0), gc(0, 1)]);
                assert_eq!(node.path_cost(), 2);
            }
            other => panic!("expected Solved, got {:?}", other),
        }
    }

    #[test]
    fn open_set_is_inspectable_between_steps() {
        let maze = Maze::new(open_grid(3, 3));
        let mut solver = Solver::new(&maze);
        assert_eq!(solver.current_solution(), Some(vec![gc(0, 0)]));
        solver.step();

        let open: Vec<Cartesian2DCoordinate> = solver.open_nodes().iter().map(|n| n.position()).collect();
        assert_eq!(open, vec![gc(0, 1), gc(1, 0)]);
        assert_eq!(solver.current_solution(), Some(vec![gc(0, 0), gc(0, 1)]));
        assert_eq!(solver.visits().mask(gc(0, 0)), Layer::Surface.bit());
        assert_eq!(solver.visits().mask(gc(1, 1)), 0);
    }

    #[test]
    fn shortest_route_through_loops() {
        let maze = Maze::new(open_grid(6, 4));
        let path = Solver::new(&maze).solve().unwrap();
        assert_eq!(path.len(), 6 + 4 - 1);
        assert!(is_walkable(maze.grid(), &path));
        assert_eq!(path.first(), Some(&gc(0, 0)));
        assert_eq!(path.last(), Some(&gc(5, 3)));
    }

    #[test]
    fn disconnected_maze_is_exhausted() {
        let mut grid = Grid::new(Width(3), Height(1)).unwrap();
        grid.link(gc(0, 0), CompassPrimary::East).unwrap();
        let maze = Maze::new(grid);
        let mut solver = Solver::new(&maze);

        assert!(matches!(solver.step(), Step::Expanded(_)));
        assert!(matches!(solver.step(), Step::Expanded(_)));
        assert_eq!(solver.state(), &SolverState::Exhausted);
        assert!(matches!(solver.step(), Step::Exhausted));
        assert_eq!(solver.solution(), None);
        assert_eq!(solver.current_solution(), None);
    }

    #[test]
    fn steps_after_the_end_repeat_the_end() {
        let maze = Maze::new(generators::generate(Width(3), Height(3), 42).unwrap());
        let mut solver = Solver::new(&maze);
        let path = solver.solve().unwrap();
        for _ in 0..3 {
            match solver.step() {
                Step::Solved(node) => assert_eq!(node.path(), path),
                other => panic!("expected Solved, got {:?}", other),
            }
        }
    }

    #[test]
    fn blocked_perfect_maze_is_exhausted() {
        let mut grid = generators::generate(Width(8), Height(8), 77).unwrap();
        // cut the finish off from everything
        for dir in ALL_DIRECTIONS.iter() {
            grid.unlink(gc(7, 7), *dir);
        }
        let maze = Maze::new(grid);
        let reachable = Distances::new(maze.grid(), maze.start()).unwrap().reachable_count();
        let mut solver = Solver::new(&maze);
        assert_eq!(solver.solve(), None);
        assert_eq!(solver.state(), &SolverState::Exhausted);
        assert_eq!(solver.expansions(), reachable);
    }

    #[test]
    fn quickcheck_matches_breadth_first_search() {
        fn prop(w: u8, h: u8, seed: u64, start: (u8, u8), finish: (u8, u8)) -> TestResult {
            let (w, h) = (w as u32 % 20 + 1, h as u32 % 20 + 1);
            let grid = generators::generate(Width(w as usize), Height(h as usize), seed).unwrap();
            let start = gc(start.0 as u32 % w, start.1 as u32 % h);
            let finish = gc(finish.0 as u32 % w, finish.1 as u32 % h);
            let maze = Maze::with_endpoints(grid, start, finish).unwrap();

            let distances = Distances::new(maze.grid(), start).unwrap();
            let bfs_path = pathing::shortest_path(maze.grid(), &distances, finish).unwrap();
            let astar_path = Solver::new(&maze).solve().unwrap();

            // a perfect maze has exactly one simple path
            TestResult::from_bool(astar_path == bfs_path)
        }
        quickcheck(prop as fn(u8, u8, u64, (u8, u8), (u8, u8)) -> TestResult);
    }

    #[test]
    fn quickcheck_terminates_within_cell_count_steps() {
        fn prop(w: u8, h: u8, seed: u64, blocked: u8) -> TestResult {
            let (w, h) = (w as usize % 16 + 1, h as usize % 16 + 1);
            let mut grid = generators::generate(Width(w), Height(h), seed).unwrap();
            let mut rng = XorShiftRng::seed_from_u64(seed);
            generators::block_random_passages(&mut grid, blocked as usize % 4, &mut rng);
            let maze = Maze::new(grid);

            let mut solver = Solver::new(&maze);
            let mut steps = 0;
            while solver.is_searching() {
                solver.step();
                steps += 1;
                if steps > w * h {
                    return TestResult::failed();
                }
            }

            let reachable = bfs_length(&maze);
            let consistent = match *solver.state() {
                SolverState::Solved(ref path) => {
                    Some(path.len()) == reachable && is_walkable(maze.grid(), path)
                }
                SolverState::Exhausted => reachable.is_none(),
                SolverState::Searching => false,
            };
            TestResult::from_bool(consistent)
        }
        quickcheck(prop as fn(u8, u8, u64, u8) -> TestResult);
    }

    #[test]
    fn frontier_keeps_one_node_per_position_through_loops() {
        for seed in 0..200 {
            let mut grid = generators::generate(Width(8), Height(8), seed).unwrap();
            let mut rng = XorShiftRng::seed_from_u64(seed);
            open_random_passages(&mut grid, 24, &mut rng);
            let maze = Maze::new(grid);
            let mut solver = Solver::new(&maze);

            while solver.is_searching() {
                let frontier = solver.open_nodes();
                let positions: Vec<Cartesian2DCoordinate> =
                    frontier.iter().map(|node| node.position()).collect();
                assert_eq!(positions.iter().unique().count(), positions.len(),
                           "seed {} frontier {:?}", seed, positions);

                // the head of the listing is what the next step takes
                let next = match solver.step() {
                    Step::Expanded(node) | Step::Solved(node) => node.position(),
                    Step::Exhausted => panic!("seed {}: a loop maze is connected", seed),
                };
                assert_eq!(positions.first(), Some(&next));
            }
        }
    }

    #[test]
    fn quickcheck_loops_are_solved_optimally_in_cell_count_steps() {
        fn prop(w: u8, h: u8, seed: u64, extra: u8, blocked: u8) -> TestResult {
            let (w, h) = (w as usize % 12 + 1, h as usize % 12 + 1);
            let mut grid = generators::generate(Width(w), Height(h), seed).unwrap();
            let mut rng = XorShiftRng::seed_from_u64(seed);
            open_random_passages(&mut grid, extra as usize % 24, &mut rng);
            generators::block_random_passages(&mut grid, blocked as usize % 6, &mut rng);
            let maze = Maze::new(grid);

            let mut solver = Solver::new(&maze);
            let mut steps = 0;
            while solver.is_searching() {
                solver.step();
                steps += 1;
                if steps > w * h {
                    return TestResult::failed();
                }
            }

            let distances = Distances::new(maze.grid(), maze.start()).unwrap();
            if solver.expansions() > distances.reachable_count() {
                return TestResult::failed();
            }
            let consistent = match *solver.state() {
                SolverState::Solved(ref path) => {
                    Some(path.len()) == bfs_length(&maze) && is_walkable(maze.grid(), path)
                }
                SolverState::Exhausted => {
                    bfs_length(&maze).is_none() &&
                    solver.expansions() == distances.reachable_count()
                }
                SolverState::Searching => false,
            };
            TestResult::from_bool(consistent)
        }
        quickcheck(prop as fn(u8, u8, u64, u8, u8) -> TestResult);
    }

    #[test]
    fn visited_table_layers() {
        let mut visits = VisitedTable::new(Width(2), Height(2));
        assert!(visits.visit(gc(1, 1), Layer::Surface));
        assert!(!visits.visit(gc(1, 1), Layer::Surface));
        assert!(visits.visit(gc(1, 1), Layer::Under));
        assert_eq!(visits.mask(gc(1, 1)), 3);
        assert_eq!(visits.mask(gc(0, 1)), 0);
        assert!(!visits.is_visited(gc(0, 1), Layer::Surface));

        assert!(!visits.visit(gc(2, 0), Layer::Surface));
        assert!(visits.is_visited(gc(2, 0), Layer::Surface));
    }

    #[test]
    fn heuristic_is_straight_line_distance() {
        assert_eq!(estimate(gc(0, 0), gc(0, 0)), 0.0);
        assert!((estimate(gc(1, 1), gc(4, 5)) - 5.0).abs() < 1e-12);
    }
}
