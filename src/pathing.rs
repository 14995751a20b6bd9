//! Breadth first distances over a grid's passages.
//!
//! Every step between linked cells costs the same, so a plain flood fill gives the shortest
//! distance from one cell to all the others. This is the reference the A* solver is checked
//! against.

use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};


#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood the grid from `start_coordinate`.
    /// Returns None if the start coordinate is not on the grid.
    pub fn new(grid: &Grid, start_coordinate: Cartesian2DCoordinate) -> Option<Distances> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        // The distances map doubles as the visited set: the first time a cell is reached is
        // along a shortest route, so a cell already in the map is never updated.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links = grid.links(*cell_coord).unwrap_or_default();
                for link_coordinate in links.iter() {
                    if !distances.contains_key(link_coordinate) {
                        distances.insert(*link_coordinate, distance_to_cell + 1);
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// Steps from the start, None if the coordinate cannot be reached.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells can be reached from the start, the start included.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }
}

/// Walk back from `end_point` to the start of `distances_from_start`, always stepping to a linked
/// cell one closer to the start.
/// Returns the path from start to end inclusive, or None if the end point cannot be reached.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: Cartesian2DCoordinate)
                     -> Option<Vec<Cartesian2DCoordinate>> {

    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let closer = grid.links(current_coord)?
            .iter()
            .cloned()
            .find(|link| {
                distances_from_start.distance_from_start_to(*link)
                                    .map_or(false, |d| d + 1 == current_distance)
            });

        match closer {
            Some(closer_coord) => {
                current_coord = closer_coord;
                current_distance -= 1;
                path.push(current_coord);
            }
            // The grid has changed since the distances were worked out.
            None => return None,
        }
    }

    path.reverse();
    Some(path)
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::CompassPrimary;
    use crate::units::{Height, Width};

    static OUT_OF_GRID_COORDINATE: Cartesian2DCoordinate = Cartesian2DCoordinate {
        x: u32::MAX,
        y: u32::MAX,
    };

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn small_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).unwrap()
    }

    fn open_grid_2x2() -> Grid {
        let mut g = small_grid(2, 2);
        g.link(gc(0, 0), CompassPrimary::East).expect("Link Failed");
        g.link(gc(0, 0), CompassPrimary::South).expect("Link Failed");
        g.link(gc(1, 0), CompassPrimary::South).expect("Link Failed");
        g.link(gc(0, 1), CompassPrimary::East).expect("Link Failed");
        g
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let g = small_grid(3, 3);
        let distances = Distances::new(&g, OUT_OF_GRID_COORDINATE);
        assert!(distances.is_none());
    }

    #[test]
    fn start() {
        let g = small_grid(3, 3);
        let start_coordinate = gc(1, 1);
        let distances = Distances::new(&g, start_coordinate).unwrap();
        assert_eq!(start_coordinate, distances.start());
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = small_grid(3, 3);
        let start_coordinate = gc(0, 0);
        let distances = Distances::new(&g, start_coordinate).unwrap();
        for coord in g.iter() {
            let d = distances.distance_from_start_to(coord);
            if coord != start_coordinate {
                assert!(d.is_none());
            } else {
                assert_eq!(d, Some(0));
            }
        }
        assert_eq!(distances.reachable_count(), 1);
        assert_eq!(distances.distance_from_start_to(OUT_OF_GRID_COORDINATE), None);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_grid_2x2();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();

        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
    }

    #[test]
    fn path_on_open_grid() {
        let g = open_grid_2x2();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        let path = shortest_path(&g, &distances, gc(1, 1)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], gc(0, 0));
        assert_eq!(path[2], gc(1, 1));
        assert!(g.is_linked(path[0], path[1]) && g.is_linked(path[1], path[2]));

        assert_eq!(shortest_path(&g, &distances, gc(0, 0)), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn no_path_to_unreachable_cell() {
        let mut g = small_grid(3, 1);
        g.link(gc(0, 0), CompassPrimary::East).unwrap();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(shortest_path(&g, &distances, gc(2, 0)), None);
        assert_eq!(shortest_path(&g, &distances, gc(1, 0)), Some(vec![gc(0, 0), gc(1, 0)]));
    }
}
