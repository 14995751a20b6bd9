use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::cells::Cartesian2DCoordinate;

/// One entry in the A* open set.
///
/// Nodes are never changed after they are made. The path back to the start is shared between
/// nodes through the parent link, so extending a path by one step costs one node rather than a
/// copy of the whole history.
pub struct PathNode {
    position: Cartesian2DCoordinate,
    layer: Layer,
    path_cost: u32,
    estimate: f64,
    total_cost: f64,
    arrival: u64,
    parent: Option<Rc<PathNode>>,
}

/// Which level of a cell a node stands on. Planar mazes only ever use the surface.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Layer {
    Surface,
    /// Reserved for passages tunnelling under a cell.
    Under,
}

impl Layer {
    /// The bit this layer occupies in a cell's visited mask.
    #[inline]
    pub fn bit(self) -> u8 {
        match self {
            Layer::Surface => 1,
            Layer::Under => 2,
        }
    }
}

impl PathNode {
    /// The first node of a search, with no steps taken.
    pub fn start(position: Cartesian2DCoordinate, estimate: f64, arrival: u64) -> PathNode {
        PathNode {
            position,
            layer: Layer::Surface,
            path_cost: 0,
            estimate,
            total_cost: estimate,
            arrival,
            parent: None,
        }
    }

    /// A node one step on from `parent`.
    pub fn step_from(parent: &Rc<PathNode>,
                     position: Cartesian2DCoordinate,
                     layer: Layer,
                     estimate: f64,
                     arrival: u64)
                     -> PathNode {
        let path_cost = parent.path_cost + 1;
        PathNode {
            position,
            layer,
            path_cost,
            estimate,
            total_cost: f64::from(path_cost) + estimate,
            arrival,
            parent: Some(Rc::clone(parent)),
        }
    }

    #[inline]
    pub fn position(&self) -> Cartesian2DCoordinate {
        self.position
    }

    #[inline]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Steps taken from the start.
    #[inline]
    pub fn path_cost(&self) -> u32 {
        self.path_cost
    }

    /// Estimated steps remaining to the finish.
    #[inline]
    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Order in which the node joined the open set.
    #[inline]
    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    /// Positions from the start up to, but not including, this node.
    pub fn history(&self) -> Vec<Cartesian2DCoordinate> {
        let mut history = Vec::with_capacity(self.path_cost as usize);
        let mut ancestor = self.parent.as_ref();
        while let Some(node) = ancestor {
            history.push(node.position);
            ancestor = node.parent.as_ref();
        }
        history.reverse();
        history
    }

    /// Positions from the start up to and including this node.
    pub fn path(&self) -> Vec<Cartesian2DCoordinate> {
        let mut path = self.history();
        path.push(self.position);
        path
    }
}

impl fmt::Debug for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "PathNode :: position: {:?}, layer: {:?}, path_cost: {}, estimate: {}, arrival: {}",
               self.position, self.layer, self.path_cost, self.estimate, self.arrival)
    }
}

// Unlink the parent chain one node at a time, long corridors would otherwise drop recursively.
impl Drop for PathNode {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Rc::try_unwrap(node) {
                Ok(mut only_owner) => parent = only_owner.parent.take(),
                Err(_) => break,
            }
        }
    }
}

// Cheapest first, then earliest arrival first.
impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cost
            .total_cmp(&other.total_cost)
            .then_with(|| self.arrival.cmp(&other.arrival))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}
