//! Search algorithms operating on a [Grid]. Every solver implements [GridSolver]; the informed
//! ones share the open-list entry and step costs defined here.
use crate::grid::Grid;
use crate::heap::Heap;
use crate::observer::{NoopObserver, SearchObserver};
use crate::path::expand_path;
use crate::{Point, SQRT_2};
use std::cmp::Ordering;
use std::fmt;

pub mod astar;
pub mod bidirectional;
pub mod breadth_first;
pub mod ida_star;
pub mod jps;
mod jump_rules;

pub use astar::AstarSolver;
pub use bidirectional::{BiAstarSolver, BiBreadthFirstSolver};
pub use breadth_first::BreadthFirstSolver;
pub use ida_star::IdaStarSolver;
pub use jps::JPSSolver;

pub trait GridSolver: fmt::Debug {
    /// Searches a path from `start` to `goal`, reporting progress to `observer`. Returns the
    /// path including both endpoints, or an empty vector if there is none. The node records
    /// of `grid` are left describing this search.
    fn find_path_observed(
        &self,
        start: Point,
        goal: Point,
        grid: &mut Grid,
        observer: &mut dyn SearchObserver,
    ) -> Vec<Point>;

    fn find_path(&self, start: Point, goal: Point, grid: &mut Grid) -> Vec<Point> {
        self.find_path_observed(start, goal, grid, &mut NoopObserver)
    }

    /// Like [find_path](Self::find_path), with jumps between non-adjacent waypoints filled in
    /// with unit steps.
    fn find_expanded_path(&self, start: Point, goal: Point, grid: &mut Grid) -> Vec<Point> {
        expand_path(&self.find_path(start, goal, grid))
    }
}

/// Arena indices of the endpoints, or [None] if either of them is outside the grid or blocked.
pub(crate) fn endpoints(grid: &Grid, start: &Point, goal: &Point) -> Option<(usize, usize)> {
    Some((grid.walkable_index(start)?, grid.walkable_index(goal)?))
}

/// Cost of a single step between adjacent cells.
#[inline]
pub(crate) fn step_cost(a: &Point, b: &Point) -> f64 {
    if a.x == b.x || a.y == b.y {
        1.0
    } else {
        SQRT_2
    }
}

/// Entry of an open list. Entries are equal when they refer to the same node, which is what
/// [Heap::update_item] uses to find the entry whose cost decreased.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenNode {
    pub ix: usize,
    pub f: f64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.ix == other.ix
    }
}

impl OpenNode {
    fn by_f(a: &OpenNode, b: &OpenNode) -> Ordering {
        a.f.total_cmp(&b.f)
    }
}

pub(crate) type OpenList = Heap<OpenNode>;

pub(crate) fn open_list() -> OpenList {
    Heap::with_comparator(OpenNode::by_f as fn(&OpenNode, &OpenNode) -> Ordering)
}
