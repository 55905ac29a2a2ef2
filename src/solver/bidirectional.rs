//! Searches growing one frontier from the start and one from the goal, expanding them in turn
//! until one of them touches a node discovered by the other.
use std::collections::VecDeque;

use log::debug;

use crate::grid::{DiagonalMovement, Grid};
use crate::heuristic::Heuristic;
use crate::node::Frontier;
use crate::observer::{SearchEvent, SearchObserver};
use crate::path::bi_backtrace_ix;
use crate::solver::{endpoints, open_list, step_cost, GridSolver, OpenList, OpenNode};
use crate::{Point, BEST_FIRST_FACTOR};

/// Joins the halves of a path at the edge between `node` of `frontier` and `other`, which was
/// discovered by the opposite frontier.
fn join(grid: &Grid, frontier: Frontier, node: usize, other: usize) -> Vec<Point> {
    match frontier {
        Frontier::ByStart => bi_backtrace_ix(grid, node, other),
        Frontier::ByEnd => bi_backtrace_ix(grid, other, node),
    }
}

/// Bidirectional A*. Each frontier estimates the distance to the root of the other one. The
/// frontiers stop at the first contact, so the path is only guaranteed to be cheapest on
/// 4-connected grids with unit weight; otherwise it is a good, fast approximation.
#[derive(Clone, Debug)]
pub struct BiAstarSolver {
    pub heuristic: Heuristic,
    pub weight: f64,
    pub diagonal_movement: DiagonalMovement,
}

impl BiAstarSolver {
    pub fn new(diagonal_movement: DiagonalMovement) -> BiAstarSolver {
        BiAstarSolver {
            heuristic: Heuristic::default_for(diagonal_movement),
            weight: 1.0,
            diagonal_movement,
        }
    }

    pub fn dijkstra(diagonal_movement: DiagonalMovement) -> BiAstarSolver {
        BiAstarSolver {
            weight: 0.0,
            ..BiAstarSolver::new(diagonal_movement)
        }
    }

    pub fn best_first(diagonal_movement: DiagonalMovement) -> BiAstarSolver {
        BiAstarSolver {
            weight: BEST_FIRST_FACTOR,
            ..BiAstarSolver::new(diagonal_movement)
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> BiAstarSolver {
        self.heuristic = heuristic;
        self
    }

    /// Multiplies the current weight, so a best-first solver stays greedy.
    pub fn with_weight(mut self, weight: f64) -> BiAstarSolver {
        self.weight *= weight;
        self
    }

    /// Pops and expands one node of `frontier`. Returns the joined path on contact with the
    /// other frontier.
    fn expand(
        &self,
        grid: &mut Grid,
        open: &mut OpenList,
        frontier: Frontier,
        target: &Point,
        observer: &mut dyn SearchObserver,
    ) -> Option<Vec<Point>> {
        let ix = open.pop()?.ix;
        let node = grid.nodes.get_mut(ix);
        node.closed = true;
        let g = node.g;
        let point = grid.point(ix);
        observer.on_event(SearchEvent::Closed { point });
        for n in grid.neighbors(&point, self.diagonal_movement) {
            let n_ix = grid.index(n.x, n.y);
            let neighbor = grid.nodes.get(n_ix);
            if neighbor.closed {
                continue;
            }
            if neighbor.opened == Some(frontier.opposite()) {
                return Some(join(grid, frontier, ix, n_ix));
            }
            let ng = g + step_cost(&point, &n);
            if neighbor.is_opened() && ng >= neighbor.g {
                continue;
            }
            let h = neighbor
                .h
                .unwrap_or_else(|| self.weight * self.heuristic.between(&n, target));
            let f = ng + h;
            let record = grid.nodes.get_mut(n_ix);
            record.g = ng;
            record.h = Some(h);
            record.f = f;
            record.parent = Some(ix);
            if neighbor.is_opened() {
                open.update_item(OpenNode { ix: n_ix, f });
            } else {
                record.opened = Some(frontier);
                open.push(OpenNode { ix: n_ix, f });
            }
            observer.on_event(SearchEvent::Opened { point: n, frontier });
        }
        None
    }
}

impl GridSolver for BiAstarSolver {
    fn find_path_observed(
        &self,
        start: Point,
        goal: Point,
        grid: &mut Grid,
        observer: &mut dyn SearchObserver,
    ) -> Vec<Point> {
        let Some((start_ix, goal_ix)) = endpoints(grid, &start, &goal) else {
            return Vec::new();
        };
        if start_ix == goal_ix {
            return vec![start];
        }
        grid.reset();
        let mut start_open = open_list();
        let mut end_open = open_list();
        for (open, ix, point, frontier) in [
            (&mut start_open, start_ix, start, Frontier::ByStart),
            (&mut end_open, goal_ix, goal, Frontier::ByEnd),
        ] {
            grid.nodes.get_mut(ix).opened = Some(frontier);
            open.push(OpenNode { ix, f: 0.0 });
            observer.on_event(SearchEvent::Opened { point, frontier });
        }

        while !start_open.is_empty() && !end_open.is_empty() {
            if let Some(path) =
                self.expand(grid, &mut start_open, Frontier::ByStart, &goal, observer)
            {
                return path;
            }
            if let Some(path) = self.expand(grid, &mut end_open, Frontier::ByEnd, &start, observer)
            {
                return path;
            }
        }
        debug!("Frontiers exhausted without meeting");
        Vec::new()
    }
}

/// Bidirectional breadth-first search.
#[derive(Clone, Debug)]
pub struct BiBreadthFirstSolver {
    pub diagonal_movement: DiagonalMovement,
}

impl BiBreadthFirstSolver {
    pub fn new(diagonal_movement: DiagonalMovement) -> BiBreadthFirstSolver {
        BiBreadthFirstSolver { diagonal_movement }
    }

    fn expand(
        &self,
        grid: &mut Grid,
        queue: &mut VecDeque<usize>,
        frontier: Frontier,
        observer: &mut dyn SearchObserver,
    ) -> Option<Vec<Point>> {
        let ix = queue.pop_front()?;
        grid.nodes.get_mut(ix).closed = true;
        let point = grid.point(ix);
        observer.on_event(SearchEvent::Closed { point });
        for n_ix in grid.neighbor_indices(ix, self.diagonal_movement) {
            let neighbor = grid.nodes.get(n_ix);
            if neighbor.closed || neighbor.opened == Some(frontier) {
                continue;
            }
            if neighbor.is_opened() {
                return Some(join(grid, frontier, ix, n_ix));
            }
            let neighbor = grid.nodes.get_mut(n_ix);
            neighbor.opened = Some(frontier);
            neighbor.parent = Some(ix);
            queue.push_back(n_ix);
            observer.on_event(SearchEvent::Opened {
                point: grid.point(n_ix),
                frontier,
            });
        }
        None
    }
}

impl GridSolver for BiBreadthFirstSolver {
    fn find_path_observed(
        &self,
        start: Point,
        goal: Point,
        grid: &mut Grid,
        observer: &mut dyn SearchObserver,
    ) -> Vec<Point> {
        let Some((start_ix, goal_ix)) = endpoints(grid, &start, &goal) else {
            return Vec::new();
        };
        if start_ix == goal_ix {
            return vec![start];
        }
        grid.reset();
        let mut start_queue = VecDeque::from([start_ix]);
        let mut end_queue = VecDeque::from([goal_ix]);
        grid.nodes.get_mut(start_ix).opened = Some(Frontier::ByStart);
        grid.nodes.get_mut(goal_ix).opened = Some(Frontier::ByEnd);
        observer.on_event(SearchEvent::Opened {
            point: start,
            frontier: Frontier::ByStart,
        });
        observer.on_event(SearchEvent::Opened {
            point: goal,
            frontier: Frontier::ByEnd,
        });

        while !start_queue.is_empty() && !end_queue.is_empty() {
            if let Some(path) = self.expand(grid, &mut start_queue, Frontier::ByStart, observer) {
                return path;
            }
            if let Some(path) = self.expand(grid, &mut end_queue, Frontier::ByEnd, observer) {
                return path;
            }
        }
        debug!("Queues exhausted without meeting");
        Vec::new()
    }
}
