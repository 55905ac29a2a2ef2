use std::collections::VecDeque;

use log::debug;

use crate::grid::{DiagonalMovement, Grid};
use crate::node::Frontier;
use crate::observer::{SearchEvent, SearchObserver};
use crate::path::backtrace_ix;
use crate::solver::{endpoints, GridSolver};
use crate::Point;

/// Breadth-first search. Finds the path with the fewest steps, which is only the cheapest path
/// when diagonal movement is disabled.
#[derive(Clone, Debug)]
pub struct BreadthFirstSolver {
    pub diagonal_movement: DiagonalMovement,
}

impl BreadthFirstSolver {
    pub fn new(diagonal_movement: DiagonalMovement) -> BreadthFirstSolver {
        BreadthFirstSolver { diagonal_movement }
    }
}

impl GridSolver for BreadthFirstSolver {
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
        grid.reset();
        let mut queue = VecDeque::from([start_ix]);
        grid.nodes.get_mut(start_ix).opened = Some(Frontier::ByStart);
        observer.on_event(SearchEvent::Opened {
            point: start,
            frontier: Frontier::ByStart,
        });

        while let Some(ix) = queue.pop_front() {
            grid.nodes.get_mut(ix).closed = true;
            let point = grid.point(ix);
            observer.on_event(SearchEvent::Closed { point });
            if ix == goal_ix {
                return backtrace_ix(grid, ix);
            }
            for n_ix in grid.neighbor_indices(ix, self.diagonal_movement) {
                let neighbor = grid.nodes.get_mut(n_ix);
                if neighbor.closed || neighbor.is_opened() {
                    continue;
                }
                neighbor.opened = Some(Frontier::ByStart);
                neighbor.parent = Some(ix);
                queue.push_back(n_ix);
                observer.on_event(SearchEvent::Opened {
                    point: grid.point(n_ix),
                    frontier: Frontier::ByStart,
                });
            }
        }
        debug!("Queue exhausted without reaching {:?}", goal);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::test_grids::{is_valid_path, walled_4x4, walled_4x4_path};

    #[test]
    fn walled_grid_route() {
        let mut grid = walled_4x4();
        let path = BreadthFirstSolver::new(DiagonalMovement::Never).find_path(
            Point::new(0, 0),
            Point::new(2, 2),
            &mut grid,
        );
        assert_eq!(path, walled_4x4_path());
    }

    #[test]
    fn fewest_steps_with_diagonals() {
        let mut grid = Grid::new(5, 3);
        let path = BreadthFirstSolver::new(DiagonalMovement::Always).find_path(
            Point::new(0, 0),
            Point::new(4, 2),
            &mut grid,
        );
        assert_eq!(path.len(), 5);
        assert!(is_valid_path(&grid, &path));
    }

    #[test]
    fn unreachable_goal() {
        let mut grid = Grid::from_matrix(&[[0, 1, 0], [0, 1, 0]]).unwrap();
        let path = BreadthFirstSolver::new(DiagonalMovement::Always).find_path(
            Point::new(0, 0),
            Point::new(2, 1),
            &mut grid,
        );
        assert!(path.is_empty());
        // Everything reachable was expanded.
        assert!(grid.node_at(0, 1).unwrap().closed);
        assert!(!grid.node_at(2, 0).unwrap().is_opened());
    }
}
