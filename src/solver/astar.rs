use log::debug;

use crate::grid::{DiagonalMovement, Grid};
use crate::heuristic::Heuristic;
use crate::node::Frontier;
use crate::observer::{SearchEvent, SearchObserver};
use crate::path::backtrace_ix;
use crate::solver::{endpoints, open_list, step_cost, GridSolver, OpenNode};
use crate::{Point, BEST_FIRST_FACTOR};

/// A* over the grid graph. With a zero weight it degenerates into Dijkstra's algorithm, with a
/// huge weight into greedy best-first search.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    /// Factor applied to the heuristic. Values above 1 trade optimality for speed.
    pub weight: f64,
    pub diagonal_movement: DiagonalMovement,
}

impl AstarSolver {
    pub fn new(diagonal_movement: DiagonalMovement) -> AstarSolver {
        AstarSolver {
            heuristic: Heuristic::default_for(diagonal_movement),
            weight: 1.0,
            diagonal_movement,
        }
    }

    pub fn dijkstra(diagonal_movement: DiagonalMovement) -> AstarSolver {
        AstarSolver {
            weight: 0.0,
            ..AstarSolver::new(diagonal_movement)
        }
    }

    pub fn best_first(diagonal_movement: DiagonalMovement) -> AstarSolver {
        AstarSolver {
            weight: BEST_FIRST_FACTOR,
            ..AstarSolver::new(diagonal_movement)
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> AstarSolver {
        self.heuristic = heuristic;
        self
    }

    /// Multiplies the current weight, so a best-first solver stays greedy.
    pub fn with_weight(mut self, weight: f64) -> AstarSolver {
        self.weight *= weight;
        self
    }
}

impl GridSolver for AstarSolver {
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
        let mut open = open_list();
        let start_node = grid.nodes.get_mut(start_ix);
        start_node.g = 0.0;
        start_node.f = 0.0;
        start_node.opened = Some(Frontier::ByStart);
        open.push(OpenNode {
            ix: start_ix,
            f: 0.0,
        });
        observer.on_event(SearchEvent::Opened {
            point: start,
            frontier: Frontier::ByStart,
        });

        while let Some(OpenNode { ix, .. }) = open.pop() {
            let node = grid.nodes.get_mut(ix);
            node.closed = true;
            let g = node.g;
            let point = grid.point(ix);
            observer.on_event(SearchEvent::Closed { point });
            if ix == goal_ix {
                return backtrace_ix(grid, ix);
            }
            for n in grid.neighbors(&point, self.diagonal_movement) {
                let n_ix = grid.index(n.x, n.y);
                let neighbor = grid.nodes.get(n_ix);
                if neighbor.closed {
                    continue;
                }
                let ng = g + step_cost(&point, &n);
                if neighbor.is_opened() && ng >= neighbor.g {
                    continue;
                }
                let h = neighbor
                    .h
                    .unwrap_or_else(|| self.weight * self.heuristic.between(&n, &goal));
                let f = ng + h;
                let record = grid.nodes.get_mut(n_ix);
                record.g = ng;
                record.h = Some(h);
                record.f = f;
                record.parent = Some(ix);
                if neighbor.is_opened() {
                    open.update_item(OpenNode { ix: n_ix, f });
                } else {
                    record.opened = Some(Frontier::ByStart);
                    open.push(OpenNode { ix: n_ix, f });
                }
                observer.on_event(SearchEvent::Opened {
                    point: n,
                    frontier: Frontier::ByStart,
                });
            }
        }
        debug!("Open list exhausted without reaching {:?}", goal);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::test_grids::{cost, is_valid_path, walled_4x4, walled_4x4_path};
    use crate::SQRT_2;

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        for policy in DiagonalMovement::ALL {
            let mut grid = Grid::new(1, 1);
            let solver = AstarSolver::new(policy);
            let start = Point::new(0, 0);
            let path = solver.find_path(start, start, &mut grid);
            assert_eq!(path, vec![start]);
        }
    }

    /// Asserts that the optimal solution around a single obstacle is found.
    #[test]
    fn solve_simple_problem() {
        for (policy, expected) in [
            (DiagonalMovement::Never, 5),
            (DiagonalMovement::Always, 4),
            (DiagonalMovement::OnlyWhenNoObstacles, 5),
            (DiagonalMovement::IfAtMostOneObstacle, 4),
        ] {
            let mut grid = Grid::new(3, 3);
            grid.set_walkable_at(1, 1, false).unwrap();
            let solver = AstarSolver::new(policy);
            let path = solver.find_path(Point::new(0, 0), Point::new(2, 2), &mut grid);
            assert_eq!(path.len(), expected, "{policy}");
            assert!(is_valid_path(&grid, &path));
        }
    }

    #[test]
    fn walled_grid_route() {
        let mut grid = walled_4x4();
        for solver in [
            AstarSolver::new(DiagonalMovement::Never),
            AstarSolver::dijkstra(DiagonalMovement::Never),
        ] {
            let path = solver.find_path(Point::new(0, 0), Point::new(2, 2), &mut grid);
            assert_eq!(path, walled_4x4_path());
        }
    }

    #[test]
    fn dijkstra_matches_astar_cost() {
        let mut grid = Grid::new(6, 6);
        for (x, y) in [(1, 0), (1, 1), (1, 2), (3, 3), (3, 4), (3, 5), (4, 1)] {
            grid.set_walkable_at(x, y, false).unwrap();
        }
        let (start, goal) = (Point::new(0, 0), Point::new(5, 5));
        for policy in DiagonalMovement::ALL {
            let a = AstarSolver::new(policy).find_path(start, goal, &mut grid);
            let d = AstarSolver::dijkstra(policy).find_path(start, goal, &mut grid);
            assert!(!a.is_empty());
            assert!((cost(&a) - cost(&d)).abs() < 1e-9, "{policy}");
        }
    }

    #[test]
    fn best_first_finds_valid_path() {
        let mut grid = walled_4x4();
        let path = AstarSolver::best_first(DiagonalMovement::Always).find_path(
            Point::new(0, 0),
            Point::new(2, 2),
            &mut grid,
        );
        assert_eq!(path.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.last(), Some(&Point::new(2, 2)));
        assert!(is_valid_path(&grid, &path));
    }

    #[test]
    fn diagonal_step_cost() {
        let mut grid = Grid::new(3, 3);
        let path =
            AstarSolver::new(DiagonalMovement::Always).find_path(Point::new(0, 0), Point::new(2, 2), &mut grid);
        assert_eq!(path.len(), 3);
        assert!((grid.node_at(2, 2).unwrap().g - 2.0 * SQRT_2).abs() < 1e-12);
    }

    // Tests whether allowing diagonals has the expected effect on path existence in a minimal setting.
    #[test]
    fn test_diagonal_switch_path() {
        //  ___
        // | #|
        // |# |
        //  __
        let mut grid = Grid::from_matrix(&[[0, 1], [1, 0]]).unwrap();
        let start = Point::new(0, 0);
        let goal = Point::new(1, 1);
        for policy in DiagonalMovement::ALL {
            let path = AstarSolver::new(policy).find_path(start, goal, &mut grid);
            assert_eq!(path.is_empty(), policy != DiagonalMovement::Always);
        }
    }

    #[test]
    fn invalid_endpoints() {
        let mut grid = walled_4x4();
        let solver = AstarSolver::new(DiagonalMovement::Never);
        assert!(solver
            .find_path(Point::new(0, 0), Point::new(1, 1), &mut grid)
            .is_empty());
        assert!(solver
            .find_path(Point::new(-1, 0), Point::new(2, 2), &mut grid)
            .is_empty());
        assert!(solver
            .find_path(Point::new(0, 0), Point::new(4, 0), &mut grid)
            .is_empty());
    }

    #[test]
    fn observer_sees_search() {
        let mut grid = walled_4x4();
        let mut events = Vec::new();
        let path = AstarSolver::new(DiagonalMovement::Never).find_path_observed(
            Point::new(0, 0),
            Point::new(2, 2),
            &mut grid,
            &mut |e: SearchEvent| events.push(e),
        );
        assert_eq!(
            events.first(),
            Some(&SearchEvent::Opened {
                point: Point::new(0, 0),
                frontier: Frontier::ByStart
            })
        );
        assert_eq!(
            events.last(),
            Some(&SearchEvent::Closed {
                point: Point::new(2, 2)
            })
        );
        let closed = events
            .iter()
            .filter(|e| matches!(e, SearchEvent::Closed { .. }))
            .count();
        assert!(closed >= path.len());
    }

    #[test]
    fn consecutive_searches_agree() {
        let mut grid = walled_4x4();
        let solver = AstarSolver::new(DiagonalMovement::IfAtMostOneObstacle);
        let first = solver.find_path(Point::new(0, 0), Point::new(3, 2), &mut grid);
        let second = solver.find_path(Point::new(0, 0), Point::new(3, 2), &mut grid);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
