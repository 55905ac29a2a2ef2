use std::time::{Duration, Instant};

use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::grid::{DiagonalMovement, Grid};
use crate::heuristic::Heuristic;
use crate::observer::{SearchEvent, SearchObserver};
use crate::solver::{endpoints, step_cost, GridSolver};
use crate::{Point, N_SMALLVEC_SIZE};

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Iterative deepening A*. Runs depth-first searches bounded by an `f` cutoff that grows to
/// the smallest overshoot of the previous round, so memory stays proportional to the path
/// length. Cells already on the current path are not re-entered.
#[derive(Clone, Debug)]
pub struct IdaStarSolver {
    pub heuristic: Heuristic,
    pub weight: f64,
    pub diagonal_movement: DiagonalMovement,
    /// Gives up with an empty path once reached.
    pub time_limit: Option<Duration>,
}

/// A cell of the current path together with the neighbours still to descend into.
struct Frame {
    ix: usize,
    cost: f64,
    neighbors: SmallVec<[Point; N_SMALLVEC_SIZE]>,
    next: usize,
}

enum Round {
    Found(Vec<Point>),
    /// The goal was not within the cutoff; holds the smallest `f` beyond it.
    Exceeded(f64),
    TimedOut,
}

impl IdaStarSolver {
    pub fn new(diagonal_movement: DiagonalMovement) -> IdaStarSolver {
        IdaStarSolver {
            heuristic: Heuristic::default_for(diagonal_movement),
            weight: 1.0,
            diagonal_movement,
            time_limit: None,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> IdaStarSolver {
        self.heuristic = heuristic;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> IdaStarSolver {
        self.weight *= weight;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> IdaStarSolver {
        self.time_limit = Some(time_limit);
        self
    }

    fn timed_out(&self, started: Instant) -> bool {
        self.time_limit
            .is_some_and(|limit| started.elapsed() >= limit)
    }

    /// Depth-first search from `start_ix` pruned at `cutoff`.
    #[allow(clippy::too_many_arguments)]
    fn search(
        &self,
        grid: &Grid,
        start_ix: usize,
        goal_ix: usize,
        goal: &Point,
        cutoff: f64,
        started: Instant,
        observer: &mut dyn SearchObserver,
    ) -> Round {
        let f = |p: &Point, cost: f64| cost + self.weight * self.heuristic.between(p, goal);
        let start = grid.point(start_ix);
        observer.on_event(SearchEvent::Visited { point: start });
        let start_f = f(&start, 0.0);
        if start_f > cutoff {
            return Round::Exceeded(start_f);
        }
        if start_ix == goal_ix {
            return Round::Found(vec![start]);
        }

        let mut min = f64::INFINITY;
        let mut path = FxIndexSet::default();
        path.insert(start_ix);
        let mut stack = vec![Frame {
            ix: start_ix,
            cost: 0.0,
            neighbors: grid.neighbors(&start, self.diagonal_movement),
            next: 0,
        }];
        while let Some(frame) = stack.last_mut() {
            if self.timed_out(started) {
                return Round::TimedOut;
            }
            let Some(next) = frame.neighbors.get(frame.next).copied() else {
                path.pop();
                stack.pop();
                continue;
            };
            frame.next += 1;
            let n_ix = grid.index(next.x, next.y);
            if path.contains(&n_ix) {
                continue;
            }
            let cost = frame.cost + step_cost(&grid.point(frame.ix), &next);
            observer.on_event(SearchEvent::Visited { point: next });
            let next_f = f(&next, cost);
            if next_f > cutoff {
                min = min.min(next_f);
                continue;
            }
            path.insert(n_ix);
            if n_ix == goal_ix {
                return Round::Found(path.iter().map(|&ix| grid.point(ix)).collect());
            }
            stack.push(Frame {
                ix: n_ix,
                cost,
                neighbors: grid.neighbors(&next, self.diagonal_movement),
                next: 0,
            });
        }
        Round::Exceeded(min)
    }
}

impl GridSolver for IdaStarSolver {
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
        // Without this check an unreachable goal would be searched until every simple path
        // from the start had been enumerated.
        if grid.unreachable(&start, &goal, self.diagonal_movement) {
            info!("{:?} is not reachable from {:?}", goal, start);
            return Vec::new();
        }
        grid.reset();
        let started = Instant::now();
        let mut cutoff = self.heuristic.between(&start, &goal);
        loop {
            match self.search(grid, start_ix, goal_ix, &goal, cutoff, started, observer) {
                Round::Found(path) => return path,
                Round::Exceeded(next) if next.is_finite() => {
                    debug!("Raising cutoff from {} to {}", cutoff, next);
                    cutoff = next;
                }
                Round::Exceeded(_) => return Vec::new(),
                Round::TimedOut => {
                    warn!(
                        "Search from {:?} to {:?} exceeded its time limit of {:?}",
                        start, goal, self.time_limit
                    );
                    return Vec::new();
                }
            }
        }
    }
}
