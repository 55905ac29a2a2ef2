use log::debug;

use crate::grid::{DiagonalMovement, Grid};
use crate::heuristic::{octile, Heuristic};
use crate::node::Frontier;
use crate::observer::{SearchEvent, SearchObserver};
use crate::path::backtrace_ix;
use crate::solver::jump_rules::{jump_rules, Scan};
use crate::solver::{endpoints, open_list, GridSolver, OpenNode};
use crate::Point;

/// Jump Point Search: A* over the jump points of the grid. Straight and diagonal runs without
/// branching decisions are skipped by scanning, so the returned path consists of jump points
/// only; [find_expanded_path](GridSolver::find_expanded_path) fills in the cells between them.
#[derive(Clone, Debug)]
pub struct JPSSolver {
    pub heuristic: Heuristic,
    pub weight: f64,
    pub diagonal_movement: DiagonalMovement,
}

impl JPSSolver {
    pub fn new(diagonal_movement: DiagonalMovement) -> JPSSolver {
        JPSSolver {
            heuristic: Heuristic::default_for(diagonal_movement),
            weight: 1.0,
            diagonal_movement,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> JPSSolver {
        self.heuristic = heuristic;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> JPSSolver {
        self.weight *= weight;
        self
    }
}

impl GridSolver for JPSSolver {
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
        let rules = jump_rules(self.diagonal_movement);
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
            let (g, parent) = (node.g, node.parent);
            let point = grid.point(ix);
            observer.on_event(SearchEvent::Closed { point });
            if ix == goal_ix {
                return backtrace_ix(grid, ix);
            }
            // Direction of travel into this node, normalised by sign.
            let dir = parent.map(|p| {
                let p = grid.point(p);
                ((point.x - p.x).signum(), (point.y - p.y).signum())
            });
            for n in (rules.neighbors)(grid, &point, dir) {
                let jump_point = {
                    let mut scan = Scan {
                        grid: &*grid,
                        goal,
                        observer: &mut *observer,
                    };
                    (rules.jump)(&mut scan, n.x, n.y, n.x - point.x, n.y - point.y)
                };
                let Some(jp) = jump_point else {
                    continue;
                };
                let j_ix = grid.index(jp.x, jp.y);
                let jump_node = grid.nodes.get(j_ix);
                if jump_node.closed {
                    continue;
                }
                // The jump point need not be adjacent.
                let d = octile(
                    (jp.x - point.x).abs() as f64,
                    (jp.y - point.y).abs() as f64,
                );
                let ng = g + d;
                if jump_node.is_opened() && ng >= jump_node.g {
                    continue;
                }
                let h = jump_node
                    .h
                    .unwrap_or_else(|| self.weight * self.heuristic.between(&jp, &goal));
                let f = ng + h;
                let record = grid.nodes.get_mut(j_ix);
                record.g = ng;
                record.h = Some(h);
                record.f = f;
                record.parent = Some(ix);
                if jump_node.is_opened() {
                    open.update_item(OpenNode { ix: j_ix, f });
                } else {
                    record.opened = Some(Frontier::ByStart);
                    open.push(OpenNode { ix: j_ix, f });
                }
                observer.on_event(SearchEvent::Opened {
                    point: jp,
                    frontier: Frontier::ByStart,
                });
            }
        }
        debug!("Open list exhausted without reaching {:?}", goal);
        Vec::new()
    }
}
