//! Pruning and jumping rules of Jump Point Search, one set per [DiagonalMovement] policy.
//!
//! A jump scans from a cell in a fixed direction until it reaches the goal, a cell with a
//! forced neighbour (a neighbour only reachable optimally through that cell) or a dead end.
//! Scans are loops; a diagonal scan (or, without diagonal movement, a vertical one) runs the
//! straight scans branching off each cell it passes, which do not branch further.
use smallvec::SmallVec;

use crate::grid::{DiagonalMovement, Grid};
use crate::observer::{SearchEvent, SearchObserver};
use crate::{Point, N_SMALLVEC_SIZE};

pub(crate) type Neighbors = SmallVec<[Point; N_SMALLVEC_SIZE]>;

/// State shared by the scans of one expansion.
pub(crate) struct Scan<'a> {
    pub grid: &'a Grid,
    pub goal: Point,
    pub observer: &'a mut dyn SearchObserver,
}

impl Scan<'_> {
    #[inline]
    fn walkable(&self, x: i32, y: i32) -> bool {
        self.grid.is_walkable_at(x, y)
    }

    /// Whether the scan can enter `(x, y)`. Entered cells are reported as tested.
    #[inline]
    fn enter(&mut self, x: i32, y: i32) -> bool {
        if !self.walkable(x, y) {
            return false;
        }
        self.observer.on_event(SearchEvent::Tested {
            point: Point::new(x, y),
        });
        true
    }

    #[inline]
    fn is_goal(&self, x: i32, y: i32) -> bool {
        self.goal.x == x && self.goal.y == y
    }
}

/// Scans from `(x, y)`, the first cell in direction `(dx, dy)`, and returns the jump point found.
pub(crate) type JumpFn = fn(&mut Scan<'_>, i32, i32, i32, i32) -> Option<Point>;
/// The directions worth scanning from `point`, given the normalised direction it was entered
/// from ([None] at the start).
pub(crate) type NeighborsFn = fn(&Grid, &Point, Option<(i32, i32)>) -> Neighbors;

pub(crate) struct JumpRules {
    pub jump: JumpFn,
    pub neighbors: NeighborsFn,
}

/// Indexed by [DiagonalMovement] discriminant.
const JUMP_RULES: [JumpRules; 4] = [
    JumpRules {
        jump: jump_never,
        neighbors: neighbors_never,
    },
    JumpRules {
        jump: jump_always,
        neighbors: neighbors_always,
    },
    JumpRules {
        jump: jump_no_obstacles,
        neighbors: neighbors_no_obstacles,
    },
    JumpRules {
        jump: jump_at_most_one_obstacle,
        neighbors: neighbors_at_most_one_obstacle,
    },
];

pub(crate) fn jump_rules(diagonal_movement: DiagonalMovement) -> &'static JumpRules {
    &JUMP_RULES[diagonal_movement as usize]
}

fn jump_never(s: &mut Scan, mut x: i32, mut y: i32, dx: i32, dy: i32) -> Option<Point> {
    loop {
        if !s.enter(x, y) {
            return None;
        }
        if s.is_goal(x, y) {
            return Some(Point::new(x, y));
        }
        if dx != 0 {
            if (s.walkable(x, y - 1) && !s.walkable(x - dx, y - 1))
                || (s.walkable(x, y + 1) && !s.walkable(x - dx, y + 1))
            {
                return Some(Point::new(x, y));
            }
        } else {
            if (s.walkable(x - 1, y) && !s.walkable(x - 1, y - dy))
                || (s.walkable(x + 1, y) && !s.walkable(x + 1, y - dy))
            {
                return Some(Point::new(x, y));
            }
            // Horizontal scans never branch, so this is the only nesting.
            if jump_never(s, x + 1, y, 1, 0).is_some() || jump_never(s, x - 1, y, -1, 0).is_some() {
                return Some(Point::new(x, y));
            }
        }
        x += dx;
        y += dy;
    }
}

/// Forced neighbours when diagonal steps ignore obstacles, shared with the at-most-one rules.
fn forced_cutting_corners(s: &Scan, x: i32, y: i32, dx: i32, dy: i32) -> bool {
    if dx != 0 && dy != 0 {
        (s.walkable(x - dx, y + dy) && !s.walkable(x - dx, y))
            || (s.walkable(x + dx, y - dy) && !s.walkable(x, y - dy))
    } else if dx != 0 {
        (s.walkable(x + dx, y + 1) && !s.walkable(x, y + 1))
            || (s.walkable(x + dx, y - 1) && !s.walkable(x, y - 1))
    } else {
        (s.walkable(x + 1, y + dy) && !s.walkable(x + 1, y))
            || (s.walkable(x - 1, y + dy) && !s.walkable(x - 1, y))
    }
}

/// The straight scans branching off a diagonal one found a jump point.
fn straight_branches(s: &mut Scan, jump: JumpFn, x: i32, y: i32, dx: i32, dy: i32) -> bool {
    jump(s, x + dx, y, dx, 0).is_some() || jump(s, x, y + dy, 0, dy).is_some()
}

fn jump_always(s: &mut Scan, mut x: i32, mut y: i32, dx: i32, dy: i32) -> Option<Point> {
    loop {
        if !s.enter(x, y) {
            return None;
        }
        if s.is_goal(x, y) || forced_cutting_corners(s, x, y, dx, dy) {
            return Some(Point::new(x, y));
        }
        if dx != 0 && dy != 0 && straight_branches(s, jump_always, x, y, dx, dy) {
            return Some(Point::new(x, y));
        }
        x += dx;
        y += dy;
    }
}

fn jump_no_obstacles(s: &mut Scan, mut x: i32, mut y: i32, dx: i32, dy: i32) -> Option<Point> {
    loop {
        if !s.enter(x, y) {
            return None;
        }
        if s.is_goal(x, y) {
            return Some(Point::new(x, y));
        }
        if dx != 0 && dy != 0 {
            if straight_branches(s, jump_no_obstacles, x, y, dx, dy) {
                return Some(Point::new(x, y));
            }
        } else if dx != 0 {
            if (s.walkable(x, y - 1) && !s.walkable(x - dx, y - 1))
                || (s.walkable(x, y + 1) && !s.walkable(x - dx, y + 1))
            {
                return Some(Point::new(x, y));
            }
        } else if (s.walkable(x - 1, y) && !s.walkable(x - 1, y - dy))
            || (s.walkable(x + 1, y) && !s.walkable(x + 1, y - dy))
        {
            return Some(Point::new(x, y));
        }
        if !(s.walkable(x + dx, y) && s.walkable(x, y + dy)) {
            return None;
        }
        x += dx;
        y += dy;
    }
}

fn jump_at_most_one_obstacle(
    s: &mut Scan,
    mut x: i32,
    mut y: i32,
    dx: i32,
    dy: i32,
) -> Option<Point> {
    loop {
        if !s.enter(x, y) {
            return None;
        }
        if s.is_goal(x, y) || forced_cutting_corners(s, x, y, dx, dy) {
            return Some(Point::new(x, y));
        }
        if dx != 0 && dy != 0 && straight_branches(s, jump_at_most_one_obstacle, x, y, dx, dy) {
            return Some(Point::new(x, y));
        }
        if !(s.walkable(x + dx, y) || s.walkable(x, y + dy)) {
            return None;
        }
        x += dx;
        y += dy;
    }
}

fn neighbors_never(grid: &Grid, point: &Point, dir: Option<(i32, i32)>) -> Neighbors {
    let Some((dx, dy)) = dir else {
        return grid.neighbors(point, DiagonalMovement::Never);
    };
    let (x, y) = (point.x, point.y);
    let candidates = if dx != 0 {
        [(x, y - 1), (x, y + 1), (x + dx, y)]
    } else {
        [(x - 1, y), (x + 1, y), (x, y + dy)]
    };
    candidates
        .into_iter()
        .filter(|&(x, y)| grid.is_walkable_at(x, y))
        .map(|(x, y)| Point::new(x, y))
        .collect()
}

fn neighbors_always(grid: &Grid, point: &Point, dir: Option<(i32, i32)>) -> Neighbors {
    let Some((dx, dy)) = dir else {
        return grid.neighbors(point, DiagonalMovement::Always);
    };
    let (x, y) = (point.x, point.y);
    let w = |x, y| grid.is_walkable_at(x, y);
    let mut neighbors = Neighbors::new();
    let mut push = |cond: bool, x: i32, y: i32| {
        if cond {
            neighbors.push(Point::new(x, y));
        }
    };
    if dx != 0 && dy != 0 {
        push(w(x, y + dy), x, y + dy);
        push(w(x + dx, y), x + dx, y);
        push(w(x + dx, y + dy), x + dx, y + dy);
        push(!w(x - dx, y), x - dx, y + dy);
        push(!w(x, y - dy), x + dx, y - dy);
    } else if dx == 0 {
        push(w(x, y + dy), x, y + dy);
        push(!w(x + 1, y), x + 1, y + dy);
        push(!w(x - 1, y), x - 1, y + dy);
    } else {
        push(w(x + dx, y), x + dx, y);
        push(!w(x, y + 1), x + dx, y + 1);
        push(!w(x, y - 1), x + dx, y - 1);
    }
    neighbors
}

fn neighbors_no_obstacles(grid: &Grid, point: &Point, dir: Option<(i32, i32)>) -> Neighbors {
    let Some((dx, dy)) = dir else {
        return grid.neighbors(point, DiagonalMovement::OnlyWhenNoObstacles);
    };
    let (x, y) = (point.x, point.y);
    let w = |x, y| grid.is_walkable_at(x, y);
    let mut neighbors = Neighbors::new();
    let mut push = |cond: bool, x: i32, y: i32| {
        if cond {
            neighbors.push(Point::new(x, y));
        }
    };
    if dx != 0 && dy != 0 {
        push(w(x, y + dy), x, y + dy);
        push(w(x + dx, y), x + dx, y);
        push(w(x, y + dy) && w(x + dx, y), x + dx, y + dy);
    } else if dx != 0 {
        let (next, top, bottom) = (w(x + dx, y), w(x, y + 1), w(x, y - 1));
        push(next, x + dx, y);
        push(next && top, x + dx, y + 1);
        push(next && bottom, x + dx, y - 1);
        push(top, x, y + 1);
        push(bottom, x, y - 1);
    } else {
        let (next, right, left) = (w(x, y + dy), w(x + 1, y), w(x - 1, y));
        push(next, x, y + dy);
        push(next && right, x + 1, y + dy);
        push(next && left, x - 1, y + dy);
        push(right, x + 1, y);
        push(left, x - 1, y);
    }
    neighbors
}

fn neighbors_at_most_one_obstacle(
    grid: &Grid,
    point: &Point,
    dir: Option<(i32, i32)>,
) -> Neighbors {
    let Some((dx, dy)) = dir else {
        return grid.neighbors(point, DiagonalMovement::IfAtMostOneObstacle);
    };
    let (x, y) = (point.x, point.y);
    let w = |x, y| grid.is_walkable_at(x, y);
    let mut neighbors = Neighbors::new();
    let mut push = |cond: bool, x: i32, y: i32| {
        if cond {
            neighbors.push(Point::new(x, y));
        }
    };
    if dx != 0 && dy != 0 {
        let (vertical, horizontal) = (w(x, y + dy), w(x + dx, y));
        push(vertical, x, y + dy);
        push(horizontal, x + dx, y);
        push(vertical || horizontal, x + dx, y + dy);
        push(!w(x - dx, y) && vertical, x - dx, y + dy);
        push(!w(x, y - dy) && horizontal, x + dx, y - dy);
    } else if dx == 0 {
        if w(x, y + dy) {
            push(true, x, y + dy);
            push(!w(x + 1, y), x + 1, y + dy);
            push(!w(x - 1, y), x - 1, y + dy);
        }
    } else if w(x + dx, y) {
        push(true, x + dx, y);
        push(!w(x, y + 1), x + dx, y + 1);
        push(!w(x, y - 1), x + dx, y - 1);
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::solver::test_grids::walled_4x4;

    #[test]
    fn table_follows_policy_order() {
        for policy in DiagonalMovement::ALL {
            let rules = jump_rules(policy);
            let grid = Grid::new(3, 3);
            let centre = Point::new(1, 1);
            assert_eq!((rules.neighbors)(&grid, &centre, None), grid.neighbors(&centre, policy));
        }
    }

    #[test]
    fn straight_jump_stops_at_forced_neighbor() {
        let grid = walled_4x4();
        let mut observer = NoopObserver;
        let mut scan = Scan {
            grid: &grid,
            goal: Point::new(2, 2),
            observer: &mut observer,
        };
        assert_eq!(jump_never(&mut scan, 0, 1, 0, 1), Some(Point::new(0, 3)));
        assert_eq!(jump_never(&mut scan, 1, 3, 1, 0), Some(Point::new(2, 3)));
        assert_eq!(jump_never(&mut scan, 1, 0, 1, 0), None);
    }

    #[test]
    fn diagonal_jump_reaches_goal_on_open_grid() {
        let grid = Grid::new(5, 5);
        let mut tested = Vec::new();
        let mut observer = |e: SearchEvent| tested.push(e);
        let mut scan = Scan {
            grid: &grid,
            goal: Point::new(4, 4),
            observer: &mut observer,
        };
        let jumps: [JumpFn; 3] = [jump_always, jump_no_obstacles, jump_at_most_one_obstacle];
        for jump in jumps {
            assert_eq!(jump(&mut scan, 1, 1, 1, 1), Some(Point::new(4, 4)));
        }
        assert!(tested.contains(&SearchEvent::Tested {
            point: Point::new(3, 3)
        }));
    }

    #[test]
    fn diagonal_jump_respects_corners() {
        // . # .
        // # . .
        // . . .
        let grid = Grid::from_matrix(&[[0, 1, 0], [1, 0, 0], [0, 0, 0]]).unwrap();
        let mut observer = NoopObserver;
        let mut scan = Scan {
            grid: &grid,
            goal: Point::new(2, 2),
            observer: &mut observer,
        };
        // Entering (1, 1) from (0, 0) squeezes between two obstacles.
        let always = jump_rules(DiagonalMovement::Always);
        let no_obstacles = jump_rules(DiagonalMovement::OnlyWhenNoObstacles);
        assert_eq!((always.neighbors)(&grid, &Point::new(0, 0), None).len(), 1);
        assert!((no_obstacles.neighbors)(&grid, &Point::new(0, 0), None).is_empty());
        // (0, 2) is only reachable around the obstacle at (0, 1), which forces a stop.
        assert_eq!(jump_always(&mut scan, 1, 1, 1, 1), Some(Point::new(1, 1)));
    }
}
