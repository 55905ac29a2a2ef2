//! Reconstruction and post-processing of paths found on a [Grid].
use crate::grid::Grid;
use crate::Point;
use itertools::Itertools;

/// Follows the parent links of the most recent search from `point` back to the root of its
/// frontier. Returns `[root, .., point]`.
pub fn backtrace(grid: &Grid, point: &Point) -> Vec<Point> {
    if !grid.contains_position(point.x, point.y) {
        return Vec::new();
    }
    backtrace_ix(grid, grid.index(point.x, point.y))
}

pub(crate) fn backtrace_ix(grid: &Grid, ix: usize) -> Vec<Point> {
    let mut path: Vec<Point> = std::iter::successors(Some(ix), |&ix| grid.nodes.parent(ix))
        .map(|ix| grid.point(ix))
        .collect();
    path.reverse();
    path
}

/// Joins the two halves of a bidirectional search: the path from the start to `from_start`,
/// followed by the path from `from_end` to the goal.
pub fn bi_backtrace(grid: &Grid, from_start: &Point, from_end: &Point) -> Vec<Point> {
    let mut path = backtrace(grid, from_start);
    path.extend(backtrace(grid, from_end).into_iter().rev());
    path
}

pub(crate) fn bi_backtrace_ix(grid: &Grid, from_start: usize, from_end: usize) -> Vec<Point> {
    let mut path = backtrace_ix(grid, from_start);
    path.extend(backtrace_ix(grid, from_end).into_iter().rev());
    path
}

/// Cells on the line between `p0` and `p1` by Bresenham's algorithm, both ends included.
pub fn interpolate(p0: &Point, p1: &Point) -> Vec<Point> {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    let sx = if p0.x < p1.x { 1 } else { -1 };
    let sy = if p0.y < p1.y { 1 } else { -1 };
    let (mut x, mut y) = (p0.x, p0.y);
    let mut err = dx - dy;
    let mut line = Vec::with_capacity((dx.max(dy) + 1) as usize);
    loop {
        line.push(Point::new(x, y));
        if x == p1.x && y == p1.y {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    line
}

/// Interpolates every segment of a compressed path (e.g. jump points) into unit steps.
pub fn expand_path(path: &[Point]) -> Vec<Point> {
    let Some(last) = path.last() else {
        return Vec::new();
    };
    let mut expanded = Vec::new();
    for (a, b) in path.iter().tuple_windows() {
        let line = interpolate(a, b);
        expanded.extend_from_slice(&line[..line.len() - 1]);
    }
    expanded.push(*last);
    expanded
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

fn direction(a: &Point, b: &Point) -> (i32, i32) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    match gcd(dx, dy) {
        0 => (0, 0),
        g => (dx / g, dy / g),
    }
}

/// Removes the interior points at which the path keeps its direction, without altering its
/// shape.
pub fn compress_path(path: &[Point]) -> Vec<Point> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut compressed = vec![path[0]];
    for (a, b, c) in path.iter().tuple_windows() {
        if direction(a, b) != direction(b, c) {
            compressed.push(*b);
        }
    }
    compressed.extend(path.last());
    compressed
}

/// Skips waypoints as long as the straight line from the last kept point stays on walkable
/// cells.
pub fn smoothen_path(grid: &Grid, path: &[Point]) -> Vec<Point> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut anchor = path[0];
    let mut smooth = vec![anchor];
    for i in 2..path.len() {
        let blocked = interpolate(&anchor, &path[i])
            .iter()
            .skip(1)
            .any(|p| !grid.is_walkable(p));
        if blocked {
            anchor = path[i - 1];
            smooth.push(anchor);
        }
    }
    smooth.extend(path.last());
    smooth
}

/// Sum of the Euclidean lengths of the segments.
pub fn path_length(path: &[Point]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| {
            let (dx, dy) = ((a.x - b.x) as f64, (a.y - b.y) as f64);
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}
