use crate::node::{Node, SearchNodes};
use crate::{normalize_name, ConfigError, GridError, Point, N_SMALLVEC_SIZE};
use core::fmt;
use grid_util::grid::{BoolGrid, ValueGrid};
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::str::FromStr;

/// Rule deciding when a diagonal step between two cells is allowed, based on the two orthogonal
/// cells it cuts past.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagonalMovement {
    #[default]
    Never,
    Always,
    OnlyWhenNoObstacles,
    IfAtMostOneObstacle,
}

impl DiagonalMovement {
    pub const ALL: [DiagonalMovement; 4] = [
        DiagonalMovement::Never,
        DiagonalMovement::Always,
        DiagonalMovement::OnlyWhenNoObstacles,
        DiagonalMovement::IfAtMostOneObstacle,
    ];

    /// Maps the `allow_diagonal`/`cross_corners` switch pair onto a policy.
    pub fn from_flags(allow_diagonal: bool, cross_corners: bool) -> DiagonalMovement {
        match (allow_diagonal, cross_corners) {
            (false, _) => DiagonalMovement::Never,
            (true, true) => DiagonalMovement::IfAtMostOneObstacle,
            (true, false) => DiagonalMovement::OnlyWhenNoObstacles,
        }
    }

    /// Whether a diagonal step is allowed given the walkability of the two orthogonal cells
    /// adjacent to both of its ends.
    #[inline]
    pub fn allows(self, side_a: bool, side_b: bool) -> bool {
        match self {
            DiagonalMovement::Never => false,
            DiagonalMovement::Always => true,
            DiagonalMovement::OnlyWhenNoObstacles => side_a && side_b,
            DiagonalMovement::IfAtMostOneObstacle => side_a || side_b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DiagonalMovement::Never => "never",
            DiagonalMovement::Always => "always",
            DiagonalMovement::OnlyWhenNoObstacles => "only-when-no-obstacles",
            DiagonalMovement::IfAtMostOneObstacle => "if-at-most-one-obstacle",
        }
    }
}

impl fmt::Display for DiagonalMovement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiagonalMovement {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        DiagonalMovement::ALL
            .into_iter()
            .find(|d| normalize_name(d.name()) == name)
            .ok_or_else(|| ConfigError::UnknownDiagonalMovement(s.to_owned()))
    }
}

/// [Grid] stores which cells are blocked in a [BoolGrid] ([true] means blocked), maintains
/// connected components using a [UnionFind] structure to answer reachability queries without
/// searching, and owns the node records mutated by searches. Implements [ValueGrid] by building
/// on [BoolGrid].
#[derive(Debug)]
pub struct Grid {
    pub(crate) grid: BoolGrid,
    pub(crate) components: UnionFind<usize>,
    pub(crate) components_dirty: bool,
    /// Whether `components` was generated with 8-connectivity.
    components_diagonal: bool,
    pub(crate) nodes: SearchNodes,
}

impl Grid {
    /// Creates a grid on which every cell is walkable.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            grid: BoolGrid::new(width, height, false),
            components: UnionFind::new(width * height),
            components_dirty: true,
            components_diagonal: false,
            nodes: SearchNodes::new(width * height),
        }
    }

    /// Creates a grid from an occupancy matrix given as rows, inferring its dimensions. A cell
    /// that differs from `M::default()` (a non-zero number, `true`) is blocked.
    pub fn from_matrix<R, M>(matrix: &[R]) -> Result<Grid, GridError>
    where
        R: AsRef<[M]>,
        M: Default + PartialEq,
    {
        let width = matrix.first().map_or(0, |row| row.as_ref().len());
        Grid::with_matrix(width, matrix.len(), matrix)
    }

    /// Like [from_matrix](Self::from_matrix), but the matrix must match the declared size.
    pub fn with_matrix<R, M>(width: usize, height: usize, matrix: &[R]) -> Result<Grid, GridError>
    where
        R: AsRef<[M]>,
        M: Default + PartialEq,
    {
        let matrix_width = matrix.first().map_or(0, |row| row.as_ref().len());
        if matrix.len() != height || matrix_width != width {
            return Err(GridError::SizeMismatch {
                width,
                height,
                matrix_width,
                matrix_height: matrix.len(),
            });
        }
        let mut grid = Grid::new(width, height);
        let free = M::default();
        for (y, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: y,
                    len: row.len(),
                    expected: width,
                });
            }
            for (x, cell) in row.iter().enumerate() {
                if *cell != free {
                    grid.grid.set(x as i32, y as i32, true);
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn contains_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Whether the cell can be walked through; [false] outside the grid.
    #[inline]
    pub fn is_walkable_at(&self, x: i32, y: i32) -> bool {
        self.contains_position(x, y) && !self.grid.get(x, y)
    }

    pub fn is_walkable(&self, p: &Point) -> bool {
        self.is_walkable_at(p.x, p.y)
    }

    pub fn set_walkable_at(&mut self, x: i32, y: i32, walkable: bool) -> Result<(), GridError> {
        if !self.contains_position(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_blocked(x, y, !walkable);
        Ok(())
    }

    /// The search record of a cell for the most recent search, [None] outside the grid.
    pub fn node_at(&self, x: i32, y: i32) -> Option<Node> {
        self.contains_position(x, y)
            .then(|| self.nodes.get(self.index(x, y)))
    }

    /// Invalidates all search state. Solvers do this themselves at the start of every search.
    pub fn reset(&mut self) {
        self.nodes.begin();
    }

    #[inline]
    pub(crate) fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width() + x as usize
    }

    #[inline]
    pub(crate) fn point(&self, ix: usize) -> Point {
        let w = self.width();
        Point::new((ix % w) as i32, (ix / w) as i32)
    }

    /// Arena index of a walkable point.
    pub(crate) fn walkable_index(&self, p: &Point) -> Option<usize> {
        self.is_walkable(p).then(|| self.index(p.x, p.y))
    }

    /// The walkable neighbours of `point` in the order N, E, S, W, NW, NE, SE, SW, with
    /// diagonals filtered by `diagonal_movement`.
    pub fn neighbors(
        &self,
        point: &Point,
        diagonal_movement: DiagonalMovement,
    ) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        let (x, y) = (point.x, point.y);
        let mut neighbors = SmallVec::new();
        let s0 = self.is_walkable_at(x, y - 1);
        let s1 = self.is_walkable_at(x + 1, y);
        let s2 = self.is_walkable_at(x, y + 1);
        let s3 = self.is_walkable_at(x - 1, y);
        for (walkable, dx, dy) in [(s0, 0, -1), (s1, 1, 0), (s2, 0, 1), (s3, -1, 0)] {
            if walkable {
                neighbors.push(Point::new(x + dx, y + dy));
            }
        }
        if diagonal_movement == DiagonalMovement::Never {
            return neighbors;
        }
        let diagonals = [
            (diagonal_movement.allows(s3, s0), -1, -1),
            (diagonal_movement.allows(s0, s1), 1, -1),
            (diagonal_movement.allows(s1, s2), 1, 1),
            (diagonal_movement.allows(s2, s3), -1, 1),
        ];
        for (allowed, dx, dy) in diagonals {
            if allowed && self.is_walkable_at(x + dx, y + dy) {
                neighbors.push(Point::new(x + dx, y + dy));
            }
        }
        neighbors
    }

    pub(crate) fn neighbor_indices(
        &self,
        ix: usize,
        diagonal_movement: DiagonalMovement,
    ) -> SmallVec<[usize; N_SMALLVEC_SIZE]> {
        self.neighbors(&self.point(ix), diagonal_movement)
            .iter()
            .map(|p| self.index(p.x, p.y))
            .collect()
    }

    /// Updates a cell. Joins newly connected components and flags the components as dirty if
    /// components are (potentially) broken apart into multiple.
    fn set_blocked(&mut self, x: i32, y: i32, blocked: bool) {
        let was_blocked = self.grid.get(x, y);
        if blocked && !was_blocked {
            self.components_dirty = true;
        } else if !blocked && was_blocked && !self.components_dirty {
            let ix = self.index(x, y);
            for n in self.component_links(&Point::new(x, y), true) {
                self.components.union(ix, n);
            }
        }
        self.grid.set(x, y, blocked);
    }

    /// Walkable cells connected to `point` under the connectivity the components use. With
    /// `all` unset only the half of the neighbourhood ahead in scan order is returned, which
    /// is enough to link every pair once during generation.
    fn component_links(&self, point: &Point, all: bool) -> SmallVec<[usize; N_SMALLVEC_SIZE]> {
        let mut offsets: SmallVec<[(i32, i32); N_SMALLVEC_SIZE]> = SmallVec::new();
        offsets.extend([(1, 0), (0, 1)]);
        if all {
            offsets.extend([(-1, 0), (0, -1)]);
        }
        if self.components_diagonal {
            offsets.extend([(1, 1), (-1, 1)]);
            if all {
                offsets.extend([(1, -1), (-1, -1)]);
            }
        }
        offsets
            .into_iter()
            .map(|(dx, dy)| (point.x + dx, point.y + dy))
            .filter(|&(x, y)| self.is_walkable_at(x, y))
            .map(|(x, y)| self.index(x, y))
            .collect()
    }

    /// Generates a new [UnionFind] structure and links up grid neighbours to the same components.
    /// With `diagonal` set, cells touching only at a corner are linked as well.
    pub fn generate_components(&mut self, diagonal: bool) {
        info!(
            "Generating connected components ({}-connected)",
            if diagonal { 8 } else { 4 }
        );
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.components = UnionFind::new(self.width() * self.height());
        self.components_dirty = false;
        self.components_diagonal = diagonal;
        for y in 0..h {
            for x in 0..w {
                if self.is_walkable_at(x, y) {
                    let ix = self.index(x, y);
                    for n in self.component_links(&Point::new(x, y), false) {
                        self.components.union(ix, n);
                    }
                }
            }
        }
    }

    /// Regenerates the components if they are dirty or were built for the other connectivity.
    pub fn update_components(&mut self, diagonal_movement: DiagonalMovement) {
        let diagonal = diagonal_movement == DiagonalMovement::Always;
        if self.components_dirty || self.components_diagonal != diagonal {
            self.generate_components(diagonal);
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&mut self, point: &Point, diagonal_movement: DiagonalMovement) -> usize {
        self.update_components(diagonal_movement);
        self.components.find(self.index(point.x, point.y))
    }

    /// Checks if start and goal are walkable and on the same connected component. Apart from
    /// [DiagonalMovement::Always], every policy can only move diagonally past a walkable
    /// orthogonal cell, so 4-connectivity decides reachability for them.
    pub fn reachable(
        &mut self,
        start: &Point,
        goal: &Point,
        diagonal_movement: DiagonalMovement,
    ) -> bool {
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return false;
        }
        self.update_components(diagonal_movement);
        self.components.equiv(
            self.index(start.x, start.y),
            self.index(goal.x, goal.y),
        )
    }

    pub fn unreachable(
        &mut self,
        start: &Point,
        goal: &Point,
        diagonal_movement: DiagonalMovement,
    ) -> bool {
        !self.reachable(start, goal, diagonal_movement)
    }
}

/// Copies walkability and components; the clone starts without search state.
impl Clone for Grid {
    fn clone(&self) -> Self {
        Grid {
            grid: self.grid.clone(),
            components: self.components.clone(),
            components_dirty: self.components_dirty,
            components_diagonal: self.components_diagonal,
            nodes: SearchNodes::new(self.nodes.len()),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.height() as i32 {
            let values = (0..self.width() as i32)
                .map(|x| self.grid.get(x, y) as i32)
                .collect::<Vec<i32>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

impl ValueGrid<bool> for Grid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        let mut grid = Grid::new(width, height);
        grid.grid = BoolGrid::new(width, height, default_value);
        grid
    }
    fn get(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y)
    }
    /// Sets whether a cell is blocked, keeping the components up to date.
    fn set(&mut self, x: i32, y: i32, blocked: bool) {
        self.set_blocked(x, y, blocked);
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}
