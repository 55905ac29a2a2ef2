//! # grid_search
//!
//! A grid-based shortest-path search engine. Given a rectangular [Grid](grid::Grid) of walkable
//! and blocked cells it finds a route from a start to a goal cell under one of four
//! [diagonal movement policies](grid::DiagonalMovement), using any of
//! - breadth-first search (optionally bidirectional),
//! - [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm),
//!   [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) and weighted best-first search,
//!   all driven by one engine and all optionally bidirectional,
//! - [iterative-deepening A*](https://en.wikipedia.org/wiki/Iterative_deepening_A*),
//! - [Jump Point Search](https://en.wikipedia.org/wiki/Jump_point_search), with pruning rules
//!   matching each diagonal policy.
//!
//! Edges cost 1 orthogonally and √2 diagonally. Connected components are tracked on the grid
//! to avoid flood-filling behaviour when no path exists. The [path] module post-processes
//! results (expansion of jump points, compression, line-of-sight smoothing).
//!
//! ```
//! use grid_search::grid::{DiagonalMovement, Grid};
//! use grid_search::pathfinder::{Algorithm, PathFinder, PathFinderConfig};
//!
//! let mut grid = Grid::with_matrix(3, 3, &[[0, 0, 0], [1, 1, 0], [0, 0, 0]]).unwrap();
//! let finder = PathFinder::new(PathFinderConfig {
//!     algorithm: Algorithm::AStar,
//!     diagonal_movement: DiagonalMovement::Never,
//!     ..Default::default()
//! })
//! .unwrap();
//! let path = finder.find_path(0, 0, 0, 2, &mut grid);
//! assert_eq!(path.len(), 7);
//! ```
pub mod error;
pub mod grid;
pub mod heap;
pub mod heuristic;
pub mod node;
pub mod observer;
pub mod path;
pub mod pathfinder;
pub mod solver;

pub use error::{ConfigError, GridError};
pub use grid::{DiagonalMovement, Grid};
pub use grid_util::point::Point;
pub use heuristic::Heuristic;
pub use observer::{NoopObserver, SearchEvent, SearchObserver};
pub use pathfinder::{Algorithm, PathFinder, PathFinderConfig};
pub use solver::GridSolver;

/// Inline capacity of the small vectors holding neighbourhoods.
pub const N_SMALLVEC_SIZE: usize = 8;
/// Cost of a diagonal step; orthogonal steps cost 1.
pub const SQRT_2: f64 = std::f64::consts::SQRT_2;
/// Scaling applied to the heuristic by best-first search, making it effectively greedy.
pub const BEST_FIRST_FACTOR: f64 = 1_000_000.0;

/// Lowercases a configuration name and strips separators so that `"jump-point"`,
/// `"jump_point"` and `"JumpPoint"` compare equal.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
