//! Configuration-driven entry point selecting and running one of the solvers.
use core::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info};

use crate::grid::{DiagonalMovement, Grid};
use crate::heuristic::Heuristic;
use crate::observer::{NoopObserver, SearchObserver};
use crate::path::expand_path;
use crate::solver::{
    AstarSolver, BiAstarSolver, BiBreadthFirstSolver, BreadthFirstSolver, GridSolver,
    IdaStarSolver, JPSSolver,
};
use crate::{normalize_name, ConfigError, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Algorithm {
    BreadthFirst,
    Dijkstra,
    #[default]
    AStar,
    BestFirst,
    IdaStar,
    JumpPoint,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::BreadthFirst,
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::BestFirst,
        Algorithm::IdaStar,
        Algorithm::JumpPoint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "breadth-first",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "a-star",
            Algorithm::BestFirst => "best-first",
            Algorithm::IdaStar => "ida-star",
            Algorithm::JumpPoint => "jump-point",
        }
    }

    /// Whether a bidirectional variant exists.
    pub fn supports_bidirectional(self) -> bool {
        !matches!(self, Algorithm::IdaStar | Algorithm::JumpPoint)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let algorithm = match normalize_name(s).as_str() {
            "breadthfirst" | "bfs" => Algorithm::BreadthFirst,
            "dijkstra" => Algorithm::Dijkstra,
            "astar" | "a*" => Algorithm::AStar,
            "bestfirst" | "greedy" => Algorithm::BestFirst,
            "idastar" | "ida*" | "ida" => Algorithm::IdaStar,
            "jumppoint" | "jumppointsearch" | "jps" => Algorithm::JumpPoint,
            _ => return Err(ConfigError::UnknownAlgorithm(s.to_owned())),
        };
        Ok(algorithm)
    }
}

/// Options of a [PathFinder].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathFinderConfig {
    pub algorithm: Algorithm,
    /// [None] picks [Heuristic::default_for] the diagonal movement policy.
    pub heuristic: Option<Heuristic>,
    pub diagonal_movement: DiagonalMovement,
    /// Search from both ends. Ignored by algorithms without a bidirectional variant.
    pub bidirectional: bool,
    /// Factor applied to the heuristic, must be positive and finite.
    pub weight: f64,
    /// Answer unreachable goals from the connected components instead of searching.
    pub check_components: bool,
    /// Time budget of iterative deepening A*.
    pub time_limit: Option<Duration>,
}

impl Default for PathFinderConfig {
    fn default() -> Self {
        PathFinderConfig {
            algorithm: Algorithm::AStar,
            heuristic: None,
            diagonal_movement: DiagonalMovement::Never,
            bidirectional: false,
            weight: 1.0,
            check_components: true,
            time_limit: None,
        }
    }
}

impl PathFinderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(ConfigError::InvalidWeight(self.weight));
        }
        Ok(())
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
            .unwrap_or_else(|| Heuristic::default_for(self.diagonal_movement))
    }
}

#[derive(Debug)]
pub struct PathFinder {
    config: PathFinderConfig,
    solver: Box<dyn GridSolver>,
}

impl PathFinder {
    pub fn new(config: PathFinderConfig) -> Result<PathFinder, ConfigError> {
        config.validate()?;
        let dm = config.diagonal_movement;
        let heuristic = config.heuristic();
        let weight = config.weight;
        if config.bidirectional && !config.algorithm.supports_bidirectional() {
            debug!(
                "{} has no bidirectional variant, searching from the start only",
                config.algorithm
            );
        }
        let solver: Box<dyn GridSolver> = match (config.algorithm, config.bidirectional) {
            (Algorithm::BreadthFirst, false) => Box::new(BreadthFirstSolver::new(dm)),
            (Algorithm::BreadthFirst, true) => Box::new(BiBreadthFirstSolver::new(dm)),
            (Algorithm::Dijkstra, false) => Box::new(AstarSolver::dijkstra(dm)),
            (Algorithm::Dijkstra, true) => Box::new(BiAstarSolver::dijkstra(dm)),
            (Algorithm::AStar, false) => Box::new(
                AstarSolver::new(dm)
                    .with_heuristic(heuristic)
                    .with_weight(weight),
            ),
            (Algorithm::AStar, true) => Box::new(
                BiAstarSolver::new(dm)
                    .with_heuristic(heuristic)
                    .with_weight(weight),
            ),
            (Algorithm::BestFirst, false) => Box::new(
                AstarSolver::best_first(dm)
                    .with_heuristic(heuristic)
                    .with_weight(weight),
            ),
            (Algorithm::BestFirst, true) => Box::new(
                BiAstarSolver::best_first(dm)
                    .with_heuristic(heuristic)
                    .with_weight(weight),
            ),
            (Algorithm::IdaStar, _) => Box::new(IdaStarSolver {
                time_limit: config.time_limit,
                ..IdaStarSolver::new(dm)
                    .with_heuristic(heuristic)
                    .with_weight(weight)
            }),
            (Algorithm::JumpPoint, _) => Box::new(
                JPSSolver::new(dm)
                    .with_heuristic(heuristic)
                    .with_weight(weight),
            ),
        };
        Ok(PathFinder { config, solver })
    }

    pub fn config(&self) -> &PathFinderConfig {
        &self.config
    }

    pub fn solver(&self) -> &dyn GridSolver {
        self.solver.as_ref()
    }

    /// Finds a path from `(sx, sy)` to `(ex, ey)`, both included. The path is empty if either
    /// endpoint is outside the grid or blocked, or if the goal cannot be reached. Jump Point
    /// Search returns its jump points, see [find_expanded_path](Self::find_expanded_path).
    pub fn find_path(&self, sx: i32, sy: i32, ex: i32, ey: i32, grid: &mut Grid) -> Vec<Point> {
        self.find_path_observed(sx, sy, ex, ey, grid, &mut NoopObserver)
    }

    pub fn find_path_observed(
        &self,
        sx: i32,
        sy: i32,
        ex: i32,
        ey: i32,
        grid: &mut Grid,
        observer: &mut dyn SearchObserver,
    ) -> Vec<Point> {
        let (start, goal) = (Point::new(sx, sy), Point::new(ex, ey));
        if !grid.is_walkable(&start) || !grid.is_walkable(&goal) {
            debug!("Endpoint {:?} or {:?} is not walkable", start, goal);
            return Vec::new();
        }
        if self.config.check_components
            && grid.unreachable(&start, &goal, self.config.diagonal_movement)
        {
            info!("{:?} is not reachable from {:?}", goal, start);
            return Vec::new();
        }
        self.solver.find_path_observed(start, goal, grid, observer)
    }

    /// Like [find_path](Self::find_path), with every step of the path listed.
    pub fn find_expanded_path(
        &self,
        sx: i32,
        sy: i32,
        ex: i32,
        ey: i32,
        grid: &mut Grid,
    ) -> Vec<Point> {
        expand_path(&self.find_path(sx, sy, ex, ey, grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::test_grids::{walled_4x4, walled_4x4_path};

    fn finder(algorithm: Algorithm, bidirectional: bool) -> PathFinder {
        PathFinder::new(PathFinderConfig {
            algorithm,
            bidirectional,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn every_algorithm_solves_walled_grid() {
        for algorithm in Algorithm::ALL {
            for bidirectional in [false, true] {
                let mut grid = walled_4x4();
                let path = finder(algorithm, bidirectional).find_expanded_path(0, 0, 2, 2, &mut grid);
                assert_eq!(path, walled_4x4_path(), "{algorithm} bidirectional={bidirectional}");
            }
        }
    }

    #[test]
    fn selects_solver() {
        let name = |f: PathFinder| format!("{:?}", f.solver());
        assert!(name(finder(Algorithm::AStar, true)).starts_with("BiAstarSolver"));
        assert!(name(finder(Algorithm::BreadthFirst, true)).starts_with("BiBreadthFirstSolver"));
        assert!(name(finder(Algorithm::JumpPoint, true)).starts_with("JPSSolver"));
        assert!(name(finder(Algorithm::IdaStar, false)).starts_with("IdaStarSolver"));
        assert!(name(finder(Algorithm::Dijkstra, false)).starts_with("AstarSolver"));
    }

    #[test]
    fn rejects_bad_weight() {
        for weight in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = PathFinder::new(PathFinderConfig {
                weight,
                ..Default::default()
            });
            assert!(matches!(result, Err(ConfigError::InvalidWeight(_))));
        }
    }

    #[test]
    fn parse_algorithm_names() {
        assert_eq!("bfs".parse(), Ok(Algorithm::BreadthFirst));
        assert_eq!("Breadth-First".parse(), Ok(Algorithm::BreadthFirst));
        assert_eq!("a-star".parse(), Ok(Algorithm::AStar));
        assert_eq!("A*".parse(), Ok(Algorithm::AStar));
        assert_eq!("ida_star".parse(), Ok(Algorithm::IdaStar));
        assert_eq!("JumpPoint".parse(), Ok(Algorithm::JumpPoint));
        assert_eq!(
            "floyd".parse::<Algorithm>(),
            Err(ConfigError::UnknownAlgorithm("floyd".to_owned()))
        );
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse(), Ok(algorithm));
        }
    }

    #[test]
    fn default_heuristic_follows_policy() {
        let config = PathFinderConfig {
            diagonal_movement: DiagonalMovement::Always,
            ..Default::default()
        };
        assert_eq!(config.heuristic(), Heuristic::Octile);
        assert_eq!(PathFinderConfig::default().heuristic(), Heuristic::Manhattan);
    }

    #[test]
    fn invalid_endpoints_yield_empty_paths() {
        let mut grid = walled_4x4();
        let finder = finder(Algorithm::AStar, false);
        assert!(finder.find_path(0, 0, 1, 1, &mut grid).is_empty());
        assert!(finder.find_path(0, 0, 9, 9, &mut grid).is_empty());
        assert!(finder.find_path(-1, 0, 0, 0, &mut grid).is_empty());
    }

    #[test]
    fn unreachable_with_and_without_component_check() {
        for check_components in [true, false] {
            let finder = PathFinder::new(PathFinderConfig {
                check_components,
                ..Default::default()
            })
            .unwrap();
            let mut grid = Grid::from_matrix(&[[0, 1, 0]]).unwrap();
            assert!(finder.find_path(0, 0, 2, 0, &mut grid).is_empty());
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_json() {
        let config: PathFinderConfig = serde_json::from_str(
            r#"{"algorithm": "jump-point", "diagonal_movement": "if-at-most-one-obstacle", "heuristic": "chebyshev"}"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Algorithm::JumpPoint);
        assert_eq!(
            config.diagonal_movement,
            DiagonalMovement::IfAtMostOneObstacle
        );
        assert_eq!(config.heuristic, Some(Heuristic::Chebyshev));
        assert!(config.check_components);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<PathFinderConfig>(&json).unwrap(), config);
    }
}
