use crate::{grid::DiagonalMovement, normalize_name, ConfigError, Point, SQRT_2};
use core::fmt;
use std::str::FromStr;

/// Distance estimates over absolute coordinate deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Heuristic {
    /// Admissible only without diagonal movement.
    Manhattan,
    Euclidean,
    /// Exact distance on an open 8-connected grid; the admissible default with diagonals.
    Octile,
    Chebyshev,
}

pub fn manhattan(dx: f64, dy: f64) -> f64 {
    dx + dy
}

pub fn euclidean(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}

pub fn octile(dx: f64, dy: f64) -> f64 {
    let f = SQRT_2 - 1.0;
    if dx < dy {
        f * dx + dy
    } else {
        f * dy + dx
    }
}

pub fn chebyshev(dx: f64, dy: f64) -> f64 {
    dx.max(dy)
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Octile,
        Heuristic::Chebyshev,
    ];

    /// Manhattan on a 4-connected grid, octile as soon as diagonal moves are possible.
    pub fn default_for(diagonal_movement: DiagonalMovement) -> Heuristic {
        match diagonal_movement {
            DiagonalMovement::Never => Heuristic::Manhattan,
            _ => Heuristic::Octile,
        }
    }

    pub fn function(self) -> fn(f64, f64) -> f64 {
        match self {
            Heuristic::Manhattan => manhattan,
            Heuristic::Euclidean => euclidean,
            Heuristic::Octile => octile,
            Heuristic::Chebyshev => chebyshev,
        }
    }

    pub fn estimate(self, dx: f64, dy: f64) -> f64 {
        (self.function())(dx, dy)
    }

    pub fn between(self, a: &Point, b: &Point) -> f64 {
        self.estimate((a.x - b.x).abs() as f64, (a.y - b.y).abs() as f64)
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::Octile => "octile",
            Heuristic::Chebyshev => "chebyshev",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        Heuristic::ALL
            .into_iter()
            .find(|h| h.name() == name)
            .ok_or_else(|| ConfigError::UnknownHeuristic(s.to_owned()))
    }
}
