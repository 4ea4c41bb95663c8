use core::fmt;
use grid_util::Point;

/// Errors raised by grid edits, searches and obstacle generation.
///
/// Not finding a path is not an error: searches report it as an empty [Path](crate::Path).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// A position outside `[0, width) x [0, height)`.
    OutOfBounds {
        position: Point,
        width: usize,
        height: usize,
    },
    /// A cell cost outside `MIN_COST..=MAX_COST`.
    InvalidCost(u8),
    /// Every obstacle layout tried during regeneration left the goal unreachable.
    GenerationExhausted { attempts: usize, obstacles: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                width,
                height,
            } => write!(
                f,
                "position ({}, {}) is outside the {width}x{height} grid",
                position.x, position.y
            ),
            Self::InvalidCost(cost) => write!(
                f,
                "cell cost {cost} is not in {}..={}",
                crate::MIN_COST,
                crate::MAX_COST
            ),
            Self::GenerationExhausted {
                attempts,
                obstacles,
            } => write!(
                f,
                "no layout with {obstacles} obstacles left the goal reachable after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for GridError {}
