use thiserror::Error;

use crate::math::Coord;

/// Top-level error type for the Topolis kernel.
#[derive(Debug, Error)]
pub enum TopolisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl TopolisError {
    /// Returns `true` if this error signals a robustness failure that a
    /// retry with enhanced precision may resolve.
    #[must_use]
    pub fn is_topology(&self) -> bool {
        matches!(self, Self::Topology(_))
    }
}

/// Errors related to geometry construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid precision model scale {0}")]
    InvalidPrecision(f64),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Errors raised when noding or graph assembly cannot produce a
/// consistent planar topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("side location conflict{}", at(.coordinate))]
    SideLocationConflict { coordinate: Option<Coord> },

    #[error("found non-noded intersection{}", at(.coordinate))]
    NonNodedIntersection { coordinate: Option<Coord> },

    #[error("unable to assign hole to a shell{}", at(.coordinate))]
    UnassignedHole { coordinate: Option<Coord> },

    #[error("result has higher dimension than its inputs: {0}")]
    DimensionCollapse(String),

    #[error("invalid topology: {message}{}", at(.coordinate))]
    Invalid {
        message: String,
        coordinate: Option<Coord>,
    },
}

impl TopologyError {
    /// Creates a generic topology error at an optional coordinate.
    pub fn invalid(message: impl Into<String>, coordinate: Option<Coord>) -> Self {
        Self::Invalid {
            message: message.into(),
            coordinate,
        }
    }

    /// Returns the offending coordinate, if known.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coord> {
        match self {
            Self::SideLocationConflict { coordinate }
            | Self::NonNodedIntersection { coordinate }
            | Self::UnassignedHole { coordinate }
            | Self::Invalid { coordinate, .. } => *coordinate,
            Self::DimensionCollapse(_) => None,
        }
    }
}

fn at(coordinate: &Option<Coord>) -> String {
    coordinate.map_or_else(String::new, |c| format!(" at ({} {})", c.x, c.y))
}

/// Errors related to operation preconditions.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("operation does not support GeometryCollection arguments")]
    GeometryCollectionArgument,
}

/// Convenience type alias for results using [`TopolisError`].
pub type Result<T> = std::result::Result<T, TopolisError>;
