//! Error types for the Tarn hydrology core.
//!
//! Organized by pass: hard-minima resolution, drainage (priority flood and
//! carving), and flood wave (lake generation). Every error is fatal to the
//! pass that produced it and carries the offending handles for diagnostics.

use crate::id::{CenterId, CornerId};
use std::error::Error;
use std::fmt;

/// Errors from the hard-minima resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HardMinimaError {
    /// Resolving the minimum would raise an ocean corner, which must stay
    /// at elevation zero.
    MinimaIsOcean {
        /// The ocean corner.
        corner: CornerId,
    },
    /// No adjacent corner provides an elevation bound to raise towards.
    NoSolutionPossibleFor {
        /// The corner that could not be resolved.
        corner: CornerId,
    },
}

impl fmt::Display for HardMinimaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinimaIsOcean { corner } => {
                write!(f, "zero-elevation minimum {corner} is ocean")
            }
            Self::NoSolutionPossibleFor { corner } => {
                write!(f, "no elevation bound available to resolve {corner}")
            }
        }
    }
}

impl Error for HardMinimaError {}

/// Errors from the drainage basin pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrainageError {
    /// The hard-minima phase failed.
    HardMinima(HardMinimaError),
    /// The priority flood finished without reaching these corners.
    ///
    /// Usually means the network has a region disconnected from every
    /// border and ocean corner.
    UnprocessedCornersInNetwork {
        /// Corners never reached, in network order.
        corners: Vec<CornerId>,
    },
    /// Local minima were recorded but never carved.
    FailedToHandleLocalMinima {
        /// The unresolved minima.
        minima: Vec<CornerId>,
    },
    /// A local minimum has no discovery path back to a horizon root.
    LocalMinimaWithoutRootPath {
        /// The minimum.
        corner: CornerId,
    },
    /// A local minimum still sits at elevation zero after the hard-minima
    /// phase.
    LocalMinimaAtZeroElevation {
        /// The minimum.
        corner: CornerId,
    },
    /// Neither a regular nor a forced carve path exists for a minimum.
    FailedToForceCarveLocalMinima {
        /// The minimum.
        corner: CornerId,
    },
}

impl fmt::Display for DrainageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardMinima(e) => write!(f, "hard minima: {e}"),
            Self::UnprocessedCornersInNetwork { corners } => {
                write!(f, "{} corners left unprocessed", corners.len())?;
                if let Some(first) = corners.first() {
                    write!(f, " (first: {first})")?;
                }
                Ok(())
            }
            Self::FailedToHandleLocalMinima { minima } => {
                write!(f, "{} local minima left unresolved", minima.len())?;
                if let Some(first) = minima.first() {
                    write!(f, " (first: {first})")?;
                }
                Ok(())
            }
            Self::LocalMinimaWithoutRootPath { corner } => {
                write!(f, "local minimum {corner} has no path to a horizon root")
            }
            Self::LocalMinimaAtZeroElevation { corner } => {
                write!(f, "local minimum {corner} is at zero elevation")
            }
            Self::FailedToForceCarveLocalMinima { corner } => {
                write!(f, "failed to force a carve path from {corner}")
            }
        }
    }
}

impl Error for DrainageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::HardMinima(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HardMinimaError> for DrainageError {
    fn from(e: HardMinimaError) -> Self {
        Self::HardMinima(e)
    }
}

/// Errors from the flood wave pass.
#[derive(Clone, Debug, PartialEq)]
pub enum FloodError {
    /// None of the centers touching a flood source can hold water (all are
    /// lakes or coast).
    NoValidInitialNode {
        /// The candidate centers that were rejected.
        centers: Vec<CenterId>,
    },
    /// A queued corner has no entry in the watermass flow map.
    NoWatermassFlowForCorner {
        /// The corner without a flow value.
        corner: CornerId,
    },
    /// The coverage threshold is NaN or outside `[0, 1]`.
    InvalidThreshold {
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for FloodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValidInitialNode { centers } => {
                write!(f, "no floodable center among {} candidates", centers.len())
            }
            Self::NoWatermassFlowForCorner { corner } => {
                write!(f, "no watermass flow recorded for {corner}")
            }
            Self::InvalidThreshold { value } => {
                write!(f, "flood threshold must be within [0, 1], got {value}")
            }
        }
    }
}

impl Error for FloodError {}
