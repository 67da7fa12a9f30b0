//! Core types and traits for the Tarn hydrology core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Tarn workspace:
//! arena handles for mesh entities, the read and mutation traits a mesh
//! must implement, and the error types surfaced by every pass.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::{DrainageError, FloodError, HardMinimaError};
pub use id::{CenterId, CornerId, CornerList, LakeId};
pub use traits::{HydrologySink, Terrain};
