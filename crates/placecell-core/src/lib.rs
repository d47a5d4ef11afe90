//! # PlaceCell Core
//!
//! Hierarchical, grid-snapped cell placement model: leaf cells grouped into
//! nested micros, a file-backed template library, and the registry of active
//! roots that flattens the design into absolute placements.
//!
//! Every origin is snapped to the site lattice and every position change
//! cascades through the owned subtree, re-deriving row-based orientations on
//! the way down.

pub mod error;
pub mod geometry;
pub mod site;
pub mod orientation;
pub mod cell;
pub mod micro;
pub mod record;
pub mod library;
pub mod engine;
pub mod spatial;

pub use cell::Cell;
pub use engine::{PlaceCellEngine, Placement, PlacementStatistics};
pub use error::{PlaceError, PlaceResult};
pub use geometry::{BBox, Point};
pub use library::MicroLibrary;
pub use micro::{Micro, MicroId};
pub use orientation::Orientation;
pub use record::{CellRecord, EngineRecord, MicroRecord};
pub use site::SiteInfo;
pub use spatial::PlacementIndex;
