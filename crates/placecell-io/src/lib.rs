//! # PlaceCell I/O
//!
//! File-level persistence around the placement core: engine configuration
//! files holding the grid and every active root, and flattened placement
//! files consumed by the layout tool.

pub mod config;
pub mod error;
pub mod placements;

pub use config::{load_configuration, save_configuration};
pub use error::{ConfigError, ConfigResult};
pub use placements::{read_placements, write_placements, PlacementFile};
