use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use placecell_core::Placement;

use crate::error::ConfigResult;

pub const PLACEMENT_FORMAT_VERSION: &str = "1.0";

/// Flattened design as written for the layout tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementFile {
    #[serde(default = "default_version")]
    pub version: String,
    pub global_placements: Vec<Placement>,
}

fn default_version() -> String {
    PLACEMENT_FORMAT_VERSION.to_string()
}

impl PlacementFile {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self {
            version: default_version(),
            global_placements: placements,
        }
    }
}

/// Either the wrapped object or a bare list of placements.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlacementDocument {
    Wrapped(PlacementFile),
    Bare(Vec<Placement>),
}

pub fn write_placements(path: impl AsRef<Path>, placements: &[Placement]) -> ConfigResult<()> {
    let path = path.as_ref();
    let file = PlacementFile::new(placements.to_vec());
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &file)?;
    writer.flush()?;
    log::info!("Wrote {} placements to {}", placements.len(), path.display());
    Ok(())
}

pub fn read_placements(path: impl AsRef<Path>) -> ConfigResult<Vec<Placement>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let placements = match serde_json::from_reader(reader)? {
        PlacementDocument::Wrapped(file) => file.global_placements,
        PlacementDocument::Bare(list) => list,
    };
    log::info!("Read {} placements from {}", placements.len(), path.display());
    Ok(placements)
}
