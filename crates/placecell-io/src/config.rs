use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use placecell_core::{EngineRecord, PlaceCellEngine};

use crate::error::ConfigResult;

/// Write the grid and every active root to `path` as pretty JSON.
pub fn save_configuration(engine: &PlaceCellEngine, path: impl AsRef<Path>) -> ConfigResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &engine.to_record())?;
    writer.flush()?;
    log::info!(
        "Saved configuration with {} micros to {}",
        engine.len(),
        path.display()
    );
    Ok(())
}

/// Rebuild a registry from a file written by [`save_configuration`].
pub fn load_configuration(path: impl AsRef<Path>) -> ConfigResult<PlaceCellEngine> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let record: EngineRecord = serde_json::from_reader(reader)?;
    let engine = PlaceCellEngine::from_record(&record)?;
    log::info!(
        "Loaded configuration with {} micros from {}",
        engine.len(),
        path.display()
    );
    Ok(engine)
}
