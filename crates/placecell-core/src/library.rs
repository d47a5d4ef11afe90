use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PlaceError, PlaceResult};
use crate::micro::Micro;
use crate::record::MicroRecord;

const TEMPLATE_EXTENSION: &str = "json";

/// File-backed store of named micro templates, one JSON record per template.
///
/// The in-memory cache only ever holds private copies: saving stores a clone
/// of the caller's tree and every lookup hands out another clone.
#[derive(Debug)]
pub struct MicroLibrary {
    path: PathBuf,
    templates: HashMap<String, Micro>,
}

impl MicroLibrary {
    /// Open (creating if needed) the library directory at `path`.
    pub fn open(path: impl AsRef<Path>) -> PlaceResult<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            templates: HashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File backing template `name`. Names must be a single plain path component.
    fn template_file(&self, name: &str) -> PlaceResult<PathBuf> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c: char| c == '/' || c == '\\');
        if !plain {
            return Err(PlaceError::MalformedRecord(format!(
                "template name '{}' is not a plain file name",
                name
            )));
        }
        Ok(self.path.join(format!("{}.{}", name, TEMPLATE_EXTENSION)))
    }

    /// Cached template, if it has been saved or loaded in this session.
    pub fn template(&self, name: &str) -> Option<&Micro> {
        self.templates.get(name)
    }

    /// Persist `micro` under its own name and cache a private copy.
    pub fn save(&mut self, micro: &Micro) -> PlaceResult<PathBuf> {
        let file_path = self.template_file(micro.name())?;
        let mut writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(&mut writer, &micro.to_record())?;
        writer.flush()?;

        self.templates
            .insert(micro.name().to_string(), micro.clone());
        log::info!(
            "Saved micro '{}' to library: {}",
            micro.name(),
            file_path.display()
        );
        Ok(file_path)
    }

    /// Read a template back from disk, refreshing the cache.
    ///
    /// A missing template is not an error: it is logged and `None` returned.
    pub fn load(&mut self, name: &str) -> PlaceResult<Option<Micro>> {
        let file_path = self.template_file(name)?;
        if !file_path.is_file() {
            log::warn!("Micro '{}' not found in library {}", name, self.path.display());
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&file_path)?);
        let record: MicroRecord = serde_json::from_reader(reader)?;
        let micro = Micro::from_record(&record)?;
        log::info!("Loaded micro '{}' from {}", name, file_path.display());

        self.templates.insert(name.to_string(), micro.clone());
        Ok(Some(micro))
    }

    /// Independent copy of template `template_name`, renamed to `new_name`
    /// and placed (snapped) at `(origin_x, origin_y)`.
    pub fn instantiate(
        &mut self,
        template_name: &str,
        new_name: &str,
        origin_x: f64,
        origin_y: f64,
    ) -> PlaceResult<Micro> {
        if !self.templates.contains_key(template_name) {
            self.load(template_name)?;
        }
        let template = self
            .templates
            .get(template_name)
            .ok_or_else(|| PlaceError::TemplateNotFound(template_name.to_string()))?;

        let mut instance = template.clone_named(new_name);
        instance.set_origin(origin_x, origin_y);
        log::debug!(
            "Instantiated '{}' from template '{}' at ({}, {})",
            new_name,
            template_name,
            instance.origin().x,
            instance.origin().y
        );
        Ok(instance)
    }

    /// Names of every persisted template, sorted.
    pub fn list_names(&self) -> PlaceResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let file_path = entry?.path();
            let is_template = file_path
                .extension()
                .map_or(false, |ext| ext == TEMPLATE_EXTENSION);
            if !is_template {
                continue;
            }
            if let Some(stem) = file_path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
