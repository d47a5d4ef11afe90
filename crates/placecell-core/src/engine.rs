use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{PlaceError, PlaceResult};
use crate::geometry::{round_to, BBox, Point, EXPORT_PRECISION};
use crate::library::MicroLibrary;
use crate::micro::{Micro, MicroId};
use crate::orientation::Orientation;
use crate::record::{BBoxRecord, EngineRecord};
use crate::site::{Lattice, SiteInfo};
use crate::spatial::PlacementIndex;

/// One flattened leaf placement, as handed to the layout tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Hierarchical path of the cell.
    pub cell: String,
    /// Placement anchor, rounded to [`EXPORT_PRECISION`] digits.
    pub x: f64,
    pub y: f64,
    pub orientation: Orientation,
    /// Name of the registered root that owns the cell.
    pub micro: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroStatistics {
    pub name: String,
    pub id: MicroId,
    pub cells_count: usize,
    pub sub_micros_count: usize,
    pub origin: Point,
    pub lattice: Lattice,
    pub bounding_box: BBoxRecord,
}

/// Whole-design summary over every registered root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementStatistics {
    pub total_cells: usize,
    pub total_micros: usize,
    pub total_sub_micros: usize,
    pub site_info: SiteInfo,
    pub bounding_box: BBoxRecord,
    pub width: f64,
    pub height: f64,
    pub micros: Vec<MicroStatistics>,
}

/// Registry of the active (placed) root micros, kept in registration order.
#[derive(Debug, Default)]
pub struct PlaceCellEngine {
    site: SiteInfo,
    micros: Vec<Micro>,
}

impl PlaceCellEngine {
    pub fn new(site: SiteInfo) -> Self {
        Self {
            site,
            micros: Vec::new(),
        }
    }

    pub fn site_info(&self) -> &SiteInfo {
        &self.site
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Create an empty root on the engine grid and register it.
    pub fn create(
        &mut self,
        name: &str,
        origin_x: f64,
        origin_y: f64,
        description: &str,
    ) -> PlaceResult<&mut Micro> {
        self.ensure_free(name)?;
        let micro = Micro::new(name, origin_x, origin_y, self.site).with_description(description);
        log::info!(
            "Created micro '{}' at ({}, {})",
            name,
            micro.origin().x,
            micro.origin().y
        );
        Ok(self.push(micro))
    }

    /// Create a root holding copies of `cells` and register it.
    pub fn create_from_cells(
        &mut self,
        name: &str,
        cells: &[Cell],
        origin_x: f64,
        origin_y: f64,
    ) -> PlaceResult<&mut Micro> {
        self.ensure_free(name)?;
        let mut micro = Micro::new(name, origin_x, origin_y, self.site);
        micro.add_cells(cells)?;
        log::info!("Created micro '{}' from {} cells", name, cells.len());
        Ok(self.push(micro))
    }

    /// Register an already built tree under its own name. The tree keeps its grid.
    pub fn register(&mut self, micro: Micro) -> PlaceResult<&mut Micro> {
        self.ensure_free(micro.name())?;
        log::info!("Registered micro '{}'", micro.name());
        Ok(self.push(micro))
    }

    /// Drop an active tree. The template library is not touched.
    pub fn remove(&mut self, name: &str) -> PlaceResult<Micro> {
        let idx = self
            .micros
            .iter()
            .position(|m| m.name() == name)
            .ok_or_else(|| PlaceError::micro_not_found(name))?;
        log::info!("Removed micro '{}'", name);
        Ok(self.micros.remove(idx))
    }

    fn ensure_free(&self, name: &str) -> PlaceResult<()> {
        if self.get(name).is_some() {
            return Err(PlaceError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn push(&mut self, micro: Micro) -> &mut Micro {
        let idx = self.micros.len();
        self.micros.push(micro);
        &mut self.micros[idx]
    }

    // ── Lookup ───────────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Option<&Micro> {
        self.micros.iter().find(|m| m.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Micro> {
        self.micros.iter_mut().find(|m| m.name() == name)
    }

    fn active_mut(&mut self, name: &str) -> PlaceResult<&mut Micro> {
        self.get_mut(name)
            .ok_or_else(|| PlaceError::micro_not_found(name))
    }

    pub fn micros(&self) -> &[Micro] {
        &self.micros
    }

    pub fn names(&self) -> Vec<&str> {
        self.micros.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.micros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.micros.is_empty()
    }

    /// Look a cell up by its full hierarchical path across every root.
    pub fn find_cell(&self, path: &str) -> Option<&Cell> {
        self.micros.iter().find_map(|m| m.find_cell_by_path(path))
    }

    /// Look a root or nested micro up by its full hierarchical path.
    pub fn find_micro(&self, path: &str) -> Option<&Micro> {
        self.micros
            .iter()
            .find_map(|m| m.find_sub_micro_by_path(path))
    }

    // ── Positioning ──────────────────────────────────────────────────

    pub fn place(&mut self, name: &str, x: f64, y: f64) -> PlaceResult<&mut Micro> {
        let micro = self.active_mut(name)?;
        micro.set_origin(x, y);
        log::debug!("Placed '{}' at lattice {:?}", name, micro.lattice());
        Ok(micro)
    }

    pub fn place_by_lattice(&mut self, name: &str, i: i64, j: i64) -> PlaceResult<&mut Micro> {
        let micro = self.active_mut(name)?;
        micro.set_origin_by_lattice(i, j);
        log::debug!("Placed '{}' at lattice {:?}", name, micro.lattice());
        Ok(micro)
    }

    pub fn move_by(&mut self, name: &str, dx: f64, dy: f64) -> PlaceResult<&mut Micro> {
        let micro = self.active_mut(name)?;
        micro.move_by(dx, dy);
        log::debug!("Moved '{}' to lattice {:?}", name, micro.lattice());
        Ok(micro)
    }

    pub fn move_by_lattice(&mut self, name: &str, di: i64, dj: i64) -> PlaceResult<&mut Micro> {
        let micro = self.active_mut(name)?;
        micro.move_by_lattice(di, dj);
        log::debug!("Moved '{}' to lattice {:?}", name, micro.lattice());
        Ok(micro)
    }

    pub fn flip_horizontal(&mut self, name: &str) -> PlaceResult<&mut Micro> {
        let micro = self.active_mut(name)?;
        micro.flip_horizontal();
        log::debug!("Flipped '{}' horizontally", name);
        Ok(micro)
    }

    // ── Template library ─────────────────────────────────────────────

    /// Instantiate `template` as a new root `new_name` on the engine grid.
    pub fn instantiate_from_library(
        &mut self,
        library: &mut MicroLibrary,
        template: &str,
        new_name: &str,
        origin_x: f64,
        origin_y: f64,
    ) -> PlaceResult<&mut Micro> {
        self.ensure_free(new_name)?;
        let mut instance = library.instantiate(template, new_name, origin_x, origin_y)?;
        if instance.site_info() != &self.site {
            instance.set_site_info(self.site);
            instance.set_origin(origin_x, origin_y);
        }
        log::info!("Instantiated '{}' from template '{}'", new_name, template);
        Ok(self.push(instance))
    }

    pub fn save_to_library(&self, library: &mut MicroLibrary, name: &str) -> PlaceResult<PathBuf> {
        let micro = self
            .get(name)
            .ok_or_else(|| PlaceError::micro_not_found(name))?;
        library.save(micro)
    }

    /// Load a template at its stored origin, optionally renamed, and register it.
    pub fn load_from_library(
        &mut self,
        library: &mut MicroLibrary,
        template: &str,
        instance_name: Option<&str>,
    ) -> PlaceResult<&mut Micro> {
        let name = instance_name.unwrap_or(template);
        self.ensure_free(name)?;
        let mut micro = library
            .load(template)?
            .ok_or_else(|| PlaceError::TemplateNotFound(template.to_string()))?;
        if micro.name() != name {
            micro.rename_root(name);
        }
        micro.set_site_info(self.site);
        log::info!("Loaded '{}' from template '{}'", name, template);
        Ok(self.push(micro))
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Every leaf cell of every root, roots in registration order and cells
    /// in pre-order within each root.
    pub fn flatten(&self) -> Vec<Placement> {
        let placements: Vec<Placement> = self
            .micros
            .iter()
            .flat_map(|root| {
                root.all_cells().map(move |cell| {
                    let anchor = cell.placement_anchor();
                    Placement {
                        cell: cell.hierarchical_path().to_string(),
                        x: round_to(anchor.x, EXPORT_PRECISION),
                        y: round_to(anchor.y, EXPORT_PRECISION),
                        orientation: cell.orientation(),
                        micro: root.name().to_string(),
                    }
                })
            })
            .collect();
        log::debug!(
            "Flattened {} placements from {} micros",
            placements.len(),
            self.micros.len()
        );
        placements
    }

    pub fn statistics(&self) -> PlacementStatistics {
        let micros: Vec<MicroStatistics> = self
            .micros
            .iter()
            .map(|m| MicroStatistics {
                name: m.name().to_string(),
                id: m.id(),
                cells_count: m.cell_count(),
                sub_micros_count: m.sub_micro_count(),
                origin: m.origin(),
                lattice: m.lattice(),
                bounding_box: m.bounding_box().into(),
            })
            .collect();

        let global = BBox::enclosing(
            self.micros
                .iter()
                .flat_map(|m| m.all_cells())
                .map(|c| c.bbox()),
        )
        .unwrap_or_default();

        PlacementStatistics {
            total_cells: micros.iter().map(|m| m.cells_count).sum(),
            total_micros: micros.len(),
            total_sub_micros: micros.iter().map(|m| m.sub_micros_count).sum(),
            site_info: self.site,
            bounding_box: global.into(),
            width: round_to(global.width(), EXPORT_PRECISION),
            height: round_to(global.height(), EXPORT_PRECISION),
            micros,
        }
    }

    // ── Overlap detection ────────────────────────────────────────────

    pub fn spatial_index(&self) -> PlacementIndex {
        PlacementIndex::build(self.micros.iter().flat_map(|root| {
            root.all_cells().map(move |cell| {
                (
                    cell.hierarchical_path().to_string(),
                    root.name().to_string(),
                    cell.bbox(),
                )
            })
        }))
    }

    /// Paths of every pair of placed cells whose footprints share area.
    pub fn overlaps(&self) -> Vec<(String, String)> {
        self.spatial_index()
            .overlapping_pairs()
            .into_iter()
            .map(|(a, b)| (a.path.clone(), b.path.clone()))
            .collect()
    }

    // ── Configuration record ─────────────────────────────────────────

    pub fn to_record(&self) -> EngineRecord {
        EngineRecord {
            site_info: self.site,
            active_micros: self.micros.iter().map(Micro::to_record).collect(),
        }
    }

    /// Rebuild the registry. Each root keeps the grid stored in its own record.
    pub fn from_record(record: &EngineRecord) -> PlaceResult<Self> {
        let site = SiteInfo::new(record.site_info.width(), record.site_info.height())?;
        let mut engine = Self::new(site);
        for micro_record in &record.active_micros {
            let micro = Micro::from_record(micro_record)?;
            engine.ensure_free(micro.name())?;
            engine.push(micro);
        }
        Ok(engine)
    }
}
