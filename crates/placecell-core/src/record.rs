//! Persisted record shapes for micros, cells and the engine.
//!
//! Only the identifying and geometric fields are read back; the lattice,
//! absolute and bounding-box fields are written for downstream readers and
//! ignored on load.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{PlaceError, PlaceResult};
use crate::geometry::{round_to, BBox, EXPORT_PRECISION};
use crate::micro::Micro;
use crate::orientation::Orientation;
use crate::site::SiteInfo;

fn default_width() -> f64 {
    SiteInfo::default().width()
}

fn default_height() -> f64 {
    SiteInfo::default().height()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBoxRecord {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl From<BBox> for BBoxRecord {
    fn from(bb: BBox) -> Self {
        Self {
            min_x: round_to(bb.min.x, EXPORT_PRECISION),
            min_y: round_to(bb.min.y, EXPORT_PRECISION),
            max_x: round_to(bb.max.x, EXPORT_PRECISION),
            max_y: round_to(bb.max.y, EXPORT_PRECISION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub name: String,
    pub rel_x: f64,
    pub rel_y: f64,
    #[serde(default)]
    pub rel_grid_x: i64,
    #[serde(default)]
    pub rel_grid_y: i64,
    #[serde(default)]
    pub abs_x: f64,
    #[serde(default)]
    pub abs_y: f64,
    #[serde(default)]
    pub placement_x: f64,
    #[serde(default)]
    pub placement_y: f64,
    #[serde(default)]
    pub grid_x: i64,
    #[serde(default)]
    pub grid_y: i64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub bbox: BBoxRecord,
    #[serde(default)]
    pub hierarchical_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroRecord {
    pub name: String,
    /// Absolute origin, also for nested micros.
    pub origin_x: f64,
    pub origin_y: f64,
    #[serde(default)]
    pub grid_x: i64,
    #[serde(default)]
    pub grid_y: i64,
    #[serde(default)]
    pub rel_grid_x: i64,
    #[serde(default)]
    pub rel_grid_y: i64,
    #[serde(default)]
    pub site_info: SiteInfo,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hierarchical_path: String,
    pub cells: Vec<CellRecord>,
    #[serde(default)]
    pub sub_micros: Vec<MicroRecord>,
    #[serde(default)]
    pub bounding_box: BBoxRecord,
}

/// Grid plus every active root, in registration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineRecord {
    #[serde(default)]
    pub site_info: SiteInfo,
    #[serde(default)]
    pub active_micros: Vec<MicroRecord>,
}

impl Cell {
    pub fn to_record(&self) -> CellRecord {
        let abs = self.absolute_position().rounded(EXPORT_PRECISION);
        let anchor = self.placement_anchor().rounded(EXPORT_PRECISION);
        let (grid_x, grid_y) = self.lattice();
        let (rel_grid_x, rel_grid_y) = self.rel_lattice();
        CellRecord {
            name: self.name().to_string(),
            rel_x: self.position().x,
            rel_y: self.position().y,
            rel_grid_x,
            rel_grid_y,
            abs_x: abs.x,
            abs_y: abs.y,
            placement_x: anchor.x,
            placement_y: anchor.y,
            grid_x,
            grid_y,
            width: self.width(),
            height: self.height(),
            orientation: self.orientation(),
            bbox: self.bbox().into(),
            hierarchical_path: self.hierarchical_path().to_string(),
        }
    }

    pub fn from_record(record: &CellRecord) -> PlaceResult<Cell> {
        if record.name.is_empty() {
            return Err(PlaceError::MalformedRecord("cell without a name".into()));
        }
        Ok(Cell::new(&record.name, record.rel_x, record.rel_y)
            .with_size(record.width, record.height)
            .with_orientation(record.orientation))
    }
}

impl Micro {
    pub fn to_record(&self) -> MicroRecord {
        let (grid_x, grid_y) = self.lattice();
        let (rel_grid_x, rel_grid_y) = self.rel_lattice();
        MicroRecord {
            name: self.name().to_string(),
            origin_x: self.origin().x,
            origin_y: self.origin().y,
            grid_x,
            grid_y,
            rel_grid_x,
            rel_grid_y,
            site_info: *self.site_info(),
            description: self.description().to_string(),
            hierarchical_path: self.hierarchical_path().to_string(),
            cells: self.cells().iter().map(Cell::to_record).collect(),
            sub_micros: self.sub_micros().iter().map(Micro::to_record).collect(),
            bounding_box: self.bounding_box().into(),
        }
    }

    /// Rebuild a root micro. Nested records carry absolute origins; each
    /// child's offset is recovered against its rebuilt parent.
    pub fn from_record(record: &MicroRecord) -> PlaceResult<Micro> {
        if record.name.is_empty() {
            return Err(PlaceError::MalformedRecord("micro without a name".into()));
        }
        let site = SiteInfo::new(record.site_info.width(), record.site_info.height())?;
        let mut micro = Micro::new(&record.name, record.origin_x, record.origin_y, site)
            .with_description(&record.description);

        for cell_record in &record.cells {
            let cell = Cell::from_record(cell_record)?;
            micro.add_cell(&cell).map_err(|e| malformed(&record.name, e))?;
        }
        for sub_record in &record.sub_micros {
            if micro.sub_micro(&sub_record.name).is_some() {
                return Err(malformed(
                    &record.name,
                    PlaceError::DuplicateName(sub_record.name.clone()),
                ));
            }
            let child = Micro::from_record(sub_record)?;
            let offset = child.origin().relative_to(&micro.origin());
            micro.attach(child, offset);
        }
        Ok(micro)
    }

    pub fn to_json(&self) -> PlaceResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    pub fn from_json(json: &str) -> PlaceResult<Micro> {
        let record: MicroRecord = serde_json::from_str(json)?;
        Micro::from_record(&record)
    }
}

fn malformed(owner: &str, err: PlaceError) -> PlaceError {
    PlaceError::MalformedRecord(format!("in micro '{}': {}", owner, err))
}
