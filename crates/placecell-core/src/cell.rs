use crate::geometry::{BBox, Point};
use crate::orientation::Orientation;
use crate::site::{Lattice, SiteInfo};

/// A placed leaf cell.
///
/// The stored position is always expressed in the canonical (`N`) frame,
/// relative to the owning micro's origin. The orientation only changes the
/// anchor reported by [`Cell::placement_anchor`]; the bounding box is always
/// the canonical footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    name: String,
    position: Point,
    width: f64,
    height: f64,
    orientation: Orientation,
    site: SiteInfo,
    hierarchical_path: String,

    // Derived from the fields above and the last container origin.
    container_origin: Point,
    absolute: Point,
    lattice: Lattice,
    rel_lattice: Lattice,
    bbox: BBox,
}

impl Cell {
    /// A standard-size (one site wide, one row high) cell at relative `(x, y)`.
    pub fn new(name: &str, x: f64, y: f64) -> Self {
        let site = SiteInfo::default();
        let mut cell = Self {
            name: name.to_string(),
            position: Point::new(x, y),
            width: site.width(),
            height: site.height(),
            orientation: Orientation::N,
            site,
            hierarchical_path: name.to_string(),
            container_origin: Point::ORIGIN,
            absolute: Point::ORIGIN,
            lattice: (0, 0),
            rel_lattice: (0, 0),
            bbox: BBox::default(),
        };
        cell.refresh();
        cell
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.set_size(width, height);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_site(mut self, site: SiteInfo) -> Self {
        self.site = site;
        self.refresh();
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored position relative to the owning micro, canonical frame.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn absolute_position(&self) -> Point {
        self.absolute
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn site_info(&self) -> &SiteInfo {
        &self.site
    }

    pub fn hierarchical_path(&self) -> &str {
        &self.hierarchical_path
    }

    /// Lattice index of the absolute position.
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Lattice index of the stored (relative) position.
    pub fn rel_lattice(&self) -> Lattice {
        self.rel_lattice
    }

    /// Canonical footprint `[absolute, absolute + size]`.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Overwrite the stored position, keeping the last known container origin.
    pub fn set_relative_position(&mut self, x: f64, y: f64) {
        self.position = Point::new(x, y);
        self.refresh();
    }

    /// Re-anchor against a container origin: `absolute = origin + position`.
    pub fn set_absolute_position(&mut self, origin_x: f64, origin_y: f64) {
        self.container_origin = Point::new(origin_x, origin_y);
        self.refresh();
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.bbox = BBox::from_origin_size(self.absolute, width, height);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Mirror left-right: N<->FN, S<->FS.
    pub fn flip_orientation(&mut self) {
        self.orientation = self.orientation.flipped_horizontal();
    }

    pub fn set_hierarchical_path(&mut self, parent_path: &str) {
        self.hierarchical_path = if parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", parent_path, self.name)
        };
    }

    pub(crate) fn set_site_info(&mut self, site: SiteInfo) {
        self.site = site;
        self.refresh();
    }

    // ── Orientation rules ────────────────────────────────────────────

    /// Orientation this cell takes when its lower edge sits at `absolute_y`.
    pub fn orientation_for_row(&self, absolute_y: f64) -> Orientation {
        self.orientation.for_row(self.site.row_of(absolute_y))
    }

    /// Re-derive the orientation from the current absolute row.
    pub fn apply_row_orientation(&mut self) {
        self.orientation = self.orientation_for_row(self.absolute.y);
    }

    /// Anchor corner handed to the layout tool for the current orientation.
    pub fn placement_anchor(&self) -> Point {
        match self.orientation {
            Orientation::N => self.absolute,
            Orientation::S => self.absolute.translate(self.width, self.height),
            Orientation::FN => self.absolute.translate(self.width, 0.0),
            Orientation::FS => self.absolute.translate(0.0, self.height),
        }
    }

    fn refresh(&mut self) {
        self.absolute = self.container_origin.offset_by(&self.position);
        self.lattice = self.site.point_to_lattice(&self.absolute);
        self.rel_lattice = self.site.point_to_lattice(&self.position);
        self.bbox = BBox::from_origin_size(self.absolute, self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_follows_container_origin() {
        let mut cell = Cell::new("INV1", 0.14, 0.0);
        cell.set_absolute_position(1.4, 1.8);
        let abs = cell.absolute_position();
        assert!((abs.x - 1.54).abs() < 1e-9);
        assert!((abs.y - 1.8).abs() < 1e-9);
        assert_eq!(cell.lattice(), (11, 2));
        assert_eq!(cell.rel_lattice(), (1, 0));

        cell.set_relative_position(0.28, 0.9);
        let abs = cell.absolute_position();
        assert!((abs.x - 1.68).abs() < 1e-9);
        assert!((abs.y - 2.7).abs() < 1e-9);
        assert!((cell.bbox().max.y - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_set_size_updates_bbox_only() {
        let mut cell = Cell::new("BUF", 0.0, 0.0).with_orientation(Orientation::FS);
        cell.set_size(0.28, 1.8);
        assert!((cell.bbox().width() - 0.28).abs() < 1e-9);
        assert!((cell.bbox().height() - 1.8).abs() < 1e-9);
        assert_eq!(cell.orientation(), Orientation::FS);
    }

    #[test]
    fn test_placement_anchor_per_orientation() {
        let mut cell = Cell::new("C", 1.0, 2.0).with_size(0.5, 0.9);
        let expect = [
            (Orientation::N, 1.0, 2.0),
            (Orientation::S, 1.5, 2.9),
            (Orientation::FN, 1.5, 2.0),
            (Orientation::FS, 1.0, 2.9),
        ];
        for (o, x, y) in expect {
            cell.set_orientation(o);
            let a = cell.placement_anchor();
            assert!((a.x - x).abs() < 1e-9, "{} x", o);
            assert!((a.y - y).abs() < 1e-9, "{} y", o);
            // The footprint never rotates.
            assert!((cell.bbox().min.x - 1.0).abs() < 1e-9);
            assert!((cell.bbox().min.y - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_orientation_for_row() {
        let cell = Cell::new("C", 0.0, 0.0);
        assert_eq!(cell.orientation_for_row(0.0), Orientation::FS);
        assert_eq!(cell.orientation_for_row(0.9), Orientation::N);
        // Half a row up still counts as row 0.
        assert_eq!(cell.orientation_for_row(0.45), Orientation::FS);
        let cell = cell.with_orientation(Orientation::FN);
        assert_eq!(cell.orientation_for_row(1.8), Orientation::S);
        assert_eq!(cell.orientation_for_row(2.7), Orientation::FN);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Cell::new("C", 0.0, 0.0);
        let mut copy = original.clone();
        copy.set_relative_position(5.0, 5.0);
        copy.flip_orientation();
        assert_eq!(original.position(), Point::new(0.0, 0.0));
        assert_eq!(original.orientation(), Orientation::N);
        assert_eq!(copy.orientation(), Orientation::FN);
    }

    #[test]
    fn test_hierarchical_path() {
        let mut cell = Cell::new("C1", 0.0, 0.0);
        cell.set_hierarchical_path("TOP/SUB");
        assert_eq!(cell.hierarchical_path(), "TOP/SUB/C1");
        cell.set_hierarchical_path("");
        assert_eq!(cell.hierarchical_path(), "C1");
    }
}
