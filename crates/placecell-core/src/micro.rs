use uuid::Uuid;

use crate::cell::Cell;
use crate::error::{PlaceError, PlaceResult};
use crate::geometry::{BBox, Point};
use crate::site::{Lattice, SiteInfo};

/// Unique micro instance identifier.
pub type MicroId = Uuid;

/// A placement container: owns leaf [`Cell`]s and child `Micro`s.
///
/// The tree is strictly owned. Cells and sub-micros are copied on insertion,
/// so no node can alias another or become its own descendant. Instead of a
/// back-pointer each child keeps its parent's last origin, which is all it
/// needs to derive its own position and relative lattice index.
///
/// Every origin write goes through [`Micro::set_origin`], which snaps to the
/// site lattice and cascades through the whole subtree:
/// * each cell's absolute position is `origin + cell.position()` and its
///   orientation is re-derived from the row it lands in,
/// * each child's origin is `origin + child.offset()`, re-snapped.
#[derive(Debug)]
pub struct Micro {
    id: MicroId,
    name: String,
    description: String,
    site: SiteInfo,
    hierarchical_path: String,
    cells: Vec<Cell>,
    sub_micros: Vec<Micro>,

    origin: Point,
    /// Origin relative to the parent; equals `origin` for a root.
    offset: Point,
    parent_origin: Option<Point>,
    lattice: Lattice,
    rel_lattice: Lattice,
}

impl Micro {
    pub fn new(name: &str, origin_x: f64, origin_y: f64, site: SiteInfo) -> Self {
        let mut micro = Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            site,
            hierarchical_path: name.to_string(),
            cells: Vec::new(),
            sub_micros: Vec::new(),
            origin: Point::ORIGIN,
            offset: Point::ORIGIN,
            parent_origin: None,
            lattice: (0, 0),
            rel_lattice: (0, 0),
        };
        micro.set_origin(origin_x, origin_y);
        micro
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> MicroId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn site_info(&self) -> &SiteInfo {
        &self.site
    }

    pub fn hierarchical_path(&self) -> &str {
        &self.hierarchical_path
    }

    /// Absolute origin, always a lattice point.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Origin relative to the parent micro (the absolute origin for a root).
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_root(&self) -> bool {
        self.parent_origin.is_none()
    }

    /// Lattice index of the absolute origin.
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Lattice index relative to the parent's origin; `(0, 0)` for a root.
    pub fn rel_lattice(&self) -> Lattice {
        self.rel_lattice
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn sub_micros(&self) -> &[Micro] {
        &self.sub_micros
    }

    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.name() == name)
    }

    pub fn sub_micro(&self, name: &str) -> Option<&Micro> {
        self.sub_micros.iter().find(|m| m.name == name)
    }

    pub fn sub_micro_mut(&mut self, name: &str) -> Option<&mut Micro> {
        self.sub_micros.iter_mut().find(|m| m.name == name)
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Insert a copy of `cell`, anchored at this micro's origin.
    pub fn add_cell(&mut self, cell: &Cell) -> PlaceResult<&mut Self> {
        if self.cell(cell.name()).is_some() {
            return Err(PlaceError::DuplicateName(format!(
                "{}/{}",
                self.hierarchical_path,
                cell.name()
            )));
        }
        self.push_cell(cell);
        Ok(self)
    }

    pub fn add_cells(&mut self, cells: &[Cell]) -> PlaceResult<&mut Self> {
        for cell in cells {
            self.add_cell(cell)?;
        }
        Ok(self)
    }

    /// Insert a deep copy of `child`. Its current origin is taken as an
    /// offset from this micro's origin.
    pub fn add_sub_micro(&mut self, child: &Micro) -> PlaceResult<&mut Self> {
        if self.sub_micro(&child.name).is_some() {
            return Err(PlaceError::DuplicateName(format!(
                "{}/{}",
                self.hierarchical_path, child.name
            )));
        }
        let copy = child.clone_tree(None);
        let offset = copy.origin;
        self.attach(copy, offset);
        Ok(self)
    }

    pub fn remove_cell(&mut self, name: &str) -> Option<Cell> {
        let idx = self.cells.iter().position(|c| c.name() == name)?;
        Some(self.cells.remove(idx))
    }

    pub fn remove_sub_micro(&mut self, name: &str) -> Option<Micro> {
        let idx = self.sub_micros.iter().position(|m| m.name == name)?;
        let mut detached = self.sub_micros.remove(idx);
        detached.parent_origin = None;
        detached.reparent_path(None);
        detached.set_origin(detached.origin.x, detached.origin.y);
        Some(detached)
    }

    /// Move one owned cell to relative `(x, y)` and re-derive its orientation.
    pub fn set_cell_position(&mut self, name: &str, x: f64, y: f64) -> PlaceResult<()> {
        let cell = self
            .cells
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| PlaceError::cell_not_found(name))?;
        cell.set_relative_position(x, y);
        cell.apply_row_orientation();
        Ok(())
    }

    fn push_cell(&mut self, cell: &Cell) {
        let mut cell = cell.clone();
        cell.set_site_info(self.site);
        cell.set_absolute_position(self.origin.x, self.origin.y);
        cell.apply_row_orientation();
        cell.set_hierarchical_path(&self.hierarchical_path);
        self.cells.push(cell);
    }

    /// Adopt an owned subtree at `offset` from this micro's origin.
    pub(crate) fn attach(&mut self, mut child: Micro, offset: Point) {
        child.offset = offset;
        child.reparent_path(Some(self.hierarchical_path.as_str()));
        child.follow_parent(self.origin);
        self.sub_micros.push(child);
    }

    // ── Positioning ──────────────────────────────────────────────────

    /// Snap `(x, y)` to the lattice, make it the absolute origin and cascade
    /// the change through the subtree.
    pub fn set_origin(&mut self, x: f64, y: f64) -> &mut Self {
        let origin = self.site.snap(x, y);
        self.apply_origin(origin);
        self
    }

    pub fn set_origin_by_lattice(&mut self, i: i64, j: i64) -> &mut Self {
        let p = self.site.from_lattice(i, j);
        self.set_origin(p.x, p.y)
    }

    /// Shift by the snapped delta `(dx, dy)`.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        let delta = self.site.snap(dx, dy);
        let target = self.origin.offset_by(&delta);
        self.set_origin(target.x, target.y)
    }

    pub fn move_by_lattice(&mut self, di: i64, dj: i64) -> &mut Self {
        let delta = self.site.from_lattice(di, dj);
        self.move_by(delta.x, delta.y)
    }

    fn apply_origin(&mut self, origin: Point) {
        let parent = self.parent_origin.unwrap_or(Point::ORIGIN);
        self.origin = origin;
        self.offset = origin.relative_to(&parent);
        self.lattice = self.site.point_to_lattice(&origin);
        self.rel_lattice = match self.parent_origin {
            Some(p) => {
                let (pi, pj) = self.site.point_to_lattice(&p);
                (self.lattice.0 - pi, self.lattice.1 - pj)
            }
            None => (0, 0),
        };

        for cell in &mut self.cells {
            cell.set_absolute_position(origin.x, origin.y);
            cell.apply_row_orientation();
        }
        for child in &mut self.sub_micros {
            child.follow_parent(origin);
        }
    }

    fn follow_parent(&mut self, parent_origin: Point) {
        self.parent_origin = Some(parent_origin);
        let target = parent_origin.offset_by(&self.offset);
        let origin = self.site.snap_point(&target);
        self.apply_origin(origin);
    }

    /// Mirror the contents left-right inside the current bounding-box width.
    ///
    /// Cells move to `W - x - width` and swap N<->FN, S<->FS; each child is
    /// moved to `W - x - w` (`w` its own width) and mirrored recursively.
    /// Orientations are then re-derived for the rows the cells sit in.
    pub fn flip_horizontal(&mut self) -> &mut Self {
        if self.mirror_contents() {
            let origin = self.origin;
            self.apply_origin(origin);
        }
        self
    }

    /// Returns `false` when there is nothing to mirror (zero width).
    fn mirror_contents(&mut self) -> bool {
        let width = self.bounding_box().width();
        if width <= 0.0 {
            return false;
        }
        for cell in &mut self.cells {
            let p = cell.position();
            cell.set_relative_position(width - p.x - cell.width(), p.y);
            cell.flip_orientation();
        }
        for child in &mut self.sub_micros {
            let child_width = child.bounding_box().width();
            child.offset.x = width - child.offset.x - child_width;
            child.mirror_contents();
        }
        true
    }

    /// Rebind this subtree to `site` and re-snap everything onto it.
    pub fn set_site_info(&mut self, site: SiteInfo) -> &mut Self {
        self.rebind_site(site);
        let origin = self.origin;
        self.set_origin(origin.x, origin.y)
    }

    fn rebind_site(&mut self, site: SiteInfo) {
        self.site = site;
        for cell in &mut self.cells {
            cell.set_site_info(site);
        }
        for child in &mut self.sub_micros {
            child.rebind_site(site);
        }
    }

    // ── Naming ───────────────────────────────────────────────────────

    /// Recompute the hierarchical path of this micro and every descendant.
    pub fn reparent_path(&mut self, parent_path: Option<&str>) {
        self.hierarchical_path = match parent_path {
            Some(parent) if !parent.is_empty() => format!("{}/{}", parent, self.name),
            _ => self.name.clone(),
        };
        let path = self.hierarchical_path.clone();
        for cell in &mut self.cells {
            cell.set_hierarchical_path(&path);
        }
        for child in &mut self.sub_micros {
            child.reparent_path(Some(path.as_str()));
        }
    }

    /// Rename a root micro, updating every path below it.
    pub(crate) fn rename_root(&mut self, name: &str) {
        self.name = name.to_string();
        self.reparent_path(None);
    }

    // ── Traversal ────────────────────────────────────────────────────

    /// Every cell in the subtree: own cells first, then each child's, depth-first.
    pub fn all_cells(&self) -> Box<dyn Iterator<Item = &Cell> + '_> {
        Box::new(
            self.cells
                .iter()
                .chain(self.sub_micros.iter().flat_map(|m| m.all_cells())),
        )
    }

    /// Every descendant micro in pre-order (excluding `self`).
    pub fn all_sub_micros(&self) -> Box<dyn Iterator<Item = &Micro> + '_> {
        Box::new(
            self.sub_micros
                .iter()
                .flat_map(|m| std::iter::once(m).chain(m.all_sub_micros())),
        )
    }

    pub fn cell_count(&self) -> usize {
        self.all_cells().count()
    }

    pub fn sub_micro_count(&self) -> usize {
        self.all_sub_micros().count()
    }

    pub fn find_cell_by_path(&self, path: &str) -> Option<&Cell> {
        self.all_cells().find(|c| c.hierarchical_path() == path)
    }

    pub fn find_sub_micro_by_path(&self, path: &str) -> Option<&Micro> {
        if self.hierarchical_path == path {
            return Some(self);
        }
        self.sub_micros
            .iter()
            .find_map(|m| m.find_sub_micro_by_path(path))
    }

    pub fn find_sub_micro_by_path_mut(&mut self, path: &str) -> Option<&mut Micro> {
        if self.hierarchical_path == path {
            return Some(self);
        }
        self.sub_micros
            .iter_mut()
            .find_map(|m| m.find_sub_micro_by_path_mut(path))
    }

    /// Union of every descendant cell's canonical footprint; all-zero when empty.
    pub fn bounding_box(&self) -> BBox {
        BBox::enclosing(self.all_cells().map(|c| c.bbox())).unwrap_or_default()
    }

    // ── Copying ──────────────────────────────────────────────────────

    /// Deep copy as a new root, optionally renamed. The copy gets a fresh id
    /// and keeps the same absolute origin, description and site.
    pub fn clone_tree(&self, new_name: Option<&str>) -> Micro {
        let name = new_name.unwrap_or(self.name.as_str());
        let mut copy = Micro::new(name, self.origin.x, self.origin.y, self.site)
            .with_description(&self.description);
        for cell in &self.cells {
            copy.push_cell(cell);
        }
        for child in &self.sub_micros {
            let child_copy = child.clone_tree(None);
            copy.attach(child_copy, child.offset);
        }
        copy
    }

    pub fn clone_named(&self, new_name: &str) -> Micro {
        self.clone_tree(Some(new_name))
    }
}

impl Clone for Micro {
    fn clone(&self) -> Self {
        self.clone_tree(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn site() -> SiteInfo {
        SiteInfo::new(0.14, 0.9).unwrap()
    }

    /// Sum of the cell's stored position and every ancestor's offset.
    fn expected_abs(root: &Micro, path: &str) -> Point {
        let mut acc = root.offset();
        let mut node = root;
        let parts: Vec<&str> = path.split('/').collect();
        for part in &parts[1..parts.len() - 1] {
            node = node.sub_micro(part).unwrap();
            acc = acc.offset_by(&node.offset());
        }
        let cell = node.cell(parts[parts.len() - 1]).unwrap();
        acc.offset_by(&cell.position())
    }

    fn assert_propagated(root: &Micro) {
        for cell in root.all_cells() {
            let expect = expected_abs(root, cell.hierarchical_path());
            let abs = cell.absolute_position();
            assert!(
                close(abs.x, expect.x) && close(abs.y, expect.y),
                "{}: {:?} != {:?}",
                cell.hierarchical_path(),
                abs,
                expect
            );
        }
    }

    fn buffer_chain() -> Micro {
        let mut m = Micro::new("BUFFER_CHAIN", 0.0, 0.0, site());
        m.add_cell(&Cell::new("BUF1", 0.0, 0.0)).unwrap();
        m.add_cell(&Cell::new("BUF2", 0.14, 0.0).with_size(0.28, 0.9))
            .unwrap();
        m.add_cell(&Cell::new("BUF3", 0.42, 0.0)).unwrap();
        m
    }

    #[test]
    fn test_origin_is_snapped() {
        let m = Micro::new("A", 0.3, 1.3, site());
        assert!(close(m.origin().x, 0.28));
        assert!(close(m.origin().y, 0.9));
        assert_eq!(m.lattice(), (2, 1));
        assert_eq!(m.rel_lattice(), (0, 0));
        assert!(m.is_root());
    }

    #[test]
    fn test_row_orientation_follows_moves() {
        let mut a = Micro::new("A", 0.0, 0.0, site());
        a.add_cell(&Cell::new("C1", 0.0, 0.0)).unwrap();
        let c1 = a.cell("C1").unwrap();
        assert_eq!(c1.absolute_position(), Point::new(0.0, 0.0));
        assert_eq!(c1.orientation(), Orientation::FS);

        a.move_by(0.0, 0.9);
        let c1 = a.cell("C1").unwrap();
        assert!(close(c1.absolute_position().y, 0.9));
        assert_eq!(c1.lattice().1, 1);
        assert_eq!(c1.orientation(), Orientation::N);

        a.move_by_lattice(0, 1);
        assert_eq!(a.cell("C1").unwrap().orientation(), Orientation::FS);
    }

    #[test]
    fn test_add_cell_copies_and_anchors() {
        let mut m = Micro::new("M", 1.4, 0.0, site());
        let cell = Cell::new("X", 0.14, 0.0);
        m.add_cell(&cell).unwrap();
        assert!(close(cell.absolute_position().x, 0.14));
        assert_eq!(cell.hierarchical_path(), "X");
        let placed = m.cell("X").unwrap();
        assert!(close(placed.absolute_position().x, 1.54));
        assert_eq!(placed.hierarchical_path(), "M/X");
        assert!(matches!(
            m.add_cell(&cell),
            Err(PlaceError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_sub_micro_origin_is_offset() {
        let mut top = Micro::new("TOP", 0.28, 0.9, site());
        let mut chain = buffer_chain();
        chain.set_origin_by_lattice(1, 0);
        top.add_sub_micro(&chain).unwrap();

        let sub = top.sub_micro("BUFFER_CHAIN").unwrap();
        assert!(close(sub.origin().x, 0.42));
        assert!(close(sub.origin().y, 0.9));
        assert_eq!(sub.rel_lattice(), (1, 0));
        assert_eq!(sub.lattice(), (3, 1));
        assert_eq!(sub.hierarchical_path(), "TOP/BUFFER_CHAIN");
        assert_eq!(
            sub.cell("BUF2").unwrap().hierarchical_path(),
            "TOP/BUFFER_CHAIN/BUF2"
        );
        assert_propagated(&top);

        // The argument is untouched.
        assert!(close(chain.origin().x, 0.14));
        assert!(chain.is_root());
    }

    #[test]
    fn test_origin_propagation_through_moves() {
        let mut top = Micro::new("TOP", 0.0, 0.0, site());
        top.add_cell(&Cell::new("PAD", 0.0, 0.0)).unwrap();
        let mut mid = Micro::new("MID", 0.14, 0.9, site());
        mid.add_sub_micro(&buffer_chain()).unwrap();
        top.add_sub_micro(&mid).unwrap();
        assert_propagated(&top);

        top.set_origin(1.4, 1.8);
        assert_propagated(&top);
        top.move_by(0.3, -0.85);
        assert_propagated(&top);
        top.move_by(0.3, 0.0);
        top.move_by(-0.7, 2.7);
        assert_propagated(&top);

        let leaf = top
            .find_cell_by_path("TOP/MID/BUFFER_CHAIN/BUF3")
            .unwrap();
        let expect = top.origin().translate(0.14 + 0.42, 0.9);
        assert!(close(leaf.absolute_position().x, expect.x));
        assert!(close(leaf.absolute_position().y, expect.y));

        // Repeated placement at the same spot is stable.
        let before = leaf.absolute_position();
        let o = top.origin();
        top.set_origin(o.x, o.y);
        top.set_origin(o.x, o.y);
        let after = top
            .find_cell_by_path("TOP/MID/BUFFER_CHAIN/BUF3")
            .unwrap()
            .absolute_position();
        assert!(close(before.x, after.x) && close(before.y, after.y));
    }

    #[test]
    fn test_moving_nested_micro_keeps_parent() {
        let mut top = Micro::new("TOP", 1.4, 0.0, site());
        top.add_sub_micro(&buffer_chain()).unwrap();
        let sub = top.sub_micro_mut("BUFFER_CHAIN").unwrap();
        sub.move_by_lattice(2, 1);
        assert_eq!(sub.rel_lattice(), (2, 1));
        assert!(close(sub.offset().x, 0.28));
        assert!(close(top.origin().x, 1.4));
        assert_propagated(&top);

        top.move_by_lattice(1, 0);
        let sub = top.sub_micro("BUFFER_CHAIN").unwrap();
        assert!(close(sub.origin().x, 1.4 + 0.14 + 0.28));
        assert_eq!(sub.rel_lattice(), (2, 1));
    }

    #[test]
    fn test_self_attach_is_a_copy() {
        let mut m = buffer_chain();
        let snapshot = m.clone();
        m.add_sub_micro(&snapshot.clone_named("INNER")).unwrap();
        m.add_sub_micro(&m.clone_named("INNER2")).unwrap();
        assert_eq!(m.sub_micros().len(), 2);
        let inner2 = m.sub_micro("INNER2").unwrap();
        assert_eq!(inner2.sub_micros().len(), 1);
        assert_eq!(m.cell_count(), 3 + 3 + 6);
        assert_eq!(m.sub_micro_count(), 3);
    }

    #[test]
    fn test_clone_independence() {
        let mut top = Micro::new("TOP", 0.0, 0.0, site());
        top.add_sub_micro(&buffer_chain()).unwrap();
        let mut copy = top.clone_named("COPY");
        assert_ne!(copy.id(), top.id());
        assert_eq!(copy.hierarchical_path(), "COPY");
        assert_eq!(
            copy.all_cells().next().unwrap().hierarchical_path(),
            "COPY/BUFFER_CHAIN/BUF1"
        );

        copy.move_by_lattice(5, 2);
        copy.remove_sub_micro("BUFFER_CHAIN");
        copy.add_cell(&Cell::new("EXTRA", 0.0, 0.0)).unwrap();

        assert!(close(top.origin().x, 0.0));
        assert_eq!(top.cell_count(), 3);
        assert_eq!(top.sub_micro_count(), 1);
        assert!(top.cell("EXTRA").is_none());

        top.move_by_lattice(1, 0);
        assert!(close(copy.origin().x, 0.7));
    }

    #[test]
    fn test_clone_of_moved_tree_preserves_geometry() {
        let mut top = Micro::new("TOP", 0.0, 0.0, site());
        let mut chain = buffer_chain();
        chain.set_origin_by_lattice(3, 1);
        top.add_sub_micro(&chain).unwrap();
        top.set_origin_by_lattice(10, 2);

        let copy = top.clone();
        let a: Vec<_> = top.all_cells().map(|c| (c.absolute_position(), c.orientation())).collect();
        let b: Vec<_> = copy.all_cells().map(|c| (c.absolute_position(), c.orientation())).collect();
        assert_eq!(a, b);
        assert_eq!(
            copy.sub_micro("BUFFER_CHAIN").unwrap().rel_lattice(),
            (3, 1)
        );
    }

    #[test]
    fn test_flip_horizontal_swaps_cells() {
        let mut m = Micro::new("M", 0.0, 0.9, site());
        m.add_cell(&Cell::new("L", 0.0, 0.0).with_size(0.5, 0.9)).unwrap();
        m.add_cell(&Cell::new("R", 1.0, 0.0).with_size(0.5, 0.9)).unwrap();
        assert!(close(m.bounding_box().width(), 1.5));
        assert_eq!(m.cell("L").unwrap().orientation(), Orientation::N);

        m.flip_horizontal();
        assert!(close(m.cell("L").unwrap().position().x, 1.0));
        assert!(close(m.cell("R").unwrap().position().x, 0.0));
        assert_eq!(m.cell("L").unwrap().orientation(), Orientation::FN);
        assert_eq!(m.cell("R").unwrap().orientation(), Orientation::FN);

        m.flip_horizontal();
        assert!(close(m.cell("L").unwrap().position().x, 0.0));
        assert_eq!(m.cell("L").unwrap().orientation(), Orientation::N);
    }

    #[test]
    fn test_flip_horizontal_recurses() {
        let mut top = Micro::new("TOP", 0.0, 0.0, site());
        top.add_cell(&Cell::new("PAD", 0.0, 0.0)).unwrap();
        let mut chain = buffer_chain();
        chain.set_origin_by_lattice(2, 0);
        top.add_sub_micro(&chain).unwrap();
        // PAD [0, 0.14], chain [0.28, 0.84] => W = 0.84
        assert!(close(top.bounding_box().width(), 0.84));

        top.flip_horizontal();
        assert!(close(top.cell("PAD").unwrap().position().x, 0.7));
        let sub = top.sub_micro("BUFFER_CHAIN").unwrap();
        assert!(close(sub.offset().x, 0.0));
        assert!(close(sub.cell("BUF1").unwrap().position().x, 0.42));
        assert!(close(sub.cell("BUF3").unwrap().position().x, 0.0));
        assert_eq!(sub.cell("BUF1").unwrap().orientation(), Orientation::S);
        assert_propagated(&top);
        assert!(close(top.bounding_box().width(), 0.84));
    }

    #[test]
    fn test_flip_empty_is_noop() {
        let mut m = Micro::new("EMPTY", 0.14, 0.0, site());
        m.add_sub_micro(&Micro::new("HOLLOW", 0.28, 0.0, site()))
            .unwrap();
        m.flip_horizontal();
        assert!(close(m.sub_micro("HOLLOW").unwrap().offset().x, 0.28));
        assert_eq!(m.bounding_box(), BBox::default());
    }

    #[test]
    fn test_traversal_order() {
        let mut top = Micro::new("TOP", 0.0, 0.0, site());
        top.add_cell(&Cell::new("A", 0.0, 0.0)).unwrap();
        let mut mid = Micro::new("MID", 0.0, 0.0, site());
        mid.add_cell(&Cell::new("B", 0.0, 0.0)).unwrap();
        mid.add_sub_micro(&Micro::new("LEAF", 0.0, 0.0, site())).unwrap();
        top.add_sub_micro(&mid).unwrap();
        top.add_cell(&Cell::new("C", 0.14, 0.0)).unwrap();
        let mut other = Micro::new("OTHER", 0.0, 0.0, site());
        other.add_cell(&Cell::new("D", 0.0, 0.0)).unwrap();
        top.add_sub_micro(&other).unwrap();

        let cells: Vec<&str> = top.all_cells().map(|c| c.hierarchical_path()).collect();
        assert_eq!(cells, ["TOP/A", "TOP/C", "TOP/MID/B", "TOP/OTHER/D"]);
        let micros: Vec<&str> = top
            .all_sub_micros()
            .map(|m| m.hierarchical_path())
            .collect();
        assert_eq!(micros, ["TOP/MID", "TOP/MID/LEAF", "TOP/OTHER"]);
        assert!(top.find_sub_micro_by_path("TOP/MID/LEAF").is_some());
        assert!(top.find_sub_micro_by_path("TOP/LEAF").is_none());
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut top = Micro::new("TOP", 0.14, 0.0, site());
        top.add_sub_micro(&buffer_chain()).unwrap();
        top.add_cell(&Cell::new("PAD", 0.0, 0.0)).unwrap();
        assert!(top.remove_cell("NOPE").is_none());
        assert!(top.remove_cell("PAD").is_some());

        let detached = top.remove_sub_micro("BUFFER_CHAIN").unwrap();
        assert!(detached.is_root());
        assert_eq!(detached.hierarchical_path(), "BUFFER_CHAIN");
        assert_eq!(
            detached.cell("BUF1").unwrap().hierarchical_path(),
            "BUFFER_CHAIN/BUF1"
        );
        assert!(close(detached.origin().x, 0.14));
        assert_eq!(top.cell_count(), 0);
        assert!(top.remove_sub_micro("BUFFER_CHAIN").is_none());
    }

    #[test]
    fn test_set_cell_position() {
        let mut m = Micro::new("M", 0.0, 0.0, site());
        m.add_cell(&Cell::new("C", 0.0, 0.0)).unwrap();
        m.set_cell_position("C", 0.14, 0.9).unwrap();
        let c = m.cell("C").unwrap();
        assert!(close(c.absolute_position().y, 0.9));
        assert_eq!(c.orientation(), Orientation::N);
        assert!(matches!(
            m.set_cell_position("Z", 0.0, 0.0),
            Err(PlaceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_set_site_info_resnaps() {
        let mut m = Micro::new("M", 0.28, 0.9, site());
        m.add_cell(&Cell::new("C", 0.0, 0.0)).unwrap();
        m.set_site_info(SiteInfo::new(0.2, 1.0).unwrap());
        assert!(close(m.origin().x, 0.2));
        assert!(close(m.origin().y, 1.0));
        assert_eq!(m.lattice(), (1, 1));
        assert_eq!(m.cell("C").unwrap().site_info().height(), 1.0);
    }
}
