use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Point};

/// Shared area below this is float noise on abutting edges, not an overlap.
pub const OVERLAP_TOLERANCE: f64 = 1e-9;

/// A placed leaf cell in the R-tree, identified by its hierarchical path.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementEntry {
    /// Insertion order, used to report pairs deterministically.
    pub ordinal: usize,
    pub path: String,
    /// Name of the registered root the cell belongs to.
    pub root: String,
    /// Canonical footprint.
    pub bbox: BBox,
}

impl RTreeObject for PlacementEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope_of(&self.bbox)
    }
}

fn envelope_of(bbox: &BBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min.x, bbox.min.y], [bbox.max.x, bbox.max.y])
}

/// Spatial index over placed cell footprints for point, region and overlap queries.
pub struct PlacementIndex {
    tree: RTree<PlacementEntry>,
}

impl PlacementIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load `(path, root, bbox)` triples, numbering them in iteration order.
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String, BBox)>,
    {
        let entries: Vec<PlacementEntry> = entries
            .into_iter()
            .enumerate()
            .map(|(ordinal, (path, root, bbox))| PlacementEntry {
                ordinal,
                path,
                root,
                bbox,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Entries whose footprint contains `point` (edges included).
    pub fn query_point(&self, point: &Point) -> Vec<&PlacementEntry> {
        let probe = AABB::from_point([point.x, point.y]);
        let mut hits: Vec<_> = self.tree.locate_in_envelope_intersecting(&probe).collect();
        hits.sort_by_key(|e| e.ordinal);
        hits
    }

    /// Entries whose footprint touches or intersects `region`.
    pub fn query_region(&self, region: &BBox) -> Vec<&PlacementEntry> {
        let mut hits: Vec<_> = self
            .tree
            .locate_in_envelope_intersecting(&envelope_of(region))
            .collect();
        hits.sort_by_key(|e| e.ordinal);
        hits
    }

    /// Every pair of entries sharing a positive area. Abutting footprints are
    /// not reported. Pairs come out ordered by insertion.
    pub fn overlapping_pairs(&self) -> Vec<(&PlacementEntry, &PlacementEntry)> {
        let mut pairs = Vec::new();
        for a in self.tree.iter() {
            for b in self.tree.locate_in_envelope_intersecting(&a.envelope()) {
                if a.ordinal < b.ordinal && a.bbox.overlap_area(&b.bbox) > OVERLAP_TOLERANCE {
                    pairs.push((a, b));
                }
            }
        }
        pairs.sort_by_key(|(a, b)| (a.ordinal, b.ordinal));
        pairs
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for PlacementIndex {
    fn default() -> Self {
        Self::new()
    }
}
