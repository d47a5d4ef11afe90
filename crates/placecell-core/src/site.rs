use serde::{Deserialize, Serialize};

use crate::error::{PlaceError, PlaceResult};
use crate::geometry::Point;

/// Integer (column, row) coordinate on a [`SiteInfo`] lattice.
pub type Lattice = (i64, i64);

/// Placement site pitch. Every micro origin lies on the lattice spanned by
/// `width` along X and `height` along Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    width: f64,
    height: f64,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            width: 0.14,
            height: 0.9,
        }
    }
}

impl SiteInfo {
    pub fn new(width: f64, height: f64) -> PlaceResult<Self> {
        let site = Self { width, height };
        site.validate()?;
        Ok(site)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Check that both pitches are strictly positive (and finite).
    pub fn validate(&self) -> PlaceResult<()> {
        let ok = |p: f64| p.is_finite() && p > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(PlaceError::InvalidConfiguration {
                pitch_x: self.width,
                pitch_y: self.height,
            })
        }
    }

    /// Round each axis to the nearest lattice point.
    pub fn snap(&self, x: f64, y: f64) -> Point {
        let (i, j) = self.to_lattice(x, y);
        self.from_lattice(i, j)
    }

    pub fn snap_point(&self, p: &Point) -> Point {
        self.snap(p.x, p.y)
    }

    /// Nearest lattice index; exact halves go to the even index.
    pub fn to_lattice(&self, x: f64, y: f64) -> Lattice {
        (
            (x / self.width).round_ties_even() as i64,
            (y / self.height).round_ties_even() as i64,
        )
    }

    pub fn point_to_lattice(&self, p: &Point) -> Lattice {
        self.to_lattice(p.x, p.y)
    }

    pub fn from_lattice(&self, i: i64, j: i64) -> Point {
        Point::new(i as f64 * self.width, j as f64 * self.height)
    }

    /// Placement row index of an absolute Y coordinate.
    pub fn row_of(&self, y: f64) -> i64 {
        (y / self.height).round_ties_even() as i64
    }
}
