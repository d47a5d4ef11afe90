use serde::{Deserialize, Serialize};

/// Number of fractional digits kept in exported coordinates.
pub const EXPORT_PRECISION: i32 = 3;

/// Round `value` to `digits` fractional digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// A 2D point in placement coordinates (microns).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn offset_by(&self, other: &Point) -> Self {
        self.translate(other.x, other.y)
    }

    /// The vector from `other` to `self`.
    pub fn relative_to(&self, other: &Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn rounded(&self, digits: i32) -> Self {
        Self::new(round_to(self.x, digits), round_to(self.y, digits))
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box with lower-left corner `origin` and extent `width` x `height`.
    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin, origin.translate(width, height))
    }

    /// Smallest box enclosing every box in `boxes`, or `None` if there are none.
    pub fn enclosing(boxes: impl IntoIterator<Item = BBox>) -> Option<Self> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BBox>, bb| match acc {
                Some(acc) => Some(acc.union(&bb)),
                None => Some(bb),
            })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Area shared with `other`. Boxes that only touch along an edge share zero area.
    pub fn overlap_area(&self, other: &BBox) -> f64 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}
