//! Flat 2D geometry for the schematic ranch map.
//!
//! Coordinates live in a local SVG space, not a geographic projection.
//! Everything here is a pure function over value types; rendering and
//! interaction layers build on top.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A point in local map space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box.
///
/// `empty()` is the identity for [`BoundingBox::union`]: min components start
/// at `+inf` and max components at `-inf`, so folding any real box into it
/// yields that box. An empty reduction stays degenerate; callers that are
/// about to size a viewport must check [`BoundingBox::is_degenerate`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The degenerate accumulator box.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Fold another box into this one.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grow the box to include a single point.
    #[must_use]
    pub fn include(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            max_x: self.max_x.max(p.x),
            min_y: self.min_y.min(p.y),
            max_y: self.max_y.max(p.y),
        }
    }

    /// Bounding box of a polygon's vertices.
    ///
    /// An empty slice yields the degenerate box.
    #[must_use]
    pub fn from_polygon(points: &[Point]) -> Self {
        points.iter().fold(Self::empty(), |b, &p| b.include(p))
    }

    /// Union over a collection of boxes. Empty input yields the degenerate
    /// box; callers must guard before rendering.
    #[must_use]
    pub fn of_all<I: IntoIterator<Item = Self>>(boxes: I) -> Self {
        boxes.into_iter().fold(Self::empty(), Self::union)
    }

    /// True when no point has ever been folded in.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when `p` lies inside the box (inclusive edges).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Padded viewport derived from a bounding box.
///
/// The padding keeps shapes on the boundary from being clipped by the
/// viewport edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Compute the viewport for `bounds` with `padding` on every side.
    ///
    /// Precondition: `bounds` is not degenerate. A degenerate box would
    /// produce infinite dimensions; the map layer refuses to render in that
    /// case rather than checking here.
    #[must_use]
    pub fn around(bounds: BoundingBox, padding: f64) -> Self {
        Self {
            origin_x: bounds.min_x - padding,
            origin_y: bounds.min_y - padding,
            width: bounds.width() + 2.0 * padding,
            height: bounds.height() + 2.0 * padding,
        }
    }
}

/// Closed SVG path descriptor for an ordered vertex sequence.
///
/// `M x0 y0 L x1 y1 ... Z` — move to the first vertex, line to each
/// subsequent one, close back to the start. Fewer than three points is a
/// contract violation by the caller (the block invariant guarantees ≥3);
/// the output is then a degenerate shape, not an error.
#[must_use]
pub fn polygon_path(points: &[Point]) -> String {
    let mut path = String::with_capacity(points.len() * 16 + 2);
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(path, "{cmd} {} {} ", fmt_coord(p.x), fmt_coord(p.y));
    }
    path.push('Z');
    path
}

/// Vertex centroid of a polygon.
///
/// Good enough for label anchoring on the small convex-ish parcels the map
/// deals in; not an area-weighted centroid.
#[must_use]
pub fn polygon_center(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Ray-casting point-in-polygon test.
///
/// Casts a ray in +x and counts edge crossings. Points exactly on an edge
/// may land on either side; the map tolerates that (hit-testing is
/// cosmetic, a pixel of slop is invisible).
#[must_use]
pub fn point_in_polygon(p: Point, points: &[Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Format a coordinate without a trailing `.0` on whole numbers.
fn fmt_coord(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
