//! Plain geometry primitives for node positions and group bounds.
//!
//! On the wire these are positional arrays (`[x, y]` and `[x, y, w, h]`),
//! which is what every producer writes; in memory they are named-field
//! structs so layout code stays readable.

use serde::{Deserialize, Serialize};

/// A 2D position, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// A 2D extent, serialized as `[w, h]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

impl From<[f64; 2]> for Size {
    fn from(v: [f64; 2]) -> Self {
        Self { w: v[0], h: v[1] }
    }
}

impl From<Size> for [f64; 2] {
    fn from(s: Size) -> Self {
        [s.w, s.h]
    }
}

/// An axis-aligned rectangle, serialized as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl From<[f64; 4]> for Rect {
    fn from(v: [f64; 4]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            w: v[2],
            h: v[3],
        }
    }
}

impl From<Rect> for [f64; 4] {
    fn from(r: Rect) -> Self {
        [r.x, r.y, r.w, r.h]
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// A zero-size rectangle anchored at `p`.
    pub fn zero_at(p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            w: 0.0,
            h: 0.0,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Smallest rectangle covering both. A zero-size rectangle still
    /// contributes its anchor point, so collapsed nodes serialized without a
    /// size extend the result to their position.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Grows the rectangle outward by `padding` on every side. Degenerate
    /// rectangles stay degenerate.
    pub fn expand(&self, padding: f64) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.x - padding,
            self.y - padding,
            self.w + 2.0 * padding,
            self.h + 2.0 * padding,
        )
    }
}

/// Layout advance direction for successive inlined regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Right,
}
