//! Geometry and colour types shared by records and the device context

use serde::{Deserialize, Serialize};

/// Point in logical units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Rectangle as (left, top) - (right, bottom), inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    /// `((0,0),(-1,-1))`: bounds not computed
    pub const UNSET: Bounds = Bounds {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Tight rectangle around a point list, `None` when the list is empty
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in rest {
            bounds.left = bounds.left.min(p.x);
            bounds.right = bounds.right.max(p.x);
            bounds.top = bounds.top.min(p.y);
            bounds.bottom = bounds.bottom.max(p.y);
        }
        Some(bounds)
    }

    pub fn is_unset(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Smallest rectangle containing both; an unset side is ignored
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_unset() {
            return *other;
        }
        if other.is_unset() {
            return *self;
        }
        Bounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::UNSET
    }
}

/// Pack an RGB triple into a COLORREF (0x00BBGGRR)
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16)
}
