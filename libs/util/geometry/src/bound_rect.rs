// This file is part of Slate.
//
// Slate is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Slate is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Slate.  If not, see <http://www.gnu.org/licenses/>.
use nalgebra::{Point2, Vector2};

/// Axis-aligned bounding rectangle over whiteboard space. The empty rect is
/// the identity for union and intersects nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundRect {
    lo: Point2<f32>,
    hi: Point2<f32>,
}

impl BoundRect {
    pub fn empty() -> Self {
        Self {
            lo: Point2::new(f32::INFINITY, f32::INFINITY),
            hi: Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_bounds(lo: Point2<f32>, hi: Point2<f32>) -> Self {
        debug_assert!(lo.x <= hi.x && lo.y <= hi.y);
        Self { lo, hi }
    }

    pub fn from_origin_and_extent(origin: Point2<f32>, extent: Vector2<f32>) -> Self {
        Self::from_bounds(origin, origin + extent)
    }

    pub fn from_center_and_half_extent(center: Point2<f32>, half: Vector2<f32>) -> Self {
        Self::from_bounds(center - half, center + half)
    }

    pub fn is_empty(&self) -> bool {
        self.lo.x > self.hi.x || self.lo.y > self.hi.y
    }

    pub fn lo(&self) -> Point2<f32> {
        self.lo
    }

    pub fn hi(&self) -> Point2<f32> {
        self.hi
    }

    pub fn width(&self) -> f32 {
        self.hi.x - self.lo.x
    }

    pub fn height(&self) -> f32 {
        self.hi.y - self.lo.y
    }

    pub fn center(&self) -> Point2<f32> {
        nalgebra::center(&self.lo, &self.hi)
    }

    pub fn extend(&mut self, p: &Point2<f32>) {
        self.lo.x = self.lo.x.min(p.x);
        self.lo.y = self.lo.y.min(p.y);
        self.hi.x = self.hi.x.max(p.x);
        self.hi.y = self.hi.y.max(p.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        if !other.is_empty() {
            out.extend(&other.lo);
            out.extend(&other.hi);
        }
        out
    }

    pub fn contains(&self, p: &Point2<f32>) -> bool {
        p.x >= self.lo.x && p.x <= self.hi.x && p.y >= self.lo.y && p.y <= self.hi.y
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.lo.x <= other.hi.x
            && self.hi.x >= other.lo.x
            && self.lo.y <= other.hi.y
            && self.hi.y >= other.lo.y
    }

    pub fn offset_by(&self, v: Vector2<f32>) -> Self {
        Self {
            lo: self.lo + v,
            hi: self.hi + v,
        }
    }

    /// Grow the rect by `amount` on every side. Leaves the empty rect empty.
    pub fn inflate(&self, amount: f32) -> Self {
        if self.is_empty() {
            return *self;
        }
        let d = Vector2::new(amount, amount);
        Self {
            lo: self.lo - d,
            hi: self.hi + d,
        }
    }
}
