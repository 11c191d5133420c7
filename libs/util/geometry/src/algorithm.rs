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
use nalgebra::{Matrix2, Point2, Vector2};
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

pub const HALF_SQRT_2: f32 = FRAC_1_SQRT_2;

/// The eight axis and diagonal directions, counter-clockwise from +y.
pub const OCTANT_DIRECTIONS: [[f32; 2]; 8] = [
    [0.0, 1.0],
    [HALF_SQRT_2, HALF_SQRT_2],
    [1.0, 0.0],
    [HALF_SQRT_2, -HALF_SQRT_2],
    [0.0, -1.0],
    [-HALF_SQRT_2, -HALF_SQRT_2],
    [-1.0, 0.0],
    [-HALF_SQRT_2, HALF_SQRT_2],
];

pub fn rotate_scale_matrix(radians: f32, scale: f32) -> Matrix2<f32> {
    let cos_value = radians.cos() * scale;
    let sin_value = radians.sin() * scale;
    Matrix2::new(cos_value, -sin_value, sin_value, cos_value)
}

/// Euclidean distance from `p` to the closest point on segment `ab`.
pub fn distance_to_segment(p: &Point2<f32>, a: &Point2<f32>, b: &Point2<f32>) -> f32 {
    let u1 = p - a;
    let v1 = b - a;
    if u1.dot(&v1) <= 0f32 {
        return u1.norm();
    }
    let u2 = p - b;
    let v2 = a - b;
    let dot = u2.dot(&v2);
    if dot <= 0f32 {
        return u2.norm();
    }
    let u2_len = u2.norm();
    let cos_value = dot / u2_len / v2.norm();
    let sin_value = (1f32 - cos_value * cos_value).max(0f32).sqrt();
    u2_len * sin_value
}

/// `count` evenly spaced unit vectors, counter-clockwise from angle zero.
pub fn divide_unit_circle(count: usize) -> Vec<Vector2<f32>> {
    debug_assert!(count > 0);
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = step * i as f32;
            Vector2::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Project `v` onto whichever of the eight octant directions it most closely
/// follows. Used for angle-snapped line drawing.
pub fn snap_to_octant(v: Vector2<f32>) -> Vector2<f32> {
    let mut best = Vector2::new(0f32, 0f32);
    let mut best_dot = f32::NEG_INFINITY;
    for dir in &OCTANT_DIRECTIONS {
        let dir = Vector2::new(dir[0], dir[1]);
        let dot = dir.dot(&v);
        if dot > best_dot {
            best_dot = dot;
            best = dir * dot;
        }
    }
    best
}
