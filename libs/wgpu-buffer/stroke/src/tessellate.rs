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
use geometry::algorithm::divide_unit_circle;
use nalgebra::{Matrix2, Point2, Vector2};
use std::f32::consts::PI;

/// One sampled input point. Pressure comes from the tablet or is 1.0 for
/// mouse input, and widens the stroke around this sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSample {
    pub position: Point2<f32>,
    pub pressure: f32,
}

impl PointSample {
    pub fn new(position: Point2<f32>) -> Self {
        Self::with_pressure(position, 1f32)
    }

    pub fn with_pressure(position: Point2<f32>, pressure: f32) -> Self {
        Self { position, pressure }
    }

    /// Fraction of the nominal stroke radius drawn at this sample. Light
    /// touches still leave a mark, hence the floor.
    pub fn radius_scale(&self) -> f32 {
        0.15 + 0.85 * self.pressure.sqrt()
    }
}

/// Triangle-list tessellation of a polyline stroke: a round cap at every
/// sample, a four-triangle joint between neighbors. Joint edges are rotated
/// by asin((r2 - r1) / d) so caps of different radii meet tangentially, and
/// cap wedges buried inside a joint are dropped.
pub(crate) fn tessellate(samples: &[PointSample], closed: bool, width: f32) -> Vec<Point2<f32>> {
    let closed = closed && samples.len() > 2;
    let mut out = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        let previous = if i > 0 {
            Some(&samples[i - 1])
        } else if closed {
            samples.last()
        } else {
            None
        };
        let next = if i + 1 < samples.len() {
            Some(&samples[i + 1])
        } else if closed {
            samples.first()
        } else {
            None
        };
        cap_and_joint(sample, previous, next, width, &mut out);
    }
    out
}

fn cap_and_joint(
    sample: &PointSample,
    previous: Option<&PointSample>,
    next: Option<&PointSample>,
    width: f32,
    out: &mut Vec<Point2<f32>>,
) {
    let location = sample.position;
    let radius = sample.radius_scale() * width / 2f32;
    let wedge_count = ((PI * radius).ceil() as usize).max(4);
    let mut ring = divide_unit_circle(wedge_count);
    ring.push(ring[0]);
    let mut visible: Vec<usize> = (0..wedge_count).collect();

    if let Some(next) = next {
        let next_radius = next.radius_scale() * width / 2f32;
        let v = location - next.position;
        let sin_theta = (next_radius - radius) / v.norm();
        if sin_theta >= 1f32 {
            // This cap is entirely inside the next one.
            visible.clear();
        } else if sin_theta > -1f32 {
            let (v1, v2) = joint_frame(&v, sin_theta);
            visible.retain(|&i| wedge_visible(&ring, i, &v1, &v2));
        }
    }

    if let Some(previous) = previous {
        let previous_radius = previous.radius_scale() * width / 2f32;
        let v = location - previous.position;
        let sin_theta = (radius - previous_radius) / v.norm();
        if sin_theta > -1f32 && sin_theta < 1f32 {
            let (v1, v2) = joint_frame(&v, sin_theta);

            let u1 = Vector2::new(-v1.y, v1.x).normalize();
            let u2 = Vector2::new(v2.y, -v2.x).normalize();
            let p1 = previous.position + u1 * previous_radius;
            let p2 = previous.position + u2 * previous_radius;
            let p3 = location + u1 * radius;
            let p4 = location + u2 * radius;
            out.extend_from_slice(&[
                p1,
                previous.position,
                p3,
                p3,
                previous.position,
                location,
                previous.position,
                p2,
                location,
                location,
                p2,
                p4,
            ]);

            visible.retain(|&i| wedge_visible(&ring, i, &v1, &v2));
        }
    }

    for i in visible {
        out.push(location);
        out.push(location + ring[i] * radius);
        out.push(location + ring[i + 1] * radius);
    }
}

/// The joint edge directions: `v` rotated by +/- theta.
fn joint_frame(v: &Vector2<f32>, sin_theta: f32) -> (Vector2<f32>, Vector2<f32>) {
    let cos_theta = (1f32 - sin_theta * sin_theta).sqrt();
    let m1 = Matrix2::new(cos_theta, -sin_theta, sin_theta, cos_theta);
    let m2 = Matrix2::new(cos_theta, sin_theta, -sin_theta, cos_theta);
    (m1 * v, m2 * v)
}

fn wedge_visible(ring: &[Vector2<f32>], i: usize, v1: &Vector2<f32>, v2: &Vector2<f32>) -> bool {
    // Ring directions tangent to a joint edge sit on the edge itself, up to
    // float rounding in the ring's sin/cos, so they count as buried.
    let limit = 1e-5 * v1.norm();
    ring[i].dot(v1) > limit
        || ring[i + 1].dot(v1) > limit
        || ring[i].dot(v2) > limit
        || ring[i + 1].dot(v2) > limit
}
