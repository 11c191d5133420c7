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
mod tessellate;
mod vertex;

pub use crate::{
    tessellate::PointSample,
    vertex::StrokeVertex,
};

use geometry::{
    algorithm::{distance_to_segment, snap_to_octant},
    BoundRect,
};
use nalgebra::{Point2, Vector2};
use scene::{Generation, OnDemand, RenderItem};
use shader_shared::{BufferBinding, ItemColor, ItemDepth, ItemOffset, ViewportQuad};
use std::f32::consts::FRAC_PI_2;

/// Geometry source for a stroke. Every kind resolves to a polyline of point
/// samples that the shared tessellator turns into triangles.
#[derive(Clone, Debug)]
enum StrokeShape {
    Freehand {
        samples: Vec<PointSample>,
        /// Running bounds over raw sample positions, grown as samples arrive.
        sample_bounds: BoundRect,
    },
    Line {
        from: Point2<f32>,
        to: Point2<f32>,
        center_mode: bool,
        octant_snap: bool,
    },
    Rectangle {
        from: Point2<f32>,
        to: Point2<f32>,
        center_mode: bool,
        square: bool,
    },
    Ellipse {
        from: Point2<f32>,
        to: Point2<f32>,
        center_mode: bool,
        circle: bool,
    },
}

/// A drawn stroke: freehand path or line/rectangle/ellipse shape, with a
/// flat color and a pressure-scaled width.
pub struct StrokeItem {
    shape: StrokeShape,
    color: [f32; 4],
    width: f32,
    position: Vector2<f32>,
    hidden: bool,
    generation: Generation,
    vertices: OnDemand<Vec<StrokeVertex>>,
}

impl StrokeItem {
    fn with_shape(shape: StrokeShape, color: [f32; 4], width: f32) -> Self {
        Self {
            shape,
            color,
            width,
            position: Vector2::new(0f32, 0f32),
            hidden: false,
            generation: Generation::new(),
            vertices: OnDemand::new(),
        }
    }

    pub fn freehand(color: [f32; 4], width: f32) -> Self {
        Self::with_shape(
            StrokeShape::Freehand {
                samples: Vec::new(),
                sample_bounds: BoundRect::empty(),
            },
            color,
            width,
        )
    }

    pub fn line(color: [f32; 4], width: f32) -> Self {
        Self::with_shape(
            StrokeShape::Line {
                from: Point2::origin(),
                to: Point2::origin(),
                center_mode: false,
                octant_snap: false,
            },
            color,
            width,
        )
    }

    pub fn rectangle(color: [f32; 4], width: f32) -> Self {
        Self::with_shape(
            StrokeShape::Rectangle {
                from: Point2::origin(),
                to: Point2::origin(),
                center_mode: false,
                square: false,
            },
            color,
            width,
        )
    }

    pub fn ellipse(color: [f32; 4], width: f32) -> Self {
        Self::with_shape(
            StrokeShape::Ellipse {
                from: Point2::origin(),
                to: Point2::origin(),
                center_mode: false,
                circle: false,
            },
            color,
            width,
        )
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn add_sample(&mut self, position: Point2<f32>, pressure: f32) {
        match &mut self.shape {
            StrokeShape::Freehand {
                samples,
                sample_bounds,
            } => {
                samples.push(PointSample::with_pressure(position, pressure));
                sample_bounds.extend(&position);
                self.generation.bump();
            }
            _ => debug_assert!(false, "samples only apply to freehand strokes"),
        }
    }

    pub fn set_endpoints(&mut self, new_from: Point2<f32>, new_to: Point2<f32>) {
        match &mut self.shape {
            StrokeShape::Line { from, to, .. }
            | StrokeShape::Rectangle { from, to, .. }
            | StrokeShape::Ellipse { from, to, .. } => {
                *from = new_from;
                *to = new_to;
                self.generation.bump();
            }
            StrokeShape::Freehand { .. } => {
                debug_assert!(false, "endpoints do not apply to freehand strokes")
            }
        }
    }

    /// Mirror the shape around `from` instead of stretching from it.
    pub fn set_center_mode(&mut self, enabled: bool) {
        match &mut self.shape {
            StrokeShape::Line { center_mode, .. }
            | StrokeShape::Rectangle { center_mode, .. }
            | StrokeShape::Ellipse { center_mode, .. } => {
                *center_mode = enabled;
                self.generation.bump();
            }
            StrokeShape::Freehand { .. } => {
                debug_assert!(false, "center mode does not apply to freehand strokes")
            }
        }
    }

    /// Snap the line to the nearest of the eight axis/diagonal angles.
    pub fn set_octant_snap(&mut self, enabled: bool) {
        if let StrokeShape::Line { octant_snap, .. } = &mut self.shape {
            *octant_snap = enabled;
            self.generation.bump();
        } else {
            debug_assert!(false, "octant snapping only applies to line strokes");
        }
    }

    pub fn set_square(&mut self, enabled: bool) {
        if let StrokeShape::Rectangle { square, .. } = &mut self.shape {
            *square = enabled;
            self.generation.bump();
        } else {
            debug_assert!(false, "the square constraint only applies to rectangle strokes");
        }
    }

    pub fn set_circle(&mut self, enabled: bool) {
        if let StrokeShape::Ellipse { circle, .. } = &mut self.shape {
            *circle = enabled;
            self.generation.bump();
        } else {
            debug_assert!(false, "the circle constraint only applies to ellipse strokes");
        }
    }

    /// Triangle-list vertices in local coordinates, rebuilt when the stroke
    /// has changed since the last call.
    pub fn tessellate(&mut self) -> &[StrokeVertex] {
        let (samples, closed) = self.resolved_samples();
        let width = self.width;
        let generation = self.generation;
        self.vertices.get_or_build(generation, || {
            tessellate::tessellate(&samples, closed, width)
                .iter()
                .map(StrokeVertex::new)
                .collect()
        })
    }

    pub fn color_uniform(&self) -> ItemColor {
        ItemColor::new(self.color)
    }

    pub fn offset_uniform(&self) -> ItemOffset {
        ItemOffset::new([self.position.x, self.position.y])
    }

    /// Uniform interface of the stroke pipeline, one entry per registry slot
    /// it reads.
    pub fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 4] {
        [
            BufferBinding::Viewport.uniform_layout_entry(ViewportQuad::mem_size()),
            BufferBinding::Offset.uniform_layout_entry(ItemOffset::mem_size()),
            BufferBinding::Depth.uniform_layout_entry(ItemDepth::mem_size()),
            BufferBinding::Color.uniform_layout_entry(ItemColor::mem_size()),
        ]
    }

    /// The polyline the tessellator consumes, plus whether it closes back on
    /// itself.
    fn resolved_samples(&self) -> (Vec<PointSample>, bool) {
        match &self.shape {
            StrokeShape::Freehand { samples, .. } => (samples.clone(), false),
            StrokeShape::Line {
                from,
                to,
                center_mode,
                octant_snap,
            } => {
                let from = *from;
                if from == *to {
                    return (vec![PointSample::new(from)], false);
                }
                let to = resolve_line_end(from, *to, *octant_snap);
                let samples = if *center_mode {
                    vec![
                        PointSample::new(from - (to - from)),
                        PointSample::new(to),
                    ]
                } else {
                    vec![PointSample::new(from), PointSample::new(to)]
                };
                (samples, false)
            }
            StrokeShape::Rectangle {
                from,
                to,
                center_mode,
                square,
            } => {
                let from = *from;
                if from == *to {
                    return (vec![PointSample::new(from)], false);
                }
                let to = if *square {
                    resolve_square_end(from, *to)
                } else {
                    *to
                };
                let from = if *center_mode { from - (to - from) } else { from };
                if to.x == from.x || to.y == from.y {
                    return (
                        vec![PointSample::new(from), PointSample::new(to)],
                        false,
                    );
                }
                let corners = vec![
                    PointSample::new(from),
                    PointSample::new(Point2::new(from.x, to.y)),
                    PointSample::new(to),
                    PointSample::new(Point2::new(to.x, from.y)),
                ];
                (corners, true)
            }
            StrokeShape::Ellipse {
                from,
                to,
                center_mode,
                circle,
            } => {
                if from == to {
                    return (vec![PointSample::new(*from)], false);
                }
                let (center, rx, ry) = ellipse_center_and_radii(*from, *to, *circle, *center_mode);
                if rx == 0f32 || ry == 0f32 {
                    let r = Vector2::new(rx, ry);
                    return (
                        vec![PointSample::new(center - r), PointSample::new(center + r)],
                        false,
                    );
                }
                let points = ellipse_points(center, rx, ry);
                let closed = points.len() > 2;
                (points.into_iter().map(PointSample::new).collect(), closed)
            }
        }
    }
}

impl RenderItem for StrokeItem {
    fn global_position(&self) -> Vector2<f32> {
        self.position
    }

    fn set_global_position(&mut self, position: Vector2<f32>) {
        self.position = position;
    }

    fn local_bounding_rect(&self) -> BoundRect {
        match &self.shape {
            StrokeShape::Freehand { sample_bounds, .. } => sample_bounds.inflate(self.width),
            StrokeShape::Line {
                from,
                to,
                center_mode,
                octant_snap,
            } => {
                let to = resolve_line_end(*from, *to, *octant_snap);
                endpoint_bounds(*from, to, *center_mode, self.width)
            }
            StrokeShape::Rectangle {
                from,
                to,
                center_mode,
                square,
            } => {
                let to = if *square {
                    resolve_square_end(*from, *to)
                } else {
                    *to
                };
                endpoint_bounds(*from, to, *center_mode, self.width)
            }
            StrokeShape::Ellipse {
                from,
                to,
                center_mode,
                circle,
            } => {
                let (center, rx, ry) = ellipse_center_and_radii(*from, *to, *circle, *center_mode);
                let half = Vector2::new(rx + self.width / 2f32, ry + self.width / 2f32);
                BoundRect::from_center_and_half_extent(center, half)
            }
        }
    }

    fn hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn is_opaque(&self) -> bool {
        self.color[3] == 1f32
    }

    fn distance_to(&self, global_point: Point2<f32>) -> f32 {
        let local = global_point - self.position;
        let (samples, closed) = self.resolved_samples();
        if samples.is_empty() {
            return f32::INFINITY;
        }
        let half_stroke = self.width / 2f32;
        let mut previous = if closed {
            samples[samples.len() - 1]
        } else {
            samples[0]
        };
        let mut min_distance = f32::INFINITY;
        for sample in &samples {
            let d = distance_to_segment(&local, &previous.position, &sample.position) - half_stroke;
            min_distance = min_distance.min(d);
            previous = *sample;
        }
        min_distance
    }
}

fn resolve_line_end(from: Point2<f32>, to: Point2<f32>, octant_snap: bool) -> Point2<f32> {
    if octant_snap {
        from + snap_to_octant(to - from)
    } else {
        to
    }
}

fn resolve_square_end(from: Point2<f32>, to: Point2<f32>) -> Point2<f32> {
    let diff = to - from;
    let length = diff.abs().max();
    Point2::new(
        from.x + if diff.x >= 0f32 { length } else { -length },
        from.y + if diff.y >= 0f32 { length } else { -length },
    )
}

/// Bounds of a two-endpoint shape, grown by the stroke width.
fn endpoint_bounds(from: Point2<f32>, to: Point2<f32>, center_mode: bool, width: f32) -> BoundRect {
    if center_mode {
        let half = (to - from).abs() + Vector2::new(width / 2f32, width / 2f32);
        BoundRect::from_center_and_half_extent(from, half)
    } else {
        let center = nalgebra::center(&from, &to);
        let half = ((from - to).abs() + Vector2::new(width, width)) / 2f32;
        BoundRect::from_center_and_half_extent(center, half)
    }
}

fn ellipse_center_and_radii(
    from: Point2<f32>,
    to: Point2<f32>,
    circle: bool,
    center_mode: bool,
) -> (Point2<f32>, f32, f32) {
    if circle {
        if center_mode {
            let r = (to - from).abs().max();
            (from, r, r)
        } else {
            let d = (to - from).abs().max();
            let r = d / 2f32;
            let center = from
                + Vector2::new(
                    if to.x >= from.x { r } else { -r },
                    if to.y >= from.y { r } else { -r },
                );
            (center, r, r)
        }
    } else {
        let center = if center_mode {
            from
        } else {
            nalgebra::center(&from, &to)
        };
        let uv = to - center;
        (center, uv.x.abs(), uv.y.abs())
    }
}

/// Sample the ellipse outline with curvature-adaptive spacing: the first
/// quadrant is walked with steps inversely proportional to the local radius
/// of curvature, then mirrored into the other three quadrants.
fn ellipse_points(center: Point2<f32>, rx: f32, ry: f32) -> Vec<Point2<f32>> {
    let mut points: Vec<Vector2<f32>> = Vec::new();
    let mut theta = 0f32;
    let rx_sqr = rx * rx;
    let ry_sqr = ry * ry;
    while theta < FRAC_PI_2 {
        let ct = theta.cos();
        let st = theta.sin();
        points.push(Vector2::new(rx * ct, ry * st));
        let d = (rx_sqr * st * st + ry_sqr * ct * ct).sqrt();
        theta += (4f32 / d).min(FRAC_PI_2 / 16f32);
    }
    points.push(Vector2::new(0f32, ry));

    let quarter_len = points.len();
    for i in (0..quarter_len - 1).rev() {
        let mut p = points[i];
        p.x = -p.x;
        points.push(p);
    }
    let half_len = points.len();
    for i in (1..half_len - 1).rev() {
        let mut p = points[i];
        p.y = -p.y;
        points.push(p);
    }
    points.into_iter().map(|p| center + p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BLACK: [f32; 4] = [0f32, 0f32, 0f32, 1f32];

    #[test]
    fn test_freehand_bounds_grow_with_samples() {
        let mut item = StrokeItem::freehand(BLACK, 2f32);
        assert!(item.local_bounding_rect().is_empty());
        item.add_sample(Point2::new(0f32, 0f32), 1f32);
        item.add_sample(Point2::new(10f32, 5f32), 1f32);
        let bounds = item.local_bounding_rect();
        assert_eq!(bounds.lo(), Point2::new(-2f32, -2f32));
        assert_eq!(bounds.hi(), Point2::new(12f32, 7f32));
    }

    #[test]
    fn test_freehand_vertices_rebuild_on_new_samples() {
        let mut item = StrokeItem::freehand(BLACK, 2f32);
        item.add_sample(Point2::new(0f32, 0f32), 1f32);
        let single_cap = item.tessellate().len();
        assert_eq!(single_cap, 12);

        // Unchanged item returns the cached tessellation.
        assert_eq!(item.tessellate().len(), single_cap);

        item.add_sample(Point2::new(10f32, 0f32), 1f32);
        assert_eq!(item.tessellate().len(), 24);
    }

    #[test]
    fn test_line_octant_snapping() {
        let mut item = StrokeItem::line(BLACK, 1f32);
        item.set_endpoints(Point2::new(0f32, 0f32), Point2::new(10f32, 0.3f32));
        item.set_octant_snap(true);
        let (samples, closed) = item.resolved_samples();
        assert!(!closed);
        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[1].position.y, 0f32);
    }

    #[test]
    fn test_line_center_mode_mirrors_start() {
        let mut item = StrokeItem::line(BLACK, 1f32);
        item.set_endpoints(Point2::new(5f32, 5f32), Point2::new(7f32, 5f32));
        item.set_center_mode(true);
        let (samples, _) = item.resolved_samples();
        assert_eq!(samples[0].position, Point2::new(3f32, 5f32));
        assert_eq!(samples[1].position, Point2::new(7f32, 5f32));
    }

    #[test]
    fn test_line_bounds() {
        let mut item = StrokeItem::line(BLACK, 2f32);
        item.set_endpoints(Point2::new(0f32, 0f32), Point2::new(10f32, 0f32));
        let bounds = item.local_bounding_rect();
        assert_eq!(bounds.lo(), Point2::new(-1f32, -1f32));
        assert_eq!(bounds.hi(), Point2::new(11f32, 1f32));
    }

    #[test]
    fn test_rectangle_square_constraint() {
        let mut item = StrokeItem::rectangle(BLACK, 1f32);
        item.set_endpoints(Point2::new(0f32, 0f32), Point2::new(4f32, 2f32));
        item.set_square(true);
        let (samples, closed) = item.resolved_samples();
        assert!(closed);
        let corners: Vec<_> = samples.iter().map(|s| s.position).collect();
        assert_eq!(
            corners,
            vec![
                Point2::new(0f32, 0f32),
                Point2::new(0f32, 4f32),
                Point2::new(4f32, 4f32),
                Point2::new(4f32, 0f32),
            ]
        );
    }

    #[test]
    fn test_degenerate_rectangle_collapses_to_line() {
        let mut item = StrokeItem::rectangle(BLACK, 1f32);
        item.set_endpoints(Point2::new(0f32, 0f32), Point2::new(4f32, 0f32));
        let (samples, closed) = item.resolved_samples();
        assert!(!closed);
        assert_eq!(samples.len(), 2);
    }

    #[test]
    fn test_circle_constraint_resolves_center_and_radius() {
        let mut item = StrokeItem::ellipse(BLACK, 1f32);
        item.set_endpoints(Point2::new(0f32, 0f32), Point2::new(4f32, 2f32));
        item.set_circle(true);
        let (samples, closed) = item.resolved_samples();
        assert!(closed);
        // Dragging 4x2 with the circle constraint gives radius 2 about (2, 2).
        let center = Point2::new(2f32, 2f32);
        for sample in &samples {
            assert_relative_eq!((sample.position - center).norm(), 2f32, epsilon = 1e-4);
        }

        let bounds = item.local_bounding_rect();
        assert_relative_eq!(bounds.lo().x, -0.5f32);
        assert_relative_eq!(bounds.hi().y, 4.5f32);
    }

    #[test]
    fn test_ellipse_outline_touches_extremes() {
        let mut item = StrokeItem::ellipse(BLACK, 1f32);
        item.set_endpoints(Point2::new(-4f32, -2f32), Point2::new(4f32, 2f32));
        let (samples, closed) = item.resolved_samples();
        assert!(closed);
        let xs: Vec<f32> = samples.iter().map(|s| s.position.x).collect();
        let ys: Vec<f32> = samples.iter().map(|s| s.position.y).collect();
        let max_x = xs.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let min_x = xs.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max_y = ys.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let min_y = ys.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        assert_relative_eq!(max_x, 4f32, epsilon = 1e-4);
        assert_relative_eq!(min_x, -4f32, epsilon = 1e-4);
        assert_relative_eq!(max_y, 2f32, epsilon = 1e-4);
        assert_relative_eq!(min_y, -2f32, epsilon = 1e-4);
    }

    #[test]
    fn test_distance_to_accounts_for_stroke_width() {
        let mut item = StrokeItem::line(BLACK, 2f32);
        item.set_endpoints(Point2::new(0f32, 0f32), Point2::new(10f32, 0f32));
        // 3 above the centerline, minus the half width.
        assert_relative_eq!(item.distance_to(Point2::new(5f32, 3f32)), 2f32, epsilon = 1e-5);
        // Moving the item moves its hit area.
        item.set_global_position(Vector2::new(0f32, 10f32));
        assert_relative_eq!(
            item.distance_to(Point2::new(5f32, 13f32)),
            2f32,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_opacity_tracks_alpha() {
        assert!(StrokeItem::freehand(BLACK, 1f32).is_opaque());
        assert!(!StrokeItem::freehand([0f32, 0f32, 0f32, 0.5f32], 1f32).is_opaque());
    }

    #[test]
    fn test_uniform_bindings() {
        let mut item = StrokeItem::line(BLACK, 1f32);
        item.set_global_position(Vector2::new(3f32, 4f32));
        assert_eq!(item.offset_uniform().offset, [3f32, 4f32]);
        assert_eq!(item.color_uniform().rgba, BLACK);

        let entries = StrokeItem::bind_group_layout_entries();
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 4, 5]);
    }
}
