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
use anyhow::{ensure, Result};
use geometry::BoundRect;
use memoffset::offset_of;
use nalgebra::{Point2, Vector2};
use scene::RenderItem;
use shader_shared::BufferBinding;
use std::mem;
use zerocopy::{AsBytes, FromBytes};

#[repr(C)]
#[derive(AsBytes, FromBytes, Copy, Clone, Debug)]
pub struct GridVertex {
    position: [f32; 2],
}

impl GridVertex {
    fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn buffer_slot() -> u32 {
        BufferBinding::VertexArray.index()
    }

    #[allow(clippy::unneeded_field_pattern)]
    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        let tmp = wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
            ],
        };

        assert_eq!(
            tmp.attributes[0].offset,
            offset_of!(GridVertex, position) as wgpu::BufferAddress
        );

        tmp
    }
}

pub const DEFAULT_SPACING: f32 = 20f32;

/// The background alignment grid: evenly spaced lines covering the board's
/// bounds, drawn as a line list. Lines sit at multiples of the spacing in
/// board coordinates, independent of where the bounds start.
pub struct GridItem {
    bounds: BoundRect,
    color: [f32; 4],
    spacing: f32,
    hidden: bool,
}

impl GridItem {
    pub fn new(bounds: BoundRect) -> Self {
        Self {
            bounds,
            color: [0f32; 4],
            spacing: DEFAULT_SPACING,
            hidden: false,
        }
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: f32) -> Result<()> {
        ensure!(
            spacing.is_finite() && spacing > 0f32,
            "grid spacing must be positive, got {spacing}"
        );
        self.spacing = spacing;
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: BoundRect) {
        self.bounds = bounds;
    }

    /// Line-list vertices for the current bounds: pairs of endpoints, all
    /// vertical lines first, then all horizontal lines.
    pub fn line_vertices(&self) -> Vec<GridVertex> {
        if self.bounds.is_empty() {
            return Vec::new();
        }
        let vertical_count = (self.bounds.width() / self.spacing) as usize + 1;
        let horizontal_count = (self.bounds.height() / self.spacing) as usize + 1;
        let first_x = (self.bounds.lo().x / self.spacing).ceil() * self.spacing;
        let first_y = (self.bounds.lo().y / self.spacing).ceil() * self.spacing;
        let (bottom, top) = (self.bounds.lo().y, self.bounds.hi().y);
        let (left, right) = (self.bounds.lo().x, self.bounds.hi().x);

        let mut vertices = Vec::with_capacity((vertical_count + horizontal_count) * 2);
        for i in 0..vertical_count {
            let x = first_x + i as f32 * self.spacing;
            vertices.push(GridVertex::new(x, bottom));
            vertices.push(GridVertex::new(x, top));
        }
        for i in 0..horizontal_count {
            let y = first_y + i as f32 * self.spacing;
            vertices.push(GridVertex::new(left, y));
            vertices.push(GridVertex::new(right, y));
        }
        log::trace!(
            "grid: {} vertical and {} horizontal lines",
            vertical_count,
            horizontal_count
        );
        vertices
    }
}

impl RenderItem for GridItem {
    fn global_position(&self) -> Vector2<f32> {
        Vector2::new(0f32, 0f32)
    }

    fn set_global_position(&mut self, _position: Vector2<f32>) {
        // The grid is locked to the board origin.
        log::warn!("ignored attempt to move the grid");
    }

    fn local_bounding_rect(&self) -> BoundRect {
        self.bounds
    }

    fn hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn frozen(&self) -> bool {
        true
    }

    fn is_opaque(&self) -> bool {
        true
    }

    fn distance_to(&self, _global_point: Point2<f32>) -> f32 {
        // The grid can never be erased or grabbed.
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(lo: [f32; 2], hi: [f32; 2]) -> BoundRect {
        BoundRect::from_bounds(Point2::new(lo[0], lo[1]), Point2::new(hi[0], hi[1]))
    }

    #[test]
    fn test_aligned_bounds() {
        let grid = GridItem::new(rect([0f32, 0f32], [100f32, 40f32]));
        let vertices = grid.line_vertices();
        // Six vertical lines at x = 0..=100, three horizontal at y = 0..=40.
        assert_eq!(vertices.len(), (6 + 3) * 2);
        assert_eq!(vertices[0].position(), [0f32, 0f32]);
        assert_eq!(vertices[1].position(), [0f32, 40f32]);
        assert_eq!(vertices[10].position(), [100f32, 0f32]);
        assert_eq!(vertices[12].position(), [0f32, 0f32]);
        assert_eq!(vertices[13].position(), [100f32, 0f32]);
    }

    #[test]
    fn test_unaligned_bounds_snap_lines_to_spacing_multiples() {
        let grid = GridItem::new(rect([-10f32, -10f32], [30f32, 30f32]));
        let vertices = grid.line_vertices();
        // First vertical line snaps up to x = 0.
        assert_eq!(vertices[0].position(), [0f32, -10f32]);
        assert_eq!(vertices[1].position(), [0f32, 30f32]);
    }

    #[test]
    fn test_empty_bounds_emit_no_lines() {
        let grid = GridItem::new(BoundRect::empty());
        assert!(grid.line_vertices().is_empty());
    }

    #[test]
    fn test_spacing_validation() {
        let mut grid = GridItem::new(rect([0f32, 0f32], [10f32, 10f32]));
        assert!(grid.set_spacing(5f32).is_ok());
        assert!(grid.set_spacing(0f32).is_err());
        assert!(grid.set_spacing(-1f32).is_err());
        assert!(grid.set_spacing(f32::NAN).is_err());
        assert_eq!(grid.spacing(), 5f32);
    }

    #[test]
    fn test_grid_is_frozen_and_unhittable() {
        let mut grid = GridItem::new(rect([0f32, 0f32], [10f32, 10f32]));
        assert!(grid.frozen());
        assert!(grid.is_opaque());
        assert_eq!(grid.distance_to(Point2::new(5f32, 5f32)), f32::INFINITY);
        grid.set_global_position(Vector2::new(5f32, 5f32));
        assert_eq!(grid.global_position(), Vector2::new(0f32, 0f32));
    }
}
