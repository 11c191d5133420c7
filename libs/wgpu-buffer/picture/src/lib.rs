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
mod vertex;

pub use crate::vertex::{PictureUv, PictureVertex};

use anyhow::{ensure, Result};
use geometry::{
    algorithm::{distance_to_segment, rotate_scale_matrix},
    BoundRect,
};
use nalgebra::{Point2, Vector2};
use scene::{Generation, OnDemand, RenderItem};
use shader_shared::{BufferBinding, ItemDepth, ItemOffset, TextureBinding, ViewportQuad};

/// UV corners for the two quad triangles; the image's top-left maps to
/// uv (0, 0) while board space grows upward.
const QUAD_UVS: [[f32; 2]; 6] = [
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
];

/// A pasted image: an RGBA8 pixel payload drawn on a quad that can be
/// scaled and rotated about its center.
pub struct PictureItem {
    pixels: Vec<u8>,
    pixel_width: u32,
    pixel_height: u32,
    /// Display extent in board units at scale 1.
    size: Vector2<f32>,
    position: Vector2<f32>,
    scale: f32,
    rotation: f32,
    hidden: bool,
    generation: Generation,
    quad: OnDemand<Vec<PictureVertex>>,
    uvs: OnDemand<Vec<PictureUv>>,
}

impl PictureItem {
    pub fn from_rgba8(
        pixels: Vec<u8>,
        pixel_width: u32,
        pixel_height: u32,
        size: Vector2<f32>,
    ) -> Result<Self> {
        ensure!(
            pixel_width > 0 && pixel_height > 0,
            "picture dimensions must be non-zero, got {pixel_width}x{pixel_height}"
        );
        ensure!(
            pixels.len() == (pixel_width * pixel_height * 4) as usize,
            "picture payload is {} bytes but {}x{} RGBA8 needs {}",
            pixels.len(),
            pixel_width,
            pixel_height,
            pixel_width * pixel_height * 4
        );
        ensure!(
            size.x > 0f32 && size.y > 0f32,
            "picture display size must be positive"
        );
        Ok(Self {
            pixels,
            pixel_width,
            pixel_height,
            size,
            position: Vector2::new(0f32, 0f32),
            scale: 1f32,
            rotation: 0f32,
            hidden: false,
            generation: Generation::new(),
            quad: OnDemand::new(),
            uvs: OnDemand::once(),
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel_extent(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.generation.bump();
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
        self.generation.bump();
    }

    /// Two rotated half-diagonals; the quad corners are +/- each of these.
    fn half_corners(&self) -> (Vector2<f32>, Vector2<f32>) {
        let m = rotate_scale_matrix(self.rotation, self.scale);
        let p1 = m * (self.size * 0.5f32);
        let p2 = m * Vector2::new(self.size.x * 0.5f32, self.size.y * -0.5f32);
        (p1, p2)
    }

    /// Quad positions for the current scale and rotation, local to the
    /// picture's center.
    pub fn quad_vertices(&mut self) -> &[PictureVertex] {
        let (p1, p2) = self.half_corners();
        self.quad.get_or_build(self.generation, || {
            [-p1, p1, -p2, p1, -p1, p2]
                .iter()
                .map(|p| PictureVertex::new(*p))
                .collect()
        })
    }

    pub fn uv_vertices(&mut self) -> &[PictureUv] {
        self.uvs.get_or_build(self.generation, || {
            QUAD_UVS.iter().map(|uv| PictureUv::new(uv[0], uv[1])).collect()
        })
    }

    pub fn texture_descriptor(&self) -> wgpu::TextureDescriptor<'static> {
        wgpu::TextureDescriptor {
            label: Some("picture-texture"),
            size: wgpu::Extent3d {
                width: self.pixel_width,
                height: self.pixel_height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        }
    }

    pub fn offset_uniform(&self) -> ItemOffset {
        ItemOffset::new([self.position.x, self.position.y])
    }

    /// Uniform interface of the textured pipeline.
    pub fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 4] {
        [
            BufferBinding::Viewport.uniform_layout_entry(ViewportQuad::mem_size()),
            BufferBinding::Offset.uniform_layout_entry(ItemOffset::mem_size()),
            BufferBinding::Depth.uniform_layout_entry(ItemDepth::mem_size()),
            TextureBinding::Default.texture_layout_entry(),
        ]
    }
}

impl RenderItem for PictureItem {
    fn global_position(&self) -> Vector2<f32> {
        self.position
    }

    fn set_global_position(&mut self, position: Vector2<f32>) {
        self.position = position;
    }

    fn local_bounding_rect(&self) -> BoundRect {
        let (p1, p2) = self.half_corners();
        let dx = p1.x.abs().max(p2.x.abs());
        let dy = p1.y.abs().max(p2.y.abs());
        BoundRect::from_center_and_half_extent(Point2::origin(), Vector2::new(dx, dy))
    }

    fn hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn is_opaque(&self) -> bool {
        // Pictures blend; the payload may carry transparency.
        false
    }

    fn distance_to(&self, global_point: Point2<f32>) -> f32 {
        let local = global_point - self.position;
        let (p1, p2) = self.half_corners();
        let corners = [p1, p2, -p1, -p2];
        let mut has_positive = false;
        let mut has_negative = false;
        let mut min_distance = f32::INFINITY;
        for i in 0..corners.len() {
            let a = corners[i];
            let b = corners[(i + 1) % corners.len()];
            let edge = b - a;
            let to_point = local.coords - a;
            let cross = edge.x * to_point.y - edge.y * to_point.x;
            if cross > 0f32 {
                has_positive = true;
            } else if cross < 0f32 {
                has_negative = true;
            }
            min_distance =
                min_distance.min(distance_to_segment(&local, &Point2::from(a), &Point2::from(b)));
        }
        if has_positive && has_negative {
            min_distance
        } else {
            0f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn picture(w: u32, h: u32) -> PictureItem {
        PictureItem::from_rgba8(vec![0u8; (w * h * 4) as usize], w, h, Vector2::new(4f32, 2f32))
            .unwrap()
    }

    #[test]
    fn test_payload_validation() {
        assert!(PictureItem::from_rgba8(vec![0u8; 16], 2, 2, Vector2::new(1f32, 1f32)).is_ok());
        assert!(PictureItem::from_rgba8(vec![0u8; 15], 2, 2, Vector2::new(1f32, 1f32)).is_err());
        assert!(PictureItem::from_rgba8(vec![], 0, 2, Vector2::new(1f32, 1f32)).is_err());
        assert!(PictureItem::from_rgba8(vec![0u8; 16], 2, 2, Vector2::new(0f32, 1f32)).is_err());
    }

    #[test]
    fn test_unrotated_quad_matches_display_size() {
        let mut item = picture(8, 4);
        let positions: Vec<[f32; 2]> = item.quad_vertices().iter().map(|v| v.position()).collect();
        assert_eq!(
            positions,
            vec![
                [-2f32, -1f32],
                [2f32, 1f32],
                [-2f32, 1f32],
                [2f32, 1f32],
                [-2f32, -1f32],
                [2f32, -1f32],
            ]
        );
        let bounds = item.local_bounding_rect();
        assert_eq!(bounds.lo(), Point2::new(-2f32, -1f32));
        assert_eq!(bounds.hi(), Point2::new(2f32, 1f32));
    }

    #[test]
    fn test_rotation_swaps_bounding_extents() {
        let mut item = picture(8, 4);
        item.set_rotation(FRAC_PI_2);
        let bounds = item.local_bounding_rect();
        assert_relative_eq!(bounds.width(), 2f32, epsilon = 1e-5);
        assert_relative_eq!(bounds.height(), 4f32, epsilon = 1e-5);
        // The quad cache follows the rotation.
        let positions = item.quad_vertices();
        assert_relative_eq!(positions[1].position()[0], -1f32, epsilon = 1e-5);
        assert_relative_eq!(positions[1].position()[1], 2f32, epsilon = 1e-5);
    }

    #[test]
    fn test_scale_inflates_bounds() {
        let mut item = picture(8, 4);
        item.set_scale(2f32);
        let bounds = item.local_bounding_rect();
        assert_relative_eq!(bounds.width(), 8f32, epsilon = 1e-5);
        assert_relative_eq!(bounds.height(), 4f32, epsilon = 1e-5);
    }

    #[test]
    fn test_uv_table() {
        let mut item = picture(2, 2);
        let uvs: Vec<[f32; 2]> = item.uv_vertices().iter().map(|v| v.uv()).collect();
        assert_eq!(uvs.len(), 6);
        assert_eq!(uvs[0], [0f32, 1f32]);
        assert_eq!(uvs[2], [0f32, 0f32]);
        assert_eq!(uvs[5], [1f32, 1f32]);
    }

    #[test]
    fn test_distance_is_zero_inside_and_positive_outside() {
        let item = picture(8, 4);
        assert_eq!(item.distance_to(Point2::new(0f32, 0f32)), 0f32);
        assert_eq!(item.distance_to(Point2::new(1.9f32, 0.9f32)), 0f32);
        assert_relative_eq!(item.distance_to(Point2::new(0f32, 3f32)), 2f32, epsilon = 1e-5);
        assert_relative_eq!(item.distance_to(Point2::new(5f32, 0f32)), 3f32, epsilon = 1e-5);
    }

    #[test]
    fn test_texture_descriptor_extent() {
        let item = picture(8, 4);
        let desc = item.texture_descriptor();
        assert_eq!(desc.size.width, 8);
        assert_eq!(desc.size.height, 4);
        assert_eq!(desc.format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
