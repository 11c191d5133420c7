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
use std::{mem, num::NonZeroU64};
use zerocopy::{AsBytes, FromBytes};

// The whiteboard shaders expect host resources to arrive at fixed slots.
// The numeric index, not the name, is the contract with the shader source,
// so re-ordering entries here is a breaking change on both sides.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum BufferBinding {
    Viewport,
    Offset,
    VertexArray,
    UvArray,
    Depth,
    Color,
}

impl BufferBinding {
    pub const ALL: [Self; 6] = [
        Self::Viewport,
        Self::Offset,
        Self::VertexArray,
        Self::UvArray,
        Self::Depth,
        Self::Color,
    ];

    pub const fn index(self) -> u32 {
        match self {
            Self::Viewport => 0,
            Self::Offset => 1,
            Self::VertexArray => 2,
            Self::UvArray => 3,
            Self::Depth => 4,
            Self::Color => 5,
        }
    }

    /// Layout entry for the uniform slots. VertexArray and UvArray are bound
    /// as vertex buffers, not bind group entries, and have no layout here.
    pub fn uniform_layout_entry(self, min_binding_size: u64) -> wgpu::BindGroupLayoutEntry {
        debug_assert!(!matches!(self, Self::VertexArray | Self::UvArray));
        wgpu::BindGroupLayoutEntry {
            binding: self.index(),
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(min_binding_size),
            },
            count: None,
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum TextureBinding {
    Default,
}

impl TextureBinding {
    pub const ALL: [Self; 1] = [Self::Default];

    pub const fn index(self) -> u32 {
        match self {
            Self::Default => 0,
        }
    }

    pub fn texture_layout_entry(self) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: self.index(),
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }
}

/// Frame rect of the visible board region, as the vertex stage receives it.
#[repr(C)]
#[derive(AsBytes, FromBytes, Copy, Clone, Debug, Default)]
pub struct ViewportQuad {
    pub origin: [f32; 2],
    pub extent: [f32; 2],
}

impl ViewportQuad {
    pub const BINDING: BufferBinding = BufferBinding::Viewport;

    pub fn new(origin: [f32; 2], extent: [f32; 2]) -> Self {
        Self { origin, extent }
    }

    pub fn mem_size() -> u64 {
        mem::size_of::<Self>() as u64
    }
}

/// Per-item translation from local to board coordinates.
#[repr(C)]
#[derive(AsBytes, FromBytes, Copy, Clone, Debug, Default)]
pub struct ItemOffset {
    pub offset: [f32; 2],
}

impl ItemOffset {
    pub const BINDING: BufferBinding = BufferBinding::Offset;

    pub fn new(offset: [f32; 2]) -> Self {
        Self { offset }
    }

    pub fn mem_size() -> u64 {
        mem::size_of::<Self>() as u64
    }
}

/// Per-item depth used to order items front to back.
#[repr(C)]
#[derive(AsBytes, FromBytes, Copy, Clone, Debug, Default)]
pub struct ItemDepth {
    pub depth: f32,
}

impl ItemDepth {
    pub const BINDING: BufferBinding = BufferBinding::Depth;

    pub fn new(depth: f32) -> Self {
        Self { depth }
    }

    pub fn mem_size() -> u64 {
        mem::size_of::<Self>() as u64
    }
}

/// Flat RGBA color applied by the stroke fragment stage.
#[repr(C)]
#[derive(AsBytes, FromBytes, Copy, Clone, Debug, Default)]
pub struct ItemColor {
    pub rgba: [f32; 4],
}

impl ItemColor {
    pub const BINDING: BufferBinding = BufferBinding::Color;

    pub fn new(rgba: [f32; 4]) -> Self {
        Self { rgba }
    }

    pub fn mem_size() -> u64 {
        mem::size_of::<Self>() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_buffer_indices_are_unique_and_contiguous() {
        let indices = BufferBinding::ALL.map(|b| b.index());
        let unique = indices.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), indices.len());
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..indices.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_texture_indices_are_unique_and_contiguous() {
        let indices = TextureBinding::ALL.map(|t| t.index());
        let unique = indices.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), indices.len());
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..indices.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_slot_assignments_match_shader_source() {
        assert_eq!(BufferBinding::Viewport.index(), 0);
        assert_eq!(BufferBinding::Offset.index(), 1);
        assert_eq!(BufferBinding::VertexArray.index(), 2);
        assert_eq!(BufferBinding::UvArray.index(), 3);
        assert_eq!(BufferBinding::Depth.index(), 4);
        assert_eq!(BufferBinding::Color.index(), 5);
        assert_eq!(TextureBinding::Default.index(), 0);
    }

    #[test]
    fn test_layout_entries_carry_registry_indices() {
        let entry = BufferBinding::Viewport.uniform_layout_entry(ViewportQuad::mem_size());
        assert_eq!(entry.binding, BufferBinding::Viewport.index());
        let entry = BufferBinding::Color.uniform_layout_entry(ItemColor::mem_size());
        assert_eq!(entry.binding, 5);
        let entry = TextureBinding::Default.texture_layout_entry();
        assert_eq!(entry.binding, 0);
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(ViewportQuad::mem_size(), 16);
        assert_eq!(ItemOffset::mem_size(), 8);
        assert_eq!(ItemDepth::mem_size(), 4);
        assert_eq!(ItemColor::mem_size(), 16);
    }
}
