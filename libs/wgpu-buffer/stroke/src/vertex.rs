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
use memoffset::offset_of;
use nalgebra::Point2;
use shader_shared::BufferBinding;
use std::mem;
use zerocopy::{AsBytes, FromBytes};

#[repr(C)]
#[derive(AsBytes, FromBytes, Copy, Clone, Debug)]
pub struct StrokeVertex {
    position: [f32; 2],
}

impl StrokeVertex {
    pub fn new(p: &Point2<f32>) -> Self {
        Self {
            position: [p.x, p.y],
        }
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    /// Vertex buffer slot the stroke pipeline reads positions from.
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
            offset_of!(StrokeVertex, position) as wgpu::BufferAddress
        );

        tmp
    }
}
