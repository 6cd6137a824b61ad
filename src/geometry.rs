//! Geometry normalization.
//!
//! Converts one imported mesh into the fixed interleaved vertex layout the
//! renderer consumes: position, normal, color, uv. Optional source channels
//! fall back to documented defaults; vertex order is preserved because it is
//! the index basis.

use glam::{Vec2, Vec3};

use crate::import::MeshData;

/// Fallback vertex color for meshes without a color channel.
pub const DEFAULT_VERTEX_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.8);

/// One vertex in the fixed interleaved layout (44 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexRecord {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x2,
    ];

    /// Vertex buffer layout matching the shader's locations 0-3.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexRecord>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Normalizes one source mesh into interleaved vertices plus a triangle
/// index list.
///
/// Fallbacks for absent channels: normal → zero vector (upstream generation
/// already ran and failed), color → `default_color`, uv → (0, 0). A
/// structurally empty source (no vertices or no faces) normalizes to empty
/// buffers; downstream turns that into an inert placeholder, not an error.
#[must_use]
pub fn normalize(mesh: &MeshData, default_color: Vec3) -> (Vec<VertexRecord>, Vec<u32>) {
    if mesh.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut vertices = Vec::with_capacity(mesh.positions.len());
    for (i, position) in mesh.positions.iter().enumerate() {
        let normal = mesh
            .normals
            .as_ref()
            .and_then(|n| n.get(i))
            .copied()
            .unwrap_or(Vec3::ZERO);
        let color = mesh
            .colors
            .as_ref()
            .and_then(|c| c.get(i))
            .copied()
            .unwrap_or(default_color);
        let uv = mesh
            .uvs
            .as_ref()
            .and_then(|t| t.get(i))
            .copied()
            .unwrap_or(Vec2::ZERO);

        vertices.push(VertexRecord {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.to_array(),
            uv: uv.to_array(),
        });
    }

    (vertices, mesh.indices.clone())
}
