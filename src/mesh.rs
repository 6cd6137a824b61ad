//! GPU mesh resources.
//!
//! A [`GpuMesh`] owns one mesh's vertex/index buffers and its material bind
//! group. Ownership is exclusive and move-only: dropping the value releases
//! the GPU buffers exactly once, and a moved-from value cannot
//! double-release. A mesh constructed from empty input never allocates and
//! draws as a no-op — this is how failed loads and structurally empty meshes
//! flow through the frame loop without call-site special cases.

use wgpu::util::DeviceExt;

use crate::geometry::VertexRecord;
use crate::registry::{GpuTexture, TextureKind, TextureRecord};

/// Per-mesh shading parameters; layout mirrors the WGSL `MaterialUniforms`.
/// `has_diffuse` selects between the sampled texture and the interpolated
/// vertex color in the fragment stage.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniforms {
    has_diffuse: u32,
    _pad: [u32; 3],
}

/// Shared pieces every mesh's material bind group is built from: the layout
/// and a 1×1 white fallback texture bound when a mesh has no diffuse slot.
pub struct MaterialBindings {
    pub layout: wgpu::BindGroupLayout,
    fallback: GpuTexture,
}

impl MaterialBindings {
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let fallback = create_fallback_texture(device, queue);
        Self { layout, fallback }
    }
}

fn create_fallback_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Fallback Texture"),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &[255u8; 4],
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4),
            rows_per_image: Some(1),
        },
        wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        },
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());
    GpuTexture {
        texture,
        view,
        sampler,
    }
}

/// GPU-side buffers, present only for non-empty meshes.
struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    // Kept alive alongside the bind group that references it.
    _material_uniforms: wgpu::Buffer,
    material_group: wgpu::BindGroup,
}

/// One ready-to-draw mesh.
pub struct GpuMesh {
    buffers: Option<MeshBuffers>,
    textures: Vec<TextureRecord>,
}

impl GpuMesh {
    /// Builds the GPU resources for one normalized mesh.
    ///
    /// Empty vertex or index input produces an inert placeholder that owns
    /// no GPU handles and draws as a no-op.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        bindings: &MaterialBindings,
        vertices: &[VertexRecord],
        indices: &[u32],
        textures: Vec<TextureRecord>,
    ) -> Self {
        if vertices.is_empty() || indices.is_empty() {
            return Self {
                buffers: None,
                textures,
            };
        }

        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // The shading stage consumes a single diffuse-equivalent slot: the
        // first diffuse record, or the white fallback with the flag off.
        let diffuse = textures.iter().find(|t| t.kind == TextureKind::Diffuse);
        let uniforms = MaterialUniforms {
            has_diffuse: u32::from(diffuse.is_some()),
            _pad: [0; 3],
        };
        let material_uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniforms"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let (view, sampler) = match diffuse {
            Some(record) => (&record.handle.view, &record.handle.sampler),
            None => (&bindings.fallback.view, &bindings.fallback.sampler),
        };
        let material_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &bindings.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: material_uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            buffers: Some(MeshBuffers {
                vertex,
                index,
                index_count: indices.len() as u32,
                _material_uniforms: material_uniforms,
                material_group,
            }),
            textures,
        }
    }

    /// True when the mesh owns no GPU buffers (placeholder state).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_none()
    }

    /// Number of indices this mesh draws.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.buffers.as_ref().map_or(0, |b| b.index_count)
    }

    /// The resolved texture records this mesh binds.
    #[must_use]
    pub fn textures(&self) -> &[TextureRecord] {
        &self.textures
    }

    /// Records this mesh's draw into the pass. A placeholder mesh is a
    /// no-op, not an error.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        pass.set_bind_group(1, &buffers.material_group, &[]);
        pass.set_vertex_buffer(0, buffers.vertex.slice(..));
        pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..buffers.index_count, 0, 0..1);
    }
}
