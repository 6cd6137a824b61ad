//! Model loading orchestration.

use std::path::Path;

use glam::Vec3;

use crate::geometry;
use crate::import;
use crate::material::resolve_material_textures;
use crate::mesh::{GpuMesh, MaterialBindings};
use crate::registry::TextureRegistry;

/// Imports a model file and builds one [`GpuMesh`] per scene mesh.
///
/// Every import failure — unreadable file, parse error, missing buffers, no
/// root node — maps to an empty list; there is never a partial result. On
/// success the list length equals the scene's mesh count exactly: meshes
/// that normalized to empty buffers stay as inert placeholders so indices
/// remain aligned with the source scene.
///
/// `default_color` fills the vertex color channel of meshes that have none.
/// Textures resolve through `registry`, so repeated loads share uploads.
/// Loading is synchronous and blocking; the caller accepts a stall for the
/// duration of import plus all texture decodes and uploads.
pub fn load_model(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    bindings: &MaterialBindings,
    registry: &mut TextureRegistry,
    path: &Path,
    default_color: Vec3,
) -> Vec<GpuMesh> {
    let scene = match import::import_scene(path) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to load model '{}': {e:#}", path.display());
            return Vec::new();
        }
    };

    let model_dir = path.parent().unwrap_or(Path::new("."));
    let mut meshes = Vec::with_capacity(scene.meshes.len());
    for mesh_data in &scene.meshes {
        let (vertices, indices) = geometry::normalize(mesh_data, default_color);

        let textures = match mesh_data.material.and_then(|i| scene.materials.get(i)) {
            Some(material) => resolve_material_textures(
                material, device, queue, registry, model_dir, &scene, path,
            ),
            None => Vec::new(),
        };

        meshes.push(GpuMesh::new(device, bindings, &vertices, &indices, textures));
    }

    log::info!(
        "Loaded {} mesh(es) from '{}'",
        meshes.len(),
        path.display()
    );
    meshes
}
