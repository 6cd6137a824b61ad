//! Material resolution.
//!
//! Reduces one scene material to the ordered diffuse-equivalent texture list
//! a mesh binds at draw time.

use std::path::Path;

use crate::import::{MaterialData, SceneData};
use crate::registry::{TextureRecord, TextureRegistry};

/// Resolves a material's texture slots through the registry.
///
/// Base-color slots (PBR-style materials) are attempted first; only when
/// they produce nothing are the legacy diffuse slots consulted — never both.
/// Every resolved slot is tagged as the single diffuse-equivalent the
/// shading stage consumes, regardless of which semantic produced it. A slot
/// that fails to resolve is dropped from the result; one bad texture never
/// blocks the rest of the material.
pub fn resolve_material_textures(
    material: &MaterialData,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    registry: &mut TextureRegistry,
    model_dir: &Path,
    scene: &SceneData,
    model_path: &Path,
) -> Vec<TextureRecord> {
    let mut textures = resolve_slots(
        &material.base_color,
        device,
        queue,
        registry,
        model_dir,
        scene,
        model_path,
    );
    if textures.is_empty() {
        textures = resolve_slots(
            &material.diffuse,
            device,
            queue,
            registry,
            model_dir,
            scene,
            model_path,
        );
    }
    textures
}

fn resolve_slots(
    tokens: &[String],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    registry: &mut TextureRegistry,
    model_dir: &Path,
    scene: &SceneData,
    model_path: &Path,
) -> Vec<TextureRecord> {
    let mut records = Vec::with_capacity(tokens.len());
    for token in tokens {
        match registry.resolve(device, queue, token, model_dir, scene, model_path) {
            Some(record) => records.push(record),
            None => log::warn!("Dropping unresolvable texture slot: {token}"),
        }
    }
    records
}
