//! glTF-backed scene import.

use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::{Mat3, Mat4, Vec2, Vec3};

use super::{EmbeddedImage, MaterialData, MeshData, SceneData};

/// Imports a glTF/GLB file into a flattened [`SceneData`].
///
/// Fails when the file cannot be read or parsed, a referenced buffer is
/// missing, or the document contains no scene with root nodes. The caller
/// maps any failure to "no model loaded" — there is never a partial result.
pub fn import_scene(path: &Path) -> anyhow::Result<SceneData> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open model file: {}", path.display()))?;
    let reader = std::io::BufReader::new(file);
    let gltf = gltf::Gltf::from_reader_without_validation(reader)
        .context("Failed to parse glTF file")?;

    let base_path = path.parent().unwrap_or(Path::new("./"));
    let buffers = load_buffers(&gltf, base_path)?;

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("glTF document contains no scene")?;
    if scene.nodes().len() == 0 {
        anyhow::bail!("glTF scene has no root node");
    }

    let (image_tokens, embedded) = load_images(&gltf, &buffers);
    let materials = load_materials(&gltf, &image_tokens);

    // Flatten the node hierarchy: one MeshData per (node, primitive), with
    // the node's world transform baked into positions and normals.
    let mut meshes = Vec::new();
    for node in scene.nodes() {
        flatten_node(&node, Mat4::IDENTITY, &buffers, &mut meshes);
    }

    Ok(SceneData {
        meshes,
        materials,
        embedded,
    })
}

fn load_buffers(gltf: &gltf::Gltf, base_path: &Path) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().context("Missing GLB binary chunk")?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                if uri.starts_with("data:") {
                    anyhow::bail!("data: buffer URIs are not supported");
                }
                let buffer_path = base_path.join(uri);
                let data = fs::read(&buffer_path).with_context(|| {
                    format!("Failed to read buffer file: {}", buffer_path.display())
                })?;
                buffer_data.push(data);
            }
        }
    }
    Ok(buffer_data)
}

/// Mints one slot token per glTF image: the URI for file-backed images, or
/// `*N` indexing into the embedded table for buffer-view images.
fn load_images(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> (Vec<String>, Vec<EmbeddedImage>) {
    let mut tokens = Vec::with_capacity(gltf.images().len());
    let mut embedded = Vec::new();

    for image in gltf.images() {
        match image.source() {
            gltf::image::Source::Uri { uri, .. } => tokens.push(uri.to_string()),
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                let bytes = buffers
                    .get(view.buffer().index())
                    .and_then(|b| b.get(start..end))
                    .unwrap_or_default();
                tokens.push(format!("*{}", embedded.len()));
                // Compressed blob convention: height stays zero, width holds
                // the blob length.
                embedded.push(EmbeddedImage {
                    width: bytes.len() as u32,
                    height: 0,
                    data: bytes.to_vec(),
                });
            }
        }
    }
    (tokens, embedded)
}

fn load_materials(gltf: &gltf::Gltf, image_tokens: &[String]) -> Vec<MaterialData> {
    let mut materials = Vec::with_capacity(gltf.materials().len());
    for material in gltf.materials() {
        let name = material.name().unwrap_or("material").to_string();
        let mut base_color = Vec::new();
        let mut diffuse = Vec::new();

        if let Some(info) = material.pbr_metallic_roughness().base_color_texture()
            && let Some(token) = image_tokens.get(info.texture().source().index())
        {
            base_color.push(token.clone());
        }

        // Specular/glossiness materials carry the legacy diffuse channel.
        if let Some(sg) = material.pbr_specular_glossiness()
            && let Some(info) = sg.diffuse_texture()
            && let Some(token) = image_tokens.get(info.texture().source().index())
        {
            diffuse.push(token.clone());
        }

        materials.push(MaterialData {
            name,
            base_color,
            diffuse,
        });
    }
    materials
}

fn flatten_node(node: &gltf::Node, parent: Mat4, buffers: &[Vec<u8>], out: &mut Vec<MeshData>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            out.push(load_primitive(&mesh, &primitive, &world, buffers));
        }
    }
    for child in node.children() {
        flatten_node(&child, world, buffers, out);
    }
}

fn load_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    world: &Mat4,
    buffers: &[Vec<u8>],
) -> MeshData {
    let name = mesh
        .name()
        .map_or_else(|| format!("mesh_{}", mesh.index()), ToString::to_string);
    let material = primitive.material().index();

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let Some(positions) = reader.read_positions() else {
        // No positions: keep an inert placeholder so mesh indices stay
        // aligned with the source scene.
        return MeshData {
            name,
            material,
            ..MeshData::default()
        };
    };
    let positions: Vec<Vec3> = positions
        .map(|p| world.transform_point3(Vec3::from_array(p)))
        .collect();

    let raw_indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let indices = triangulate(primitive.mode(), &raw_indices);

    let normal_matrix = Mat3::from_mat4(world.inverse().transpose());
    let normals: Option<Vec<Vec3>> = reader.read_normals().map(|iter| {
        iter.map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
            .collect()
    });
    // Smooth normal generation where the source has none.
    let normals = match normals {
        Some(n) => Some(n),
        None if !indices.is_empty() => {
            Some(super::compute_smooth_normals(&positions, &indices))
        }
        None => None,
    };

    let colors: Option<Vec<Vec3>> = reader
        .read_colors(0)
        .map(|iter| iter.into_rgb_f32().map(Vec3::from_array).collect());

    // glTF puts the UV origin at the top-left; flip V to match the
    // bottom-left convention of the shading stage.
    let uvs: Option<Vec<Vec2>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().map(|[u, v]| Vec2::new(u, 1.0 - v)).collect());

    MeshData {
        name,
        positions,
        normals,
        colors,
        uvs,
        indices,
        material,
    }
}

/// Expands strip/fan index sequences into plain triangle lists. Non-triangle
/// topologies (points, lines) produce an empty list, which downstream keeps
/// as an inert placeholder mesh.
fn triangulate(mode: gltf::mesh::Mode, indices: &[u32]) -> Vec<u32> {
    use gltf::mesh::Mode;

    match mode {
        Mode::Triangles => indices.chunks_exact(3).flatten().copied().collect(),
        Mode::TriangleStrip => {
            let mut out = Vec::with_capacity(indices.len().saturating_sub(2) * 3);
            for i in 2..indices.len() {
                // Alternate winding so every triangle keeps the same facing.
                if i % 2 == 0 {
                    out.extend_from_slice(&[indices[i - 2], indices[i - 1], indices[i]]);
                } else {
                    out.extend_from_slice(&[indices[i - 1], indices[i - 2], indices[i]]);
                }
            }
            out
        }
        Mode::TriangleFan => {
            let mut out = Vec::with_capacity(indices.len().saturating_sub(2) * 3);
            for i in 2..indices.len() {
                out.extend_from_slice(&[indices[0], indices[i - 1], indices[i]]);
            }
            out
        }
        _ => Vec::new(),
    }
}
