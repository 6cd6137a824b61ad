//! Scene import boundary.
//!
//! The import library (the `gltf` crate) is treated strictly as a boundary
//! returning plain descriptor data — counts and arrays, no importer types
//! leak past this module. Import applies a fixed recipe: triangulate,
//! generate smooth normals where absent, flip the UV vertical axis, and bake
//! node world transforms into the vertices so the rest of the viewer sees a
//! flat, world-space mesh list.

mod gltf;

pub use self::gltf::import_scene;

use glam::{Vec2, Vec3};

/// Flattened scene produced by [`import_scene`].
///
/// Ownership is scoped to a single load call: the loader consumes it and
/// drops it before returning.
#[derive(Debug, Default)]
pub struct SceneData {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
    /// Embedded image table; `*N` slot tokens index into it.
    pub embedded: Vec<EmbeddedImage>,
}

/// One mesh instance as reported by the import stage.
///
/// `indices` is always a triangle list — triangulation is the import stage's
/// job, never downstream code's. Optional attribute channels are `None` when
/// the source provides nothing; the geometry normalizer applies fallbacks.
#[derive(Debug, Default, Clone)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub colors: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<Vec2>>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

impl MeshData {
    /// A mesh with no vertices or no faces. Kept in the scene as a
    /// placeholder so mesh indices stay aligned with the source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }
}

/// One material as reported by the import stage, reduced to the texture
/// slots the viewer consumes.
#[derive(Debug, Default, Clone)]
pub struct MaterialData {
    pub name: String,
    /// PBR base color slot tokens, in declaration order.
    pub base_color: Vec<String>,
    /// Legacy diffuse slot tokens (specular/glossiness materials).
    pub diffuse: Vec<String>,
}

/// Image data stored inside the model file itself.
///
/// `height == 0` marks `data` as a compressed blob that still needs an image
/// decode (with `width` holding the blob length); otherwise `data` is raw
/// RGBA8 texels of `width × height`.
#[derive(Debug, Default, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Area-weighted smooth vertex normals over a triangle list.
///
/// Degenerate triangles contribute a zero cross product and drop out of the
/// accumulation; a vertex referenced by no face keeps a zero normal.
#[must_use]
pub fn compute_smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        // Cross product length = 2x triangle area, so larger faces weigh more.
        let face_normal = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}
