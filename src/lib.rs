//! glance — a minimal drag-and-drop 3D model viewer.
//!
//! The core of the crate is the model ingestion and GPU resource pipeline:
//! a scene import boundary ([`import`]), a geometry normalizer
//! ([`geometry`]), a session-wide texture registry ([`registry`]), a
//! material resolver ([`material`]), and the loader that orchestrates them
//! ([`loader`]). The [`renderer`] draws the resulting [`mesh::GpuMesh`] list
//! from an orbit camera under a single point light; [`app`] wires everything
//! into a winit event loop.

pub mod app;
pub mod camera;
pub mod errors;
pub mod geometry;
pub mod import;
pub mod input;
pub mod light;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod registry;
pub mod renderer;

pub use app::App;
pub use camera::OrbitCamera;
pub use errors::{Result, ViewerError};
pub use geometry::{DEFAULT_VERTEX_COLOR, VertexRecord, normalize};
pub use import::{
    EmbeddedImage, MaterialData, MeshData, SceneData, compute_smooth_normals, import_scene,
};
pub use input::Input;
pub use light::LightConfig;
pub use loader::load_model;
pub use material::resolve_material_textures;
pub use mesh::{GpuMesh, MaterialBindings};
pub use registry::{
    GpuTexture, TextureKind, TextureRecord, TextureRegistry, decode_slot_pixels,
    negotiate_format, resolve_cache_key,
};
pub use renderer::Renderer;
