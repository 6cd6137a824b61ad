//! Point light parameters.

use glam::Vec3;

/// The single point light bound to the shading stage every frame.
#[derive(Debug, Clone, Copy)]
pub struct LightConfig {
    pub position: Vec3,
    /// Affects ambient, diffuse, and specular terms alike.
    pub color: Vec3,
    pub ambient_strength: f32,
    pub specular_strength: f32,
    /// Shininess exponent; higher values focus the specular highlight.
    pub shininess: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 3.0, 3.0),
            color: Vec3::ONE,
            ambient_strength: 0.15,
            specular_strength: 0.6,
            shininess: 64.0,
        }
    }
}
