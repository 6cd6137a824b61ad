//! Session-wide texture registry.
//!
//! Maps a resolved texture identity to an uploaded GPU texture. Entries
//! persist across model loads — switching between two models that share an
//! external texture file costs one upload, not two — and are released when
//! the registry drops at process end. The registry is an explicitly owned
//! value threaded through the load path; there is no global cache.

use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use rustc_hash::FxHashMap;

use crate::import::SceneData;

/// The texture role the shading stage consumes. Base-color and legacy
/// diffuse material slots both land here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Diffuse,
}

/// An uploaded texture: the GPU objects plus the sampler configured for it.
#[derive(Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// One registry entry. Cloning shares the underlying GPU texture.
#[derive(Debug, Clone)]
pub struct TextureRecord {
    pub handle: Arc<GpuTexture>,
    pub kind: TextureKind,
    /// Resolved cache key — the deduplication identity.
    pub key: String,
}

#[derive(Default)]
pub struct TextureRegistry {
    records: FxHashMap<String, TextureRecord>,
    decode_count: u64,
}

impl TextureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Monotonic count of decode+upload operations. A cache hit never
    /// increments it, which makes dedup behavior observable from tests.
    #[must_use]
    pub fn decode_count(&self) -> u64 {
        self.decode_count
    }

    /// Looks up the record for an already-resolved cache key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TextureRecord> {
        self.records.get(key)
    }

    /// Resolves one slot token to an uploaded texture, deduplicating by
    /// resolved identity across the whole session.
    ///
    /// An exact key match short-circuits to the existing record — no decode,
    /// no upload. On a miss the token is decoded (embedded table or disk),
    /// format-negotiated, uploaded with a full mip chain, and recorded.
    /// Returns `None` when the token cannot be decoded; the caller treats
    /// that slot as "texture unavailable", never as a fatal error.
    pub fn resolve(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        token: &str,
        model_dir: &Path,
        scene: &SceneData,
        model_path: &Path,
    ) -> Option<TextureRecord> {
        let key = resolve_cache_key(token, model_dir, model_path);

        if let Some(record) = self.records.get(&key) {
            return Some(record.clone());
        }

        let image = decode_slot_pixels(token, scene, &key)?;
        let format = negotiate_format(&image)?;
        let handle = Arc::new(upload(device, queue, &image, format, &key));
        self.decode_count += 1;

        let record = TextureRecord {
            handle,
            kind: TextureKind::Diffuse,
            key: key.clone(),
        };
        self.records.insert(key.clone(), record.clone());
        log::info!("Loaded texture: {key}");
        Some(record)
    }
}

/// Computes the canonical identity used to deduplicate texture uploads.
///
/// Embedded tokens (`*N`) are qualified with the model file path because two
/// different models can both carry an embedded index 0. File tokens are
/// joined onto the model directory unless they already look absolute or
/// carry a scheme prefix.
#[must_use]
pub fn resolve_cache_key(token: &str, model_dir: &Path, model_path: &Path) -> String {
    if token.starts_with('*') {
        return format!("{}{token}", model_path.display());
    }
    let looks_absolute =
        token.starts_with('/') || token.contains(":/") || token.contains(":\\");
    if looks_absolute {
        token.to_string()
    } else {
        model_dir.join(token).display().to_string()
    }
}

/// Decodes one slot token into pixels, without touching the GPU.
///
/// Embedded tokens are looked up in the scene's embedded table; a stored
/// height of zero marks the payload as a compressed blob, anything else as
/// raw RGBA8 texels whose length is verified rather than assumed. External
/// tokens decode from disk at the resolved path. Any failure returns `None`.
#[must_use]
pub fn decode_slot_pixels(
    token: &str,
    scene: &SceneData,
    resolved_path: &str,
) -> Option<DynamicImage> {
    if let Some(index_str) = token.strip_prefix('*') {
        let Ok(index) = index_str.parse::<usize>() else {
            log::error!("Malformed embedded texture token: {token}");
            return None;
        };
        let Some(entry) = scene.embedded.get(index) else {
            log::error!("Invalid embedded texture index for token: {token}");
            return None;
        };

        if entry.height == 0 {
            // Compressed blob (PNG, JPEG, ...) stashed inside the model file.
            match image::load_from_memory(&entry.data) {
                Ok(img) => Some(img),
                Err(e) => {
                    log::error!("Failed to decode embedded texture {token}: {e}");
                    None
                }
            }
        } else {
            // Raw pre-decoded texels, fixed at four channels.
            let expected = entry.width as usize * entry.height as usize * 4;
            if entry.data.len() != expected {
                log::error!(
                    "Embedded texture {token} has {} raw bytes, expected {expected}",
                    entry.data.len()
                );
                return None;
            }
            image::RgbaImage::from_raw(entry.width, entry.height, entry.data.clone())
                .map(DynamicImage::ImageRgba8)
        }
    } else {
        match image::open(resolved_path) {
            Ok(img) => Some(img),
            Err(e) => {
                log::error!("Texture failed to load at path: {resolved_path} | {e}");
                None
            }
        }
    }
}

/// Picks the GPU pixel format from the decoded channel count. One channel
/// stays single-channel; three is expanded to RGBA on upload (wgpu has no
/// packed RGB format); four stays RGBA. Any other channel count is a failure
/// even though the decode nominally succeeded.
#[must_use]
pub fn negotiate_format(image: &DynamicImage) -> Option<wgpu::TextureFormat> {
    match image.color().channel_count() {
        1 => Some(wgpu::TextureFormat::R8Unorm),
        3 | 4 => Some(wgpu::TextureFormat::Rgba8UnormSrgb),
        n => {
            log::error!("Texture decoded with unsupported channel count: {n}");
            None
        }
    }
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &DynamicImage,
    format: wgpu::TextureFormat,
    label: &str,
) -> GpuTexture {
    let width = image.width().max(1);
    let height = image.height().max(1);
    let mip_level_count = 32 - width.max(height).leading_zeros();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    // The mip chain is produced on the CPU by successive halving; level 0 is
    // the decoded image itself.
    let mut level_image = image.clone();
    for level in 0..mip_level_count {
        let w = (width >> level).max(1);
        let h = (height >> level).max(1);
        if level > 0 {
            level_image = level_image.resize_exact(w, h, image::imageops::FilterType::Triangle);
        }
        let (bytes, bytes_per_pixel) = match format {
            wgpu::TextureFormat::R8Unorm => (level_image.to_luma8().into_raw(), 1),
            _ => (level_image.to_rgba8().into_raw(), 4),
        };
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w * bytes_per_pixel),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    // Wrap repeat + trilinear minification: the fixed policy for model
    // textures.
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    });

    GpuTexture {
        texture,
        view,
        sampler,
    }
}
