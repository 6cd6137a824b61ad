//! Texture Registry Tests
//!
//! Tests for:
//! - Cache key resolution (relative join, absolute passthrough, scheme
//!   prefix, embedded model-qualified keys)
//! - Embedded decode paths: compressed blob, raw RGBA8 with verified length
//! - Format negotiation by channel count
//! - Dedup/idempotence of resolve (same handle, one decode) — GPU-backed
//!   tests skip gracefully when the host exposes no adapter.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glance::import::{EmbeddedImage, SceneData};
use glance::registry::{
    TextureRegistry, decode_slot_pixels, negotiate_format, resolve_cache_key,
};

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("glance_registry_tests").join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// 2x2 opaque red square, PNG-encoded in memory.
fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::default();
    let adapter =
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
            .ok()?;
    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()
}

// ============================================================================
// Cache key resolution
// ============================================================================

#[test]
fn relative_token_joins_model_directory() {
    let key = resolve_cache_key(
        "textures/a.png",
        Path::new("/models/scene"),
        Path::new("/models/scene/scene.gltf"),
    );
    assert_eq!(key, "/models/scene/textures/a.png");
}

#[test]
fn absolute_token_is_untouched() {
    let key = resolve_cache_key(
        "/shared/textures/a.png",
        Path::new("/models/scene"),
        Path::new("/models/scene/scene.gltf"),
    );
    assert_eq!(key, "/shared/textures/a.png");
}

#[test]
fn scheme_prefixed_token_is_untouched() {
    let key = resolve_cache_key(
        "C:/textures/a.png",
        Path::new("/models/scene"),
        Path::new("/models/scene/scene.gltf"),
    );
    assert_eq!(key, "C:/textures/a.png");
}

#[test]
fn embedded_token_is_qualified_by_model_path() {
    let key = resolve_cache_key("*0", Path::new("/models"), Path::new("/models/a.glb"));
    assert_eq!(key, "/models/a.glb*0");

    // Two models both carrying embedded index 0 must not collide.
    let other = resolve_cache_key("*0", Path::new("/models"), Path::new("/models/b.glb"));
    assert_ne!(key, other);
}

// ============================================================================
// Embedded decode paths
// ============================================================================

#[test]
fn compressed_embedded_blob_decodes() {
    let blob = png_bytes();
    let scene = SceneData {
        embedded: vec![EmbeddedImage {
            width: blob.len() as u32,
            height: 0,
            data: blob,
        }],
        ..SceneData::default()
    };
    let img = decode_slot_pixels("*0", &scene, "unused").unwrap();
    assert_eq!((img.width(), img.height()), (2, 2));
}

#[test]
fn raw_embedded_texels_decode_with_verified_length() {
    let scene = SceneData {
        embedded: vec![EmbeddedImage {
            width: 2,
            height: 2,
            data: vec![128u8; 16],
        }],
        ..SceneData::default()
    };
    let img = decode_slot_pixels("*0", &scene, "unused").unwrap();
    assert_eq!((img.width(), img.height()), (2, 2));
    assert_eq!(img.color().channel_count(), 4);
}

#[test]
fn raw_embedded_with_wrong_length_fails() {
    let scene = SceneData {
        embedded: vec![EmbeddedImage {
            width: 2,
            height: 2,
            data: vec![128u8; 10],
        }],
        ..SceneData::default()
    };
    assert!(decode_slot_pixels("*0", &scene, "unused").is_none());
}

#[test]
fn out_of_range_embedded_index_fails() {
    let scene = SceneData::default();
    assert!(decode_slot_pixels("*3", &scene, "unused").is_none());
}

#[test]
fn malformed_embedded_token_fails() {
    let scene = SceneData::default();
    assert!(decode_slot_pixels("*zero", &scene, "unused").is_none());
}

#[test]
fn corrupt_compressed_blob_fails() {
    let scene = SceneData {
        embedded: vec![EmbeddedImage {
            width: 4,
            height: 0,
            data: vec![0xde, 0xad, 0xbe, 0xef],
        }],
        ..SceneData::default()
    };
    assert!(decode_slot_pixels("*0", &scene, "unused").is_none());
}

// ============================================================================
// Format negotiation
// ============================================================================

#[test]
fn channel_counts_negotiate_expected_formats() {
    let gray = image::DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
    assert_eq!(negotiate_format(&gray), Some(wgpu::TextureFormat::R8Unorm));

    let rgb = image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2));
    assert_eq!(
        negotiate_format(&rgb),
        Some(wgpu::TextureFormat::Rgba8UnormSrgb)
    );

    let rgba = image::DynamicImage::ImageRgba8(image::RgbaImage::new(2, 2));
    assert_eq!(
        negotiate_format(&rgba),
        Some(wgpu::TextureFormat::Rgba8UnormSrgb)
    );
}

#[test]
fn two_channel_image_is_rejected() {
    let gray_alpha = image::DynamicImage::ImageLumaA8(image::GrayAlphaImage::new(2, 2));
    assert_eq!(negotiate_format(&gray_alpha), None);
}

// ============================================================================
// Resolve dedup (GPU-backed)
// ============================================================================

#[test]
fn resolving_same_key_twice_uploads_once() {
    let Some((device, queue)) = test_device() else {
        eprintln!("skipping: no GPU adapter available");
        return;
    };

    let dir = temp_dir("dedup");
    fs::write(dir.join("tex.png"), png_bytes()).unwrap();
    let model_path = dir.join("model.gltf");
    let scene = SceneData::default();

    let mut registry = TextureRegistry::new();
    let first = registry
        .resolve(&device, &queue, "tex.png", &dir, &scene, &model_path)
        .unwrap();
    let second = registry
        .resolve(&device, &queue, "tex.png", &dir, &scene, &model_path)
        .unwrap();

    assert!(Arc::ptr_eq(&first.handle, &second.handle));
    assert_eq!(registry.decode_count(), 1);
    assert_eq!(registry.len(), 1);
    assert!(first.key.ends_with("tex.png"));
}

#[test]
fn embedded_resolve_records_qualified_key() {
    let Some((device, queue)) = test_device() else {
        eprintln!("skipping: no GPU adapter available");
        return;
    };

    let dir = temp_dir("embedded");
    let model_path = dir.join("model.glb");
    let blob = png_bytes();
    let scene = SceneData {
        embedded: vec![EmbeddedImage {
            width: blob.len() as u32,
            height: 0,
            data: blob,
        }],
        ..SceneData::default()
    };

    let mut registry = TextureRegistry::new();
    let record = registry
        .resolve(&device, &queue, "*0", &dir, &scene, &model_path)
        .unwrap();
    assert_eq!(record.key, format!("{}*0", model_path.display()));
    assert!(registry.get(&record.key).is_some());
}

#[test]
fn failed_resolve_leaves_registry_untouched() {
    let Some((device, queue)) = test_device() else {
        eprintln!("skipping: no GPU adapter available");
        return;
    };

    let dir = temp_dir("missing");
    let scene = SceneData::default();
    let mut registry = TextureRegistry::new();

    let result = registry.resolve(
        &device,
        &queue,
        "does_not_exist.png",
        &dir,
        &scene,
        &dir.join("model.gltf"),
    );
    assert!(result.is_none());
    assert_eq!(registry.len(), 0);
    assert_eq!(registry.decode_count(), 0);
}
