//! Geometry Normalizer Tests
//!
//! Tests for:
//! - N source vertices -> exactly N VertexRecords, index count multiple of 3
//! - Exact fallback values for absent normal/color/uv channels
//! - Vertex order preservation (the index basis)
//! - Structurally empty meshes normalizing to empty buffers

use glam::{Vec2, Vec3};

use glance::geometry::{self, DEFAULT_VERTEX_COLOR, VertexRecord};
use glance::import::MeshData;

const EPSILON: f32 = 1e-6;

fn approx3(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPSILON)
}

fn tri_positions() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ]
}

// ============================================================================
// Shape invariants
// ============================================================================

#[test]
fn vertex_count_matches_source() {
    let mesh = MeshData {
        positions: tri_positions(),
        indices: vec![0, 1, 2],
        ..MeshData::default()
    };
    let (vertices, indices) = geometry::normalize(&mesh, DEFAULT_VERTEX_COLOR);
    assert_eq!(vertices.len(), 3);
    assert_eq!(indices.len() % 3, 0);
}

#[test]
fn vertex_order_is_preserved() {
    let positions = vec![
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(4.0, 5.0, 6.0),
        Vec3::new(7.0, 8.0, 9.0),
    ];
    let mesh = MeshData {
        positions: positions.clone(),
        indices: vec![2, 1, 0],
        ..MeshData::default()
    };
    let (vertices, indices) = geometry::normalize(&mesh, DEFAULT_VERTEX_COLOR);
    for (record, source) in vertices.iter().zip(&positions) {
        assert!(approx3(record.position, source.to_array()));
    }
    // Face index order is untouched as well.
    assert_eq!(indices, vec![2, 1, 0]);
}

#[test]
fn record_layout_is_44_bytes() {
    assert_eq!(std::mem::size_of::<VertexRecord>(), 44);
    let layout = VertexRecord::layout();
    assert_eq!(layout.array_stride, 44);
    assert_eq!(layout.attributes.len(), 4);
}

// ============================================================================
// Fallback values
// ============================================================================

#[test]
fn absent_channels_use_documented_fallbacks() {
    let mesh = MeshData {
        positions: tri_positions(),
        indices: vec![0, 1, 2],
        ..MeshData::default()
    };
    let (vertices, _) = geometry::normalize(&mesh, DEFAULT_VERTEX_COLOR);
    for v in &vertices {
        assert_eq!(v.normal, [0.0, 0.0, 0.0]);
        assert_eq!(v.color, DEFAULT_VERTEX_COLOR.to_array());
        assert_eq!(v.uv, [0.0, 0.0]);
    }
}

#[test]
fn caller_supplied_default_color_is_used() {
    let mesh = MeshData {
        positions: tri_positions(),
        indices: vec![0, 1, 2],
        ..MeshData::default()
    };
    let (vertices, _) = geometry::normalize(&mesh, Vec3::new(0.1, 0.2, 0.3));
    for v in &vertices {
        assert!(approx3(v.color, [0.1, 0.2, 0.3]));
    }
}

#[test]
fn present_channels_pass_through() {
    let mesh = MeshData {
        positions: tri_positions(),
        normals: Some(vec![Vec3::Z; 3]),
        colors: Some(vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]),
        uvs: Some(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.5, 1.0),
        ]),
        indices: vec![0, 1, 2],
        ..MeshData::default()
    };
    let (vertices, _) = geometry::normalize(&mesh, DEFAULT_VERTEX_COLOR);
    assert!(approx3(vertices[0].normal, [0.0, 0.0, 1.0]));
    assert!(approx3(vertices[1].color, [0.0, 1.0, 0.0]));
    assert_eq!(vertices[2].uv, [0.5, 1.0]);
}

// ============================================================================
// Empty sources
// ============================================================================

#[test]
fn zero_vertices_normalizes_to_empty_buffers() {
    let mesh = MeshData {
        indices: vec![0, 1, 2],
        ..MeshData::default()
    };
    let (vertices, indices) = geometry::normalize(&mesh, DEFAULT_VERTEX_COLOR);
    assert!(vertices.is_empty());
    assert!(indices.is_empty());
}

#[test]
fn zero_faces_normalizes_to_empty_buffers() {
    let mesh = MeshData {
        positions: tri_positions(),
        ..MeshData::default()
    };
    let (vertices, indices) = geometry::normalize(&mesh, DEFAULT_VERTEX_COLOR);
    assert!(vertices.is_empty());
    assert!(indices.is_empty());
}
