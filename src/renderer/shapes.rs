//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;

/// Filled axis-aligned rectangle (two triangles)
pub fn quad(center: Vec2, half_size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, rotated_corners(center, half_size, 0.0), color);
    vertices
}

/// Hollow rectangle of `thickness`, rotated by `rotation` radians about its center.
///
/// The outline is drawn inside the rectangle's bounds.
pub fn rect_outline(
    center: Vec2,
    half_size: Vec2,
    rotation: f32,
    thickness: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let t = thickness.min(half_size.x).min(half_size.y);
    let outer = rotated_corners(center, half_size, rotation);
    let inner = rotated_corners(center, half_size - Vec2::splat(t), rotation);

    let mut vertices = Vec::with_capacity(24);
    for i in 0..4 {
        let j = (i + 1) % 4;
        push_quad(&mut vertices, [outer[i], outer[j], inner[j], inner[i]], color);
    }
    vertices
}

/// Corners counter-clockwise from bottom-left
fn rotated_corners(center: Vec2, half: Vec2, rotation: f32) -> [Vec2; 4] {
    let rot = Vec2::from_angle(rotation);
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c))
}

fn push_quad(vertices: &mut Vec<Vertex>, [a, b, c, d]: [Vec2; 4], color: [f32; 4]) {
    vertices.extend_from_slice(&[
        Vertex::at(a, color),
        Vertex::at(b, color),
        Vertex::at(c, color),
        Vertex::at(a, color),
        Vertex::at(c, color),
        Vertex::at(d, color),
    ]);
}
