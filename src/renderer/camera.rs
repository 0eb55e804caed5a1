//! Fixed orthographic camera
//!
//! The arena is viewed straight down the z axis from z = 1 with y up. The
//! square -115..115 view is widened along the longer canvas axis so the
//! arena is never stretched.

use glam::{Mat4, Vec2, Vec3};

use crate::consts::VIEW_HALF_EXTENT;

const NEAR: f32 = 0.1;
const FAR: f32 = 10.0;

/// Half-size of the visible region in pixels for a canvas aspect ratio
pub fn view_half_size(aspect: f32) -> Vec2 {
    let h = VIEW_HALF_EXTENT;
    if !(aspect.is_finite() && aspect > 0.0) {
        return Vec2::splat(h);
    }
    if aspect >= 1.0 {
        Vec2::new(h * aspect, h)
    } else {
        Vec2::new(h, h / aspect)
    }
}

/// Combined projection * view matrix
pub fn view_projection(aspect: f32) -> Mat4 {
    let half = view_half_size(aspect);
    let projection = Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, NEAR, FAR);
    let view = Mat4::look_at_rh(Vec3::Z, Vec3::ZERO, Vec3::Y);
    projection * view
}

/// World pixels to normalized device coordinates
pub fn to_ndc(view_projection: &Mat4, p: Vec2) -> Vec2 {
    view_projection.project_point3(p.extend(0.0)).truncate()
}
