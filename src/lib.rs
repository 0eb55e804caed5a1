//! Brick Racket - a racket-and-blocks arcade game
//!
//! Core modules:
//! - `atlas`: Sprite sheet frames
//! - `sim`: Physics world, contact observer and collision reaction policy
//! - `renderer`: WebGPU sprite rendering
//! - `platform`: Browser input and readout glue
//! - `settings`: Data-driven tuning, persisted in LocalStorage

pub mod atlas;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Layout values are in pixels (the unit of the sprite atlas and the
/// projection); the physics world runs in meters.
pub mod consts {
    /// Pixels per physics meter
    pub const PIXELS_PER_METER: f32 = 30.0;

    /// Fixed simulation timestep (one physics advance per frame)
    pub const SIM_DT: f32 = 0.016;
    /// Velocity solver iterations per step
    pub const VELOCITY_ITERATIONS: usize = 3;
    /// Position solver iterations per step
    pub const POSITION_ITERATIONS: usize = 2;

    /// Half extent of the orthographic view, both axes
    pub const VIEW_HALF_EXTENT: f32 = 115.0;

    /// Border centers
    pub const LEFT_WALL_X: f32 = -107.0;
    pub const RIGHT_WALL_X: f32 = 107.0;
    pub const TOP_WALL_Y: f32 = 112.0;
    pub const BOTTOM_WALL_Y: f32 = -112.0;

    /// Racket start position
    pub const RACKET_START: (f32, f32) = (0.0, -95.0);
    /// Racket speed (m/s)
    pub const RACKET_SPEED: f32 = 5.0;

    /// Ball start position (serve point)
    pub const BALL_START: (f32, f32) = (0.0, -80.0);
    /// Ball speed (m/s), restored on every racket hit
    pub const BALL_SPEED: f32 = 5.0;

    /// Block start position
    pub const BLOCK_START: (f32, f32) = (-11.5, 0.0);
}

/// Convert a pixel-space value to meters
#[inline]
pub fn to_meters(px: f32) -> f32 {
    px / consts::PIXELS_PER_METER
}

/// Convert a meter-space value to pixels
#[inline]
pub fn to_pixels(m: f32) -> f32 {
    m * consts::PIXELS_PER_METER
}

/// Convert a pixel-space point to meters
#[inline]
pub fn vec_to_meters(px: Vec2) -> Vec2 {
    px / consts::PIXELS_PER_METER
}

/// Convert a meter-space point to pixels
#[inline]
pub fn vec_to_pixels(m: Vec2) -> Vec2 {
    m * consts::PIXELS_PER_METER
}
