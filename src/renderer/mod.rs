//! WebGPU rendering module
//!
//! Sprite art is not loaded yet: each sprite is drawn as a flat-tinted quad
//! sized from its atlas frame, with an optional collider overlay on top.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SpriteInstance, build_vertices, sprite_instances};
pub use vertex::Vertex;
