//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::atlas::{BlockColor, Sprite};

/// Colored 2D vertex, position in world pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Flat tints standing in for sprite art
pub mod colors {
    use super::{BlockColor, Sprite};

    pub const CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.09, 0.1, 0.16, 1.0];
    pub const BORDER: [f32; 4] = [0.45, 0.47, 0.55, 1.0];
    pub const RACKET: [f32; 4] = [0.85, 0.85, 0.9, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const BLOCK_BLUE: [f32; 4] = [0.25, 0.5, 1.0, 1.0];
    pub const BLOCK_GREEN: [f32; 4] = [0.3, 0.85, 0.4, 1.0];
    pub const BLOCK_PINK: [f32; 4] = [1.0, 0.45, 0.75, 1.0];
    pub const BLOCK_RED: [f32; 4] = [0.95, 0.25, 0.2, 1.0];
    pub const BLOCK_YELLOW: [f32; 4] = [0.95, 0.85, 0.25, 1.0];

    // Debug outlines by body kind
    pub const DEBUG_STATIC: [f32; 4] = [0.4, 0.9, 0.4, 1.0];
    pub const DEBUG_KINEMATIC: [f32; 4] = [0.5, 0.5, 0.9, 1.0];
    pub const DEBUG_DYNAMIC: [f32; 4] = [0.9, 0.7, 0.7, 1.0];

    pub fn sprite(sprite: Sprite) -> [f32; 4] {
        match sprite {
            Sprite::Background => BACKGROUND,
            Sprite::BorderLeft | Sprite::BorderRight | Sprite::BorderTop => BORDER,
            Sprite::Racket => RACKET,
            Sprite::Ball => BALL,
            Sprite::Block(BlockColor::Blue) => BLOCK_BLUE,
            Sprite::Block(BlockColor::Green) => BLOCK_GREEN,
            Sprite::Block(BlockColor::Pink) => BLOCK_PINK,
            Sprite::Block(BlockColor::Red) => BLOCK_RED,
            Sprite::Block(BlockColor::Yellow) => BLOCK_YELLOW,
        }
    }
}
