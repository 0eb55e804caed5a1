//! Sprite atlas
//!
//! Reads a TexturePacker "JSON (Hash)" sheet. Only frame rectangles are used:
//! they size both the sprites on screen and the physics boxes behind them.

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::Deserialize;

/// Atlas bundled with the game
pub const EMBEDDED_ATLAS: &str = include_str!("../assets/sprites/texture.json");

/// Block tint variants present in the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Blue,
    Green,
    Pink,
    Red,
    Yellow,
}

/// Named sprites the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    BorderLeft,
    BorderRight,
    BorderTop,
    Racket,
    Ball,
    Block(BlockColor),
}

impl Sprite {
    pub const ALL: [Sprite; 11] = [
        Sprite::BorderLeft,
        Sprite::BorderRight,
        Sprite::BorderTop,
        Sprite::Background,
        Sprite::Racket,
        Sprite::Ball,
        Sprite::Block(BlockColor::Blue),
        Sprite::Block(BlockColor::Green),
        Sprite::Block(BlockColor::Pink),
        Sprite::Block(BlockColor::Red),
        Sprite::Block(BlockColor::Yellow),
    ];

    /// Frame name in the sheet
    pub fn file_name(&self) -> &'static str {
        match self {
            Sprite::Background => "hexagon_pattern.png",
            Sprite::BorderLeft => "border_left.png",
            Sprite::BorderRight => "border_right.png",
            Sprite::BorderTop => "border_top.png",
            Sprite::Racket => "racket.png",
            Sprite::Ball => "ball.png",
            Sprite::Block(BlockColor::Blue) => "block_blue.png",
            Sprite::Block(BlockColor::Green) => "block_green.png",
            Sprite::Block(BlockColor::Pink) => "block_pink.png",
            Sprite::Block(BlockColor::Red) => "block_red.png",
            Sprite::Block(BlockColor::Yellow) => "block_yellow.png",
        }
    }
}

/// Pixel rectangle inside the sheet
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn half_size(&self) -> Vec2 {
        self.size() / 2.0
    }
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    frame: Frame,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct SheetSize {
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize)]
struct Meta {
    image: String,
    size: SheetSize,
}

#[derive(Debug, Deserialize)]
struct SheetJson {
    frames: HashMap<String, FrameEntry>,
    meta: Meta,
}

/// Atlas loading error
#[derive(Debug)]
pub enum AtlasError {
    /// Sheet JSON did not parse
    Json(serde_json::Error),
    /// A sprite the game needs is not in the sheet
    MissingFrame(&'static str),
    /// A frame reaches past the sheet's edges
    FrameOutOfBounds(&'static str),
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Json(e) => write!(f, "invalid atlas JSON: {e}"),
            AtlasError::MissingFrame(name) => write!(f, "atlas has no frame \"{name}\""),
            AtlasError::FrameOutOfBounds(name) => {
                write!(f, "atlas frame \"{name}\" lies outside the sheet")
            }
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtlasError::Json(e) => Some(e),
            AtlasError::MissingFrame(_) | AtlasError::FrameOutOfBounds(_) => None,
        }
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(e: serde_json::Error) -> Self {
        AtlasError::Json(e)
    }
}

/// Frames of every sprite the game draws
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    frames: HashMap<Sprite, Frame>,
}

impl SpriteSheet {
    /// Parse a sheet, requiring a frame for every `Sprite` that fits inside it
    pub fn from_json(json: &str) -> Result<Self, AtlasError> {
        let sheet: SheetJson = serde_json::from_str(json)?;
        let SheetSize { w, h } = sheet.meta.size;

        let mut frames = HashMap::with_capacity(Sprite::ALL.len());
        for sprite in Sprite::ALL {
            let entry = sheet
                .frames
                .get(sprite.file_name())
                .ok_or(AtlasError::MissingFrame(sprite.file_name()))?;
            let f = entry.frame;
            if f.x < 0.0 || f.y < 0.0 || f.x + f.w > w || f.y + f.h > h {
                return Err(AtlasError::FrameOutOfBounds(sprite.file_name()));
            }
            frames.insert(sprite, f);
        }

        log::info!(
            "Loaded atlas {} ({}x{}, {} frames)",
            sheet.meta.image,
            w,
            h,
            sheet.frames.len()
        );

        Ok(Self { frames })
    }

    /// The atlas compiled into the binary
    pub fn embedded() -> Result<Self, AtlasError> {
        Self::from_json(EMBEDDED_ATLAS)
    }

    pub fn frame(&self, sprite: Sprite) -> Frame {
        // every Sprite was checked in from_json
        self.frames[&sprite]
    }

}
