//! Frame geometry
//!
//! Builds the frame's vertex list in world pixels, back to front:
//! background, left, right and top borders, racket, ball, block, then the
//! collider overlay.

use glam::Vec2;

use super::shapes::{quad, rect_outline};
use super::vertex::{Vertex, colors};
use crate::atlas::{Sprite, SpriteSheet};
use crate::sim::{BodyKind, DiagnosticsSink, Simulation};
use crate::vec_to_pixels;

/// Debug outline width in pixels
pub const DEBUG_LINE_WIDTH: f32 = 1.0;

/// One sprite to draw, centered at `center` (pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInstance {
    pub sprite: Sprite,
    pub center: Vec2,
}

/// Sprites in draw order
pub fn sprite_instances<S: DiagnosticsSink>(sim: &Simulation<S>) -> Vec<SpriteInstance> {
    let layout = &sim.arena.layout;
    let mut sprites = vec![
        SpriteInstance {
            sprite: Sprite::Background,
            center: Vec2::ZERO,
        },
        SpriteInstance {
            sprite: Sprite::BorderLeft,
            center: layout.left_wall.center,
        },
        SpriteInstance {
            sprite: Sprite::BorderRight,
            center: layout.right_wall.center,
        },
        SpriteInstance {
            sprite: Sprite::BorderTop,
            center: layout.top_wall.center,
        },
    ];

    let moving = [
        (Sprite::Racket, sim.racket_position_px()),
        (Sprite::Ball, sim.ball_position_px()),
        (Sprite::Block(layout.block_color), sim.block_position_px()),
    ];
    sprites.extend(
        moving
            .into_iter()
            .filter_map(|(sprite, center)| Some(SpriteInstance { sprite, center: center? })),
    );
    sprites
}

fn debug_color(kind: BodyKind) -> [f32; 4] {
    match kind {
        BodyKind::Static => colors::DEBUG_STATIC,
        BodyKind::Kinematic => colors::DEBUG_KINEMATIC,
        BodyKind::Dynamic => colors::DEBUG_DYNAMIC,
    }
}

/// All vertices for one frame
pub fn build_vertices<S: DiagnosticsSink>(
    sim: &Simulation<S>,
    sheet: &SpriteSheet,
    debug_draw: bool,
) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for instance in sprite_instances(sim) {
        let half = sheet.frame(instance.sprite).half_size();
        vertices.extend(quad(instance.center, half, colors::sprite(instance.sprite)));
    }

    if debug_draw {
        for shape in sim.arena.world.debug_shapes() {
            vertices.extend(rect_outline(
                vec_to_pixels(shape.center),
                vec_to_pixels(shape.half_extents),
                shape.rotation,
                DEBUG_LINE_WIDTH,
                debug_color(shape.kind),
            ));
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{ArenaLayout, NullSink};

    fn setup() -> (Simulation<NullSink>, SpriteSheet) {
        let sheet = SpriteSheet::embedded().unwrap();
        let sim = Simulation::new(ArenaLayout::from_atlas(&sheet), Settings::default(), NullSink);
        (sim, sheet)
    }

    #[test]
    fn test_draw_order() {
        let (sim, _) = setup();
        let order: Vec<Sprite> = sprite_instances(&sim).iter().map(|s| s.sprite).collect();
        assert_eq!(
            order,
            vec![
                Sprite::Background,
                Sprite::BorderLeft,
                Sprite::BorderRight,
                Sprite::BorderTop,
                Sprite::Racket,
                Sprite::Ball,
                Sprite::Block(crate::atlas::BlockColor::Red),
            ]
        );
    }

    #[test]
    fn test_debug_overlay_toggle() {
        let (sim, sheet) = setup();
        let plain = build_vertices(&sim, &sheet, false);
        assert_eq!(plain.len(), 7 * 6);

        // Seven colliders, four edges of two triangles each
        let with_debug = build_vertices(&sim, &sheet, true);
        assert_eq!(with_debug.len(), 7 * 6 + 7 * 24);
        assert_eq!(&with_debug[..plain.len()], &plain[..]);
    }

    #[test]
    fn test_ball_quad_centered_on_body() {
        let (sim, sheet) = setup();
        let vertices = build_vertices(&sim, &sheet, false);
        // Sixth sprite is the ball
        let ball = &vertices[5 * 6..6 * 6];
        let cx = ball.iter().map(|v| v.position[0]).sum::<f32>() / 6.0;
        assert!(cx.abs() < 1e-3);
        assert!(ball.iter().all(|v| v.color == colors::BALL));
    }
}
