//! Arena layout and simulation context
//!
//! `Simulation` holds everything that changes from frame to frame: the
//! physics world, the handles of the bodies the game cares about, and the
//! contact observer. It is created once at startup and owned by the frame
//! loop for the rest of the program.

use glam::Vec2;

use super::contact::BodyAccess;
use super::diagnostics::DiagnosticsSink;
use super::observer::{ContactObserver, ObserverConfig};
use super::role::BodyRole;
use super::world::{BodyDef, BodyHandle, BodyKind, Material, PhysicsWorld};
use crate::atlas::{BlockColor, Sprite, SpriteSheet};
use crate::consts::*;
use crate::settings::Settings;
use crate::{to_meters, vec_to_meters, vec_to_pixels};

/// Placement of one box in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayout {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl BoxLayout {
    pub fn new(center: Vec2, half_size: Vec2) -> Self {
        Self { center, half_size }
    }
}

/// Where everything starts, in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    pub left_wall: BoxLayout,
    pub right_wall: BoxLayout,
    pub top_wall: BoxLayout,
    pub bottom_wall: BoxLayout,
    pub racket: BoxLayout,
    pub ball: BoxLayout,
    pub block: BoxLayout,
    pub block_color: BlockColor,
}

impl ArenaLayout {
    /// Standard arena, sized from the sprite frames
    pub fn from_atlas(sheet: &SpriteSheet) -> Self {
        let block_color = BlockColor::Red;
        let top_half = sheet.frame(Sprite::BorderTop).half_size();
        Self {
            left_wall: BoxLayout::new(
                Vec2::new(LEFT_WALL_X, 0.0),
                sheet.frame(Sprite::BorderLeft).half_size(),
            ),
            right_wall: BoxLayout::new(
                Vec2::new(RIGHT_WALL_X, 0.0),
                sheet.frame(Sprite::BorderRight).half_size(),
            ),
            top_wall: BoxLayout::new(Vec2::new(0.0, TOP_WALL_Y), top_half),
            // No sprite of its own; mirrors the top border
            bottom_wall: BoxLayout::new(Vec2::new(0.0, BOTTOM_WALL_Y), top_half),
            racket: BoxLayout::new(
                Vec2::from(RACKET_START),
                sheet.frame(Sprite::Racket).half_size(),
            ),
            ball: BoxLayout::new(Vec2::from(BALL_START), sheet.frame(Sprite::Ball).half_size()),
            block: BoxLayout::new(
                Vec2::from(BLOCK_START),
                sheet.frame(Sprite::Block(block_color)).half_size(),
            ),
            block_color,
        }
    }

    /// Racket center x range in pixels (exclusive): the racket may not
    /// overlap either side wall.
    pub fn racket_x_range(&self) -> (f32, f32) {
        let min = self.left_wall.center.x + self.left_wall.half_size.x + self.racket.half_size.x;
        let max =
            self.right_wall.center.x - self.right_wall.half_size.x - self.racket.half_size.x;
        (min, max)
    }

    /// Ball center range in pixels `(min, max)`. Outside it the ball has
    /// fully crossed a wall's outer edge and left the arena.
    ///
    /// The ball gets no solver response, so a reaction that is overwritten
    /// in the same step (wall then racket in a corner) lets it pass through
    /// a side wall as easily as through the bottom.
    pub fn ball_bounds(&self) -> (Vec2, Vec2) {
        let ball = self.ball.half_size;
        let min = Vec2::new(
            self.left_wall.center.x - self.left_wall.half_size.x - ball.x,
            self.bottom_wall.center.y - self.bottom_wall.half_size.y - ball.y,
        );
        let max = Vec2::new(
            self.right_wall.center.x + self.right_wall.half_size.x + ball.x,
            self.top_wall.center.y + self.top_wall.half_size.y + ball.y,
        );
        (min, max)
    }
}

fn static_box(role: BodyRole, layout: &BoxLayout) -> BodyDef {
    BodyDef::new(
        role,
        BodyKind::Static,
        vec_to_meters(layout.center),
        vec_to_meters(layout.half_size),
    )
}

/// Bodies of the arena and the world that owns them
pub struct Arena {
    pub world: PhysicsWorld,
    pub layout: ArenaLayout,
    pub ball: BodyHandle,
    pub racket: BodyHandle,
    pub block: BodyHandle,
}

impl Arena {
    /// Build the world: four borders, the racket, the ball and one block
    pub fn new(layout: ArenaLayout, ball_speed: f32) -> Self {
        let mut world = PhysicsWorld::new(Vec2::ZERO);

        for (role, wall) in [
            (BodyRole::LeftWall, &layout.left_wall),
            (BodyRole::RightWall, &layout.right_wall),
            (BodyRole::TopWall, &layout.top_wall),
            (BodyRole::BottomWall, &layout.bottom_wall),
        ] {
            world.create_body(&static_box(role, wall));
        }

        let racket = world.create_body(&BodyDef {
            material: Material::bouncy(1.0),
            ..BodyDef::new(
                BodyRole::Racket,
                BodyKind::Kinematic,
                vec_to_meters(layout.racket.center),
                vec_to_meters(layout.racket.half_size),
            )
        });

        let ball = world.create_body(&BodyDef {
            material: Material::bouncy(1.0),
            velocity: Vec2::new(0.0, ball_speed),
            fixed_rotation: true,
            solver_response: false,
            ..BodyDef::new(
                BodyRole::Ball,
                BodyKind::Dynamic,
                vec_to_meters(layout.ball.center),
                vec_to_meters(layout.ball.half_size),
            )
        });

        let block = world.create_body(&static_box(BodyRole::Block, &layout.block));

        log::info!("Arena built with {} bodies", world.body_count());

        Self {
            world,
            layout,
            ball,
            racket,
            block,
        }
    }

    /// Body position in pixels
    pub fn position_px(&self, body: BodyHandle) -> Option<Vec2> {
        self.world.position(body).map(vec_to_pixels)
    }

    pub fn ball_velocity(&self) -> Option<Vec2> {
        self.world.velocity(self.ball)
    }

    /// Move the block vertically, keeping its x (pixels)
    pub fn set_block_y(&mut self, y_px: f32) {
        if !y_px.is_finite() {
            return;
        }
        let Some(current) = self.position_px(self.block) else {
            return;
        };
        self.world
            .set_position(self.block, vec_to_meters(Vec2::new(current.x, y_px)));
    }

    /// Shift the racket by `dx` meters unless that would take it into a wall.
    ///
    /// Returns whether the racket moved.
    pub fn nudge_racket(&mut self, dx: f32) -> bool {
        let Some(pos) = self.world.position(self.racket) else {
            return false;
        };
        let x = pos.x + dx;
        let (min, max) = self.layout.racket_x_range();
        if to_meters(min) < x && x < to_meters(max) {
            self.world.move_kinematic(self.racket, Vec2::new(x, pos.y));
            true
        } else {
            false
        }
    }

    /// Whether the ball has left the arena through any wall
    pub fn ball_lost(&self) -> bool {
        let Some(pos) = self.position_px(self.ball) else {
            return false;
        };
        let (min, max) = self.layout.ball_bounds();
        pos.cmplt(min).any() || pos.cmpgt(max).any()
    }

    /// Put the ball back at the serve point heading straight up
    pub fn serve_ball(&mut self, ball_speed: f32) {
        self.world
            .set_position(self.ball, vec_to_meters(self.layout.ball.center));
        self.world
            .set_velocity(self.ball, Vec2::new(0.0, ball_speed));
    }
}

/// Frame-to-frame game context
pub struct Simulation<S: DiagnosticsSink> {
    pub arena: Arena,
    pub observer: ContactObserver<S>,
    pub settings: Settings,
    /// Last ball x published, in pixels
    pub(crate) last_ball_x: Option<f32>,
    /// Times the ball was re-served after leaving the arena
    pub serves: u32,
}

impl<S: DiagnosticsSink> Simulation<S> {
    pub fn new(layout: ArenaLayout, settings: Settings, sink: S) -> Self {
        let settings = settings.sanitized();
        let observer = ContactObserver::new(
            ObserverConfig {
                racket_half_width: to_meters(layout.racket.half_size.x),
                ball_speed: settings.ball_speed,
            },
            sink,
        );
        Self {
            arena: Arena::new(layout, settings.ball_speed),
            observer,
            settings,
            last_ball_x: None,
            serves: 0,
        }
    }

    pub fn ball_position_px(&self) -> Option<Vec2> {
        self.arena.position_px(self.arena.ball)
    }

    pub fn racket_position_px(&self) -> Option<Vec2> {
        self.arena.position_px(self.arena.racket)
    }

    pub fn block_position_px(&self) -> Option<Vec2> {
        self.arena.position_px(self.arena.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::diagnostics::MemorySink;

    fn layout() -> ArenaLayout {
        ArenaLayout::from_atlas(&SpriteSheet::embedded().unwrap())
    }

    #[test]
    fn test_layout_from_atlas() {
        let l = layout();
        assert_eq!(l.racket.half_size, Vec2::new(20.0, 4.0));
        assert_eq!(l.left_wall.center, Vec2::new(-107.0, 0.0));
        assert_eq!(l.bottom_wall.half_size, l.top_wall.half_size);
        assert_eq!(l.racket_x_range(), (-79.0, 79.0));
    }

    #[test]
    fn test_arena_starts_with_ball_moving_up() {
        let sim = Simulation::new(layout(), Settings::default(), MemorySink::new());
        assert_eq!(sim.arena.world.body_count(), 7);
        assert_eq!(sim.arena.ball_velocity(), Some(Vec2::new(0.0, 5.0)));
        let ball = sim.ball_position_px().unwrap();
        assert!((ball - Vec2::new(0.0, -80.0)).length() < 1e-3);
        let racket = sim.racket_position_px().unwrap();
        assert!((racket - Vec2::new(0.0, -95.0)).length() < 1e-3);
    }

    #[test]
    fn test_observer_uses_racket_half_width_in_meters() {
        let sim = Simulation::new(layout(), Settings::default(), MemorySink::new());
        let config = sim.observer.config();
        assert!((config.racket_half_width - 20.0 / 30.0).abs() < 1e-6);
        assert_eq!(config.ball_speed, 5.0);
    }

    #[test]
    fn test_racket_refuses_to_enter_walls() {
        let mut sim = Simulation::new(layout(), Settings::default(), MemorySink::new());
        assert!(sim.arena.nudge_racket(to_meters(10.0)));
        assert!(!sim.arena.nudge_racket(to_meters(200.0)));
        assert!(!sim.arena.nudge_racket(to_meters(-79.0)));
    }

    #[test]
    fn test_set_block_y_keeps_x() {
        let mut sim = Simulation::new(layout(), Settings::default(), MemorySink::new());
        sim.arena.set_block_y(40.0);
        let block = sim.block_position_px().unwrap();
        assert!((block - Vec2::new(-11.5, 40.0)).length() < 1e-3);

        sim.arena.set_block_y(f32::NAN);
        let block = sim.block_position_px().unwrap();
        assert!((block.y - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_ball_lost_past_any_wall() {
        let mut sim = Simulation::new(layout(), Settings::default(), MemorySink::new());
        let (min, max) = sim.arena.layout.ball_bounds();
        assert_eq!(min, Vec2::new(-119.0, -124.0));
        assert_eq!(max, Vec2::new(119.0, 124.0));
        assert!(!sim.arena.ball_lost());

        let ball = sim.arena.ball;
        // Overlapping a wall is still inside
        for inside in [Vec2::new(-110.0, 0.0), Vec2::new(0.0, 118.0)] {
            sim.arena.world.set_position(ball, vec_to_meters(inside));
            assert!(!sim.arena.ball_lost(), "{inside}");
        }
        for outside in [
            Vec2::new(-125.0, 0.0),
            Vec2::new(125.0, -50.0),
            Vec2::new(0.0, 130.0),
            Vec2::new(30.0, -130.0),
        ] {
            sim.arena.world.set_position(ball, vec_to_meters(outside));
            assert!(sim.arena.ball_lost(), "{outside}");
        }
    }
}
