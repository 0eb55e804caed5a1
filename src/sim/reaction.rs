//! Collision reaction policy
//!
//! Decides how the ball's velocity is recomputed when it starts touching
//! something. The functions here are pure; the contact observer owns the
//! bodies and writes the results back.
//!
//! Racket hits ignore the approach angle entirely: the outgoing direction
//! depends only on where the ball struck the racket.
//!
//! ```text
//!  -1  -0.5  0  0.5   1   <- hit factor
//!   ===================   <- racket
//! ```

use glam::Vec2;

use super::role::BodyRole;

/// Velocity axis flipped by a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What happens to the ball when a contact begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Redirect by hit position, restore ball speed
    RacketHit,
    /// Mirror one velocity component
    WallHit(Axis),
    /// Blocks are inert; the ball keeps its velocity
    BlockHit,
}

/// Which fixture of a contact pair plays the first role of a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// Reactions keyed by unordered role pair. The ball is always listed first.
///
/// The bottom wall has no entry: a ball reaching it leaves the arena and is
/// re-served by the simulation loop instead.
pub const REACTIONS: &[(BodyRole, BodyRole, Reaction)] = &[
    (BodyRole::Ball, BodyRole::Racket, Reaction::RacketHit),
    (BodyRole::Ball, BodyRole::LeftWall, Reaction::WallHit(Axis::X)),
    (BodyRole::Ball, BodyRole::RightWall, Reaction::WallHit(Axis::X)),
    (BodyRole::Ball, BodyRole::TopWall, Reaction::WallHit(Axis::Y)),
    (BodyRole::Ball, BodyRole::Block, Reaction::BlockHit),
];

/// Look up an unordered role pair in a table, trying (a, b) then (b, a).
///
/// Returns the entry's value and the side holding the entry's first role.
pub fn lookup_pair<T: Copy>(
    table: &[(BodyRole, BodyRole, T)],
    a: BodyRole,
    b: BodyRole,
) -> Option<(T, Side)> {
    table.iter().find_map(|&(first, second, value)| {
        if (a, b) == (first, second) {
            Some((value, Side::A))
        } else if (b, a) == (first, second) {
            Some((value, Side::B))
        } else {
            None
        }
    })
}

/// Classify a contact pair. `Side` tells which fixture is the ball.
pub fn classify(a: BodyRole, b: BodyRole) -> Option<(Reaction, Side)> {
    lookup_pair(REACTIONS, a, b)
}

/// Where along the racket the ball struck, -1 at the left edge, 1 at the right.
///
/// Not clamped: contacts registered slightly past the racket's nominal extent
/// produce values beyond ±1.
#[inline]
pub fn hit_factor(ball_x: f32, racket_x: f32, racket_half_width: f32) -> f32 {
    debug_assert!(racket_half_width > 0.0, "racket half-width must be positive");
    (ball_x - racket_x) / racket_half_width
}

/// New ball velocity after touching the racket.
///
/// Direction is (hit factor, 1) normalized, so the ball always leaves upward;
/// the magnitude is exactly `ball_speed`.
pub fn resolve_racket_hit(
    ball_pos: Vec2,
    racket_pos: Vec2,
    racket_half_width: f32,
    ball_speed: f32,
) -> Vec2 {
    let hit = hit_factor(ball_pos.x, racket_pos.x, racket_half_width);
    // y = 1 keeps the direction non-zero
    Vec2::new(hit, 1.0).normalize() * ball_speed
}

/// New ball velocity after touching a wall: one component mirrored.
#[inline]
pub fn resolve_wall_hit(velocity: Vec2, axis: Axis) -> Vec2 {
    match axis {
        Axis::X => Vec2::new(-velocity.x, velocity.y),
        Axis::Y => Vec2::new(velocity.x, -velocity.y),
    }
}

/// Blocks do not deflect the ball.
#[inline]
pub fn resolve_block_hit(velocity: Vec2) -> Vec2 {
    velocity
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPEED: f32 = 5.0;

    #[test]
    fn test_racket_dead_center_goes_straight_up() {
        let v = resolve_racket_hit(Vec2::new(1.5, -2.0), Vec2::new(1.5, -3.0), 0.66, SPEED);
        assert_eq!(v, Vec2::new(0.0, SPEED));
    }

    #[test]
    fn test_racket_edge_hit_is_diagonal() {
        let half = 20.0;
        let v = resolve_racket_hit(Vec2::new(half, 0.0), Vec2::ZERO, half, SPEED);
        let expected = SPEED * std::f32::consts::FRAC_1_SQRT_2;
        assert!((v.x - expected).abs() < 1e-5);
        assert!((v.y - expected).abs() < 1e-5);
        assert_eq!(hit_factor(half, 0.0, half), 1.0);
    }

    #[test]
    fn test_racket_hit_factor_not_clamped() {
        assert_eq!(hit_factor(30.0, 0.0, 20.0), 1.5);
        assert_eq!(hit_factor(-40.0, 0.0, 20.0), -2.0);
        // Left of center sends the ball left
        let v = resolve_racket_hit(Vec2::new(-10.0, 0.0), Vec2::ZERO, 20.0, SPEED);
        assert!(v.x < 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_side_walls_flip_x() {
        let v = resolve_wall_hit(Vec2::new(3.0, -5.0), Axis::X);
        assert_eq!(v, Vec2::new(-3.0, -5.0));
    }

    #[test]
    fn test_top_wall_flips_y() {
        let v = resolve_wall_hit(Vec2::new(3.0, -5.0), Axis::Y);
        assert_eq!(v, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_wall_flips_compose_in_any_order() {
        let v = Vec2::new(2.0, 7.0);
        let xy = resolve_wall_hit(resolve_wall_hit(v, Axis::X), Axis::Y);
        let yx = resolve_wall_hit(resolve_wall_hit(v, Axis::Y), Axis::X);
        assert_eq!(xy, yx);
        assert_eq!(resolve_wall_hit(resolve_wall_hit(v, Axis::X), Axis::X), v);
    }

    #[test]
    fn test_block_hit_keeps_velocity() {
        let v = Vec2::new(-1.25, 4.5);
        assert_eq!(resolve_block_hit(v), v);
    }

    #[test]
    fn test_classify_is_symmetric() {
        for &(first, second, reaction) in REACTIONS {
            assert_eq!(classify(first, second), Some((reaction, Side::A)));
            assert_eq!(classify(second, first), Some((reaction, Side::B)));
        }
    }

    #[test]
    fn test_classify_walls() {
        assert_eq!(
            classify(BodyRole::LeftWall, BodyRole::Ball),
            Some((Reaction::WallHit(Axis::X), Side::B))
        );
        assert_eq!(
            classify(BodyRole::Ball, BodyRole::TopWall),
            Some((Reaction::WallHit(Axis::Y), Side::A))
        );
    }

    #[test]
    fn test_classify_unknown_pairs() {
        assert_eq!(classify(BodyRole::Racket, BodyRole::Block), None);
        assert_eq!(classify(BodyRole::Ball, BodyRole::Ball), None);
        assert_eq!(classify(BodyRole::Ball, BodyRole::BottomWall), None);
        assert_eq!(classify(BodyRole::LeftWall, BodyRole::TopWall), None);
    }

    proptest! {
        #[test]
        fn prop_racket_hit_keeps_speed(
            ball_x in -100.0f32..100.0,
            racket_x in -100.0f32..100.0,
            half in 0.1f32..50.0,
            speed in 0.5f32..50.0,
        ) {
            let v = resolve_racket_hit(Vec2::new(ball_x, 0.0), Vec2::new(racket_x, -1.0), half, speed);
            prop_assert!((v.length() - speed).abs() <= speed * 1e-5);
        }

        #[test]
        fn prop_racket_hit_always_goes_up(
            ball_x in -100.0f32..100.0,
            racket_x in -100.0f32..100.0,
            half in 0.1f32..50.0,
        ) {
            let v = resolve_racket_hit(Vec2::new(ball_x, 0.0), Vec2::new(racket_x, -1.0), half, SPEED);
            prop_assert!(v.y > 0.0);
        }
    }
}
