//! Contact observer
//!
//! Turns contact notifications into gameplay: classifies each new contact by
//! the roles involved, applies the matching reaction to the ball, and
//! publishes separation readouts while the ball stays in contact.

use super::contact::{BodyAccess, Contact, ContactListener, Fixture, WorldManifold};
use super::diagnostics::{DiagnosticsSink, Readout, SEPARATION_SLOTS};
use super::reaction::{
    Reaction, Side, classify, lookup_pair, resolve_block_hit, resolve_racket_hit,
    resolve_wall_hit,
};

/// Gameplay parameters the reactions need
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverConfig {
    /// Racket half-width in meters (must be positive)
    pub racket_half_width: f32,
    /// Ball speed after a racket hit (m/s)
    pub ball_speed: f32,
}

/// Dispatches contact notifications to the reaction policy
pub struct ContactObserver<S: DiagnosticsSink> {
    config: ObserverConfig,
    sink: S,
    /// Reactions applied since creation
    reactions_fired: u64,
}

impl<S: DiagnosticsSink> ContactObserver<S> {
    pub fn new(config: ObserverConfig, sink: S) -> Self {
        debug_assert!(config.racket_half_width > 0.0);
        Self {
            config,
            sink,
            reactions_fired: 0,
        }
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn reactions_fired(&self) -> u64 {
        self.reactions_fired
    }

    fn apply(
        &mut self,
        bodies: &mut dyn BodyAccess,
        reaction: Reaction,
        ball: Fixture,
        other: Fixture,
    ) {
        let Some(velocity) = bodies.velocity(ball.body) else {
            log::warn!("Contact {} <-> {} skipped: ball body missing", ball.role, other.role);
            return;
        };

        let new_velocity = match reaction {
            Reaction::RacketHit => {
                let (Some(ball_pos), Some(racket_pos)) =
                    (bodies.position(ball.body), bodies.position(other.body))
                else {
                    log::warn!("Racket contact skipped: body missing");
                    return;
                };
                resolve_racket_hit(
                    ball_pos,
                    racket_pos,
                    self.config.racket_half_width,
                    self.config.ball_speed,
                )
            }
            Reaction::WallHit(axis) => resolve_wall_hit(velocity, axis),
            Reaction::BlockHit => resolve_block_hit(velocity),
        };

        log::debug!(
            "{} <-> {}: {:?} ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            ball.role,
            other.role,
            reaction,
            velocity.x,
            velocity.y,
            new_velocity.x,
            new_velocity.y
        );

        if new_velocity != velocity {
            bodies.set_velocity(ball.body, new_velocity);
        }
        self.reactions_fired += 1;
    }
}

fn split(contact: &Contact, ball_side: Side) -> (Fixture, Fixture) {
    match ball_side {
        Side::A => (contact.fixture_a, contact.fixture_b),
        Side::B => (contact.fixture_b, contact.fixture_a),
    }
}

impl<S: DiagnosticsSink> ContactListener for ContactObserver<S> {
    fn begin_contact(&mut self, bodies: &mut dyn BodyAccess, contact: &Contact) {
        let Some((reaction, ball_side)) =
            classify(contact.fixture_a.role, contact.fixture_b.role)
        else {
            return;
        };
        let (ball, other) = split(contact, ball_side);
        self.apply(bodies, reaction, ball, other);
    }

    fn pre_solve(&mut self, contact: &Contact, manifold: &WorldManifold) {
        if let Some((slot, _)) =
            lookup_pair(SEPARATION_SLOTS, contact.fixture_a.role, contact.fixture_b.role)
        {
            self.sink
                .publish(slot, Readout::separations(&manifold.separations));
        }
    }
}
