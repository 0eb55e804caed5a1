//! Contact notifications
//!
//! The physics world reports contacts through `ContactListener`, in four
//! phases per touching pair:
//!
//! - `begin_contact`: the pair started touching (once)
//! - `pre_solve`: the pair is touching this step (every step)
//! - `post_solve`: after the step's constraints were resolved (every step)
//! - `end_contact`: the pair stopped touching (once)
//!
//! Listeners read and write bodies through `BodyAccess` rather than the
//! engine's own sets, so they can be driven by a plain map in tests.

use glam::Vec2;

use super::role::BodyRole;
use super::world::BodyHandle;

/// Read/write access to body kinematics during contact dispatch
pub trait BodyAccess {
    /// Position in meters, `None` if the body no longer exists
    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    /// Linear velocity in m/s, `None` if the body no longer exists
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
}

/// One participant of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixture {
    pub role: BodyRole,
    pub body: BodyHandle,
}

/// A touching pair. Fixture order is whatever the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub fixture_a: Fixture,
    pub fixture_b: Fixture,
}

/// World-space geometry of a touching pair (at most two points in 2D)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldManifold {
    /// Contact points in meters
    pub points: Vec<Vec2>,
    /// Signed separation per point, negative when overlapping
    pub separations: Vec<f32>,
}

/// Receiver of contact notifications for one simulation step
pub trait ContactListener {
    fn begin_contact(&mut self, bodies: &mut dyn BodyAccess, contact: &Contact);

    fn end_contact(&mut self, _contact: &Contact) {}

    fn pre_solve(&mut self, contact: &Contact, manifold: &WorldManifold);

    fn post_solve(&mut self, _contact: &Contact) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl ContactListener for NoopListener {
    fn begin_contact(&mut self, _bodies: &mut dyn BodyAccess, _contact: &Contact) {}

    fn pre_solve(&mut self, _contact: &Contact, _manifold: &WorldManifold) {}
}
