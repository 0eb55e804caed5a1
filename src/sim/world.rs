//! Physics world
//!
//! Thin wrapper over a rapier2d pipeline. It owns every engine set, builds
//! role-tagged box bodies, and turns the engine's collision events and
//! contact manifolds into `ContactListener` calls before `step` returns.
//!
//! The ball's collider takes part in contact detection but not in contact
//! resolution: no solver impulses are ever applied to it, so its velocity
//! is whatever the contact listener last set.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::{
    ActiveEvents, CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, CollisionEvent,
    ContactPair, DefaultBroadPhase, EventHandler, ImpulseJointSet, IntegrationParameters,
    InteractionGroups, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector, nalgebra, vector,
};

use super::contact::{BodyAccess, Contact, ContactListener, Fixture, WorldManifold};
use super::diagnostics::MAX_READOUT_POINTS;
use super::role::BodyRole;

/// Opaque reference to a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

impl BodyHandle {
    #[cfg(test)]
    pub(crate) fn from_raw(index: u32) -> Self {
        Self(RigidBodyHandle::from_raw_parts(index, 0))
    }
}

/// How the engine moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves on its own
    Static,
    /// Moved by the game, pushes but is never pushed
    Kinematic,
    /// Integrated by the engine
    Dynamic,
}

/// Physical material of a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Material {
    /// Frictionless and perfectly elastic
    pub const fn bouncy(density: f32) -> Self {
        Self {
            density,
            friction: 0.0,
            restitution: 1.0,
        }
    }
}

/// Everything needed to create a box body with one collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub role: BodyRole,
    pub kind: BodyKind,
    /// Center in meters
    pub position: Vec2,
    /// Box half extents in meters
    pub half_extents: Vec2,
    pub material: Material,
    pub velocity: Vec2,
    pub fixed_rotation: bool,
    /// Whether the solver pushes this body out of contacts
    pub solver_response: bool,
}

impl BodyDef {
    pub fn new(role: BodyRole, kind: BodyKind, position: Vec2, half_extents: Vec2) -> Self {
        Self {
            role,
            kind,
            position,
            half_extents,
            material: Material::bouncy(0.0),
            velocity: Vec2::ZERO,
            fixed_rotation: false,
            solver_response: true,
        }
    }
}

/// Collider outline for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugShape {
    pub role: Option<BodyRole>,
    pub kind: BodyKind,
    /// Center in meters
    pub center: Vec2,
    pub half_extents: Vec2,
    pub rotation: f32,
}

/// Collects collision events while the pipeline steps
#[derive(Default)]
struct EventCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl EventCollector {
    fn into_events(self) -> Vec<CollisionEvent> {
        self.events.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventHandler for EventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Rigid-body world with role-tagged bodies
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Steps taken since creation
    steps: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            steps: 0,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Create a box body with a single role-tagged collider
    pub fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().can_sleep(false),
        };
        let mut builder = builder
            .translation(to_vector(def.position))
            .linvel(to_vector(def.velocity))
            .user_data(def.role.to_user_data());
        if def.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder.build());

        let mut collider = ColliderBuilder::cuboid(def.half_extents.x, def.half_extents.y)
            .density(def.material.density)
            .friction(def.material.friction)
            .restitution(def.material.restitution)
            .user_data(def.role.to_user_data())
            .active_events(ActiveEvents::COLLISION_EVENTS);
        if !def.solver_response {
            collider = collider.solver_groups(InteractionGroups::none());
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        log::debug!(
            "Created {} body ({:?}) at ({:.3}, {:.3})",
            def.role,
            def.kind,
            def.position.x,
            def.position.y
        );

        BodyHandle(handle)
    }

    /// Teleport a body (walls, blocks, re-served ball)
    pub fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_translation(to_vector(position), true);
        }
    }

    /// Move a kinematic body to `position` over the next step
    pub fn move_kinematic(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_next_kinematic_translation(to_vector(position));
        }
    }

    /// Advance the world by `dt` and deliver this step's contact notifications.
    ///
    /// Order: begin/end events as the engine raised them, then pre-solve for
    /// every pair still touching, then post-solve for the same pairs.
    pub fn step(
        &mut self,
        dt: f32,
        velocity_iterations: usize,
        position_iterations: usize,
        listener: &mut dyn ContactListener,
    ) {
        self.integration_parameters.dt = dt;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_pgs_iterations = position_iterations.max(1);

        let collector = EventCollector::default();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &collector,
        );
        self.steps += 1;

        for event in collector.into_events() {
            let Some(contact) = self.contact(event.collider1(), event.collider2()) else {
                continue;
            };
            match event {
                CollisionEvent::Started(..) => listener.begin_contact(self, &contact),
                CollisionEvent::Stopped(..) => listener.end_contact(&contact),
            }
        }

        let touching = self.touching_pairs();
        for (contact, manifold) in &touching {
            listener.pre_solve(contact, manifold);
        }
        for (contact, _) in &touching {
            listener.post_solve(contact);
        }
    }

    fn fixture(&self, collider: ColliderHandle) -> Option<Fixture> {
        let co = self.colliders.get(collider)?;
        let role = BodyRole::from_user_data(co.user_data)?;
        let body = co.parent()?;
        Some(Fixture {
            role,
            body: BodyHandle(body),
        })
    }

    fn contact(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Contact> {
        Some(Contact {
            fixture_a: self.fixture(a)?,
            fixture_b: self.fixture(b)?,
        })
    }

    /// Pairs in contact after the last step, with world-space geometry
    fn touching_pairs(&self) -> Vec<(Contact, WorldManifold)> {
        self.narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                let contact = self.contact(pair.collider1, pair.collider2)?;
                Some((contact, self.world_manifold(pair)))
            })
            .collect()
    }

    fn world_manifold(&self, pair: &ContactPair) -> WorldManifold {
        let mut manifold = WorldManifold::default();
        let Some(co1) = self.colliders.get(pair.collider1) else {
            return manifold;
        };
        let pos1 = co1.position();

        // First manifold with points; box-box pairs only ever have one
        if let Some(m) = pair.manifolds.iter().find(|m| !m.points.is_empty()) {
            for point in m.points.iter().take(MAX_READOUT_POINTS) {
                let world = pos1 * point.local_p1;
                manifold.points.push(Vec2::new(world.x, world.y));
                manifold.separations.push(point.dist);
            }
        }
        manifold
    }

    /// Collider outlines for the debug overlay
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        self.colliders
            .iter()
            .filter_map(|(_, co)| {
                let cuboid = co.shape().as_cuboid()?;
                let kind = co
                    .parent()
                    .and_then(|h| self.bodies.get(h))
                    .map(|b| {
                        if b.is_dynamic() {
                            BodyKind::Dynamic
                        } else if b.is_kinematic() {
                            BodyKind::Kinematic
                        } else {
                            BodyKind::Static
                        }
                    })
                    .unwrap_or(BodyKind::Static);
                Some(DebugShape {
                    role: BodyRole::from_user_data(co.user_data),
                    kind,
                    center: from_vector(co.translation()),
                    half_extents: from_vector(&cuboid.half_extents),
                    rotation: co.rotation().angle(),
                })
            })
            .collect()
    }
}

impl BodyAccess for PhysicsWorld {
    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0).map(|b| from_vector(b.translation()))
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(body.0).map(|b| from_vector(b.linvel()))
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_linvel(to_vector(velocity), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::contact::NoopListener;
    use crate::sim::diagnostics::{MemorySink, ReadoutSlot};
    use crate::sim::observer::{ContactObserver, ObserverConfig};

    const DT: f32 = 0.016;

    /// Counts notifications per phase
    #[derive(Default)]
    struct Recorder {
        begins: Vec<(BodyRole, BodyRole)>,
        ends: usize,
        pre_solves: usize,
        post_solves: usize,
    }

    impl ContactListener for Recorder {
        fn begin_contact(&mut self, _bodies: &mut dyn BodyAccess, contact: &Contact) {
            self.begins
                .push((contact.fixture_a.role, contact.fixture_b.role));
        }

        fn end_contact(&mut self, _contact: &Contact) {
            self.ends += 1;
        }

        fn pre_solve(&mut self, _contact: &Contact, _manifold: &WorldManifold) {
            self.pre_solves += 1;
        }

        fn post_solve(&mut self, _contact: &Contact) {
            self.post_solves += 1;
        }
    }

    fn ball_def(position: Vec2, velocity: Vec2) -> BodyDef {
        BodyDef {
            material: Material::bouncy(1.0),
            velocity,
            fixed_rotation: true,
            solver_response: false,
            ..BodyDef::new(
                BodyRole::Ball,
                BodyKind::Dynamic,
                position,
                Vec2::splat(0.13),
            )
        }
    }

    fn observer() -> ContactObserver<MemorySink> {
        ContactObserver::new(
            ObserverConfig {
                racket_half_width: 0.66,
                ball_speed: 5.0,
            },
            MemorySink::new(),
        )
    }

    #[test]
    fn test_dynamic_body_integrates_velocity() {
        let mut world = PhysicsWorld::default();
        let ball = world.create_body(&ball_def(Vec2::ZERO, Vec2::new(0.0, 5.0)));

        for _ in 0..10 {
            world.step(DT, 3, 2, &mut NoopListener);
        }

        let pos = world.position(ball).unwrap();
        assert!((pos.y - 0.8).abs() < 1e-3, "pos = {pos}");
        let v = world.velocity(ball).unwrap();
        assert!((v - Vec2::new(0.0, 5.0)).length() < 1e-5);
        assert_eq!(world.steps(), 10);
    }

    #[test]
    fn test_overlap_begins_once_and_presolves_every_step() {
        let mut world = PhysicsWorld::default();
        world.create_body(&BodyDef::new(
            BodyRole::Block,
            BodyKind::Static,
            Vec2::ZERO,
            Vec2::new(0.4, 0.17),
        ));
        world.create_body(&ball_def(Vec2::new(0.1, 0.1), Vec2::ZERO));

        let mut recorder = Recorder::default();
        for _ in 0..3 {
            world.step(DT, 3, 2, &mut recorder);
        }

        assert_eq!(recorder.begins.len(), 1);
        let (a, b) = recorder.begins[0];
        assert!(matches!(
            (a, b),
            (BodyRole::Ball, BodyRole::Block) | (BodyRole::Block, BodyRole::Ball)
        ));
        assert_eq!(recorder.pre_solves, 3);
        assert_eq!(recorder.post_solves, 3);
        assert_eq!(recorder.ends, 0);
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let mut world = PhysicsWorld::default();
        world.create_body(&BodyDef::new(
            BodyRole::TopWall,
            BodyKind::Static,
            Vec2::new(0.0, 3.73),
            Vec2::new(3.3, 0.27),
        ));
        let ball = world.create_body(&ball_def(Vec2::new(0.0, 3.0), Vec2::new(1.0, 4.0)));

        let mut obs = observer();
        for _ in 0..30 {
            world.step(DT, 3, 2, &mut obs);
        }

        assert_eq!(obs.reactions_fired(), 1);
        let v = world.velocity(ball).unwrap();
        assert!((v.x - 1.0).abs() < 1e-5);
        assert!((v.y + 4.0).abs() < 1e-5);
        assert!(world.position(ball).unwrap().y < 3.0);
        assert!(obs.sink().get(ReadoutSlot::TopWallSeparations).is_some());
    }

    #[test]
    fn test_ball_passes_through_block() {
        let mut world = PhysicsWorld::default();
        world.create_body(&BodyDef::new(
            BodyRole::Block,
            BodyKind::Static,
            Vec2::new(0.0, 1.0),
            Vec2::new(0.38, 0.17),
        ));
        let ball = world.create_body(&ball_def(Vec2::ZERO, Vec2::new(0.0, 5.0)));

        let mut obs = observer();
        for _ in 0..30 {
            world.step(DT, 3, 2, &mut obs);
        }

        let v = world.velocity(ball).unwrap();
        assert!((v - Vec2::new(0.0, 5.0)).length() < 1e-5, "v = {v}");
        assert!(world.position(ball).unwrap().y > 2.0);
        assert_eq!(obs.reactions_fired(), 1);
        assert!(obs.sink().get(ReadoutSlot::BlockSeparations).is_some());
    }

    #[test]
    fn test_racket_redirects_ball_upward() {
        let mut world = PhysicsWorld::default();
        world.create_body(&BodyDef {
            material: Material::bouncy(1.0),
            ..BodyDef::new(
                BodyRole::Racket,
                BodyKind::Kinematic,
                Vec2::new(0.0, -3.17),
                Vec2::new(0.66, 0.13),
            )
        });
        let ball = world.create_body(&ball_def(Vec2::new(0.33, -2.5), Vec2::new(0.0, -5.0)));

        let mut obs = observer();
        for _ in 0..10 {
            world.step(DT, 3, 2, &mut obs);
        }

        assert_eq!(obs.reactions_fired(), 1);
        let v = world.velocity(ball).unwrap();
        assert!(v.x > 0.0 && v.y > 0.0, "v = {v}");
        assert!((v.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_debug_shapes_cover_every_collider() {
        let mut world = PhysicsWorld::default();
        world.create_body(&BodyDef::new(
            BodyRole::LeftWall,
            BodyKind::Static,
            Vec2::new(-3.5, 0.0),
            Vec2::new(0.27, 4.0),
        ));
        world.create_body(&ball_def(Vec2::ZERO, Vec2::ZERO));

        let shapes = world.debug_shapes();
        assert_eq!(shapes.len(), 2);
        let wall = shapes
            .iter()
            .find(|s| s.role == Some(BodyRole::LeftWall))
            .unwrap();
        assert_eq!(wall.kind, BodyKind::Static);
        assert!((wall.half_extents - Vec2::new(0.27, 4.0)).length() < 1e-6);
        assert!(shapes.iter().any(|s| s.kind == BodyKind::Dynamic));
    }
}
