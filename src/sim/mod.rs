//! Simulation module
//!
//! Physics world, contact observer and the collision reaction policy.
//! - Reactions are pure functions of positions and velocities
//! - The observer only sees the engine through `BodyAccess`/`ContactListener`
//! - No rendering or platform dependencies

pub mod contact;
pub mod diagnostics;
pub mod observer;
pub mod reaction;
pub mod role;
pub mod state;
pub mod tick;
pub mod world;

pub use contact::{BodyAccess, Contact, ContactListener, Fixture, NoopListener, WorldManifold};
pub use diagnostics::{
    DiagnosticsSink, LogSink, MAX_READOUT_POINTS, MemorySink, NullSink, Readout, ReadoutSlot,
};
pub use observer::{ContactObserver, ObserverConfig};
pub use reaction::{Axis, Reaction, Side, classify, hit_factor, resolve_racket_hit};
pub use role::BodyRole;
pub use state::{Arena, ArenaLayout, BoxLayout, Simulation};
pub use tick::{TickInput, tick};
pub use world::{BodyDef, BodyHandle, BodyKind, DebugShape, Material, PhysicsWorld};
