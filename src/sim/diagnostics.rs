//! Diagnostic readouts
//!
//! The contact observer and the simulation loop publish small text readouts
//! (contact separations, ball position) through a `DiagnosticsSink`. What a
//! sink does with them - DOM elements, the log, a map in a test - is its own
//! business.

use std::collections::HashMap;
use std::fmt;

use super::role::BodyRole;

/// Maximum contact points reported per pair
pub const MAX_READOUT_POINTS: usize = 2;

/// Named readout slot, overwritten on every publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadoutSlot {
    /// Separations while the ball touches the top wall
    TopWallSeparations,
    /// Separations while the ball touches the block
    BlockSeparations,
    /// Separations while the ball touches the racket
    RacketSeparations,
    /// Ball x position in pixels
    BallX,
}

impl ReadoutSlot {
    pub const ALL: [ReadoutSlot; 4] = [
        ReadoutSlot::TopWallSeparations,
        ReadoutSlot::BlockSeparations,
        ReadoutSlot::RacketSeparations,
        ReadoutSlot::BallX,
    ];

    /// Element id prefix used by the web page
    pub fn id(&self) -> &'static str {
        match self {
            ReadoutSlot::TopWallSeparations => "topBorder",
            ReadoutSlot::BlockSeparations => "block",
            ReadoutSlot::RacketSeparations => "racket",
            ReadoutSlot::BallX => "ballXPos",
        }
    }
}

/// Separation readouts keyed by unordered role pair, ball first.
pub const SEPARATION_SLOTS: &[(BodyRole, BodyRole, ReadoutSlot)] = &[
    (BodyRole::Ball, BodyRole::TopWall, ReadoutSlot::TopWallSeparations),
    (BodyRole::Ball, BodyRole::Block, ReadoutSlot::BlockSeparations),
    (BodyRole::Ball, BodyRole::Racket, ReadoutSlot::RacketSeparations),
];

/// A published value
#[derive(Debug, Clone, PartialEq)]
pub enum Readout {
    /// Signed separations of up to two contact points (negative = overlap)
    Separations([Option<f32>; MAX_READOUT_POINTS]),
    Scalar(f32),
}

impl Readout {
    /// Build a separations readout from however many points the manifold has
    pub fn separations(values: &[f32]) -> Self {
        let mut points = [None; MAX_READOUT_POINTS];
        for (slot, value) in points.iter_mut().zip(values) {
            *slot = Some(*value);
        }
        Readout::Separations(points)
    }

    /// Text for one display field. Missing contact points render empty.
    pub fn field(&self, index: usize) -> String {
        match self {
            Readout::Separations(points) => points
                .get(index)
                .copied()
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Readout::Scalar(v) if index == 0 => v.to_string(),
            Readout::Scalar(_) => String::new(),
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readout::Separations(_) => write!(f, "[{}, {}]", self.field(0), self.field(1)),
            Readout::Scalar(v) => write!(f, "{v}"),
        }
    }
}

/// Destination for diagnostic readouts
pub trait DiagnosticsSink {
    fn publish(&mut self, slot: ReadoutSlot, value: Readout);
}

/// Keeps the latest value per slot. Used natively and in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    latest: HashMap<ReadoutSlot, Readout>,
    publishes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ReadoutSlot) -> Option<&Readout> {
        self.latest.get(&slot)
    }

    /// Total publishes received, across all slots
    pub fn publish_count(&self) -> usize {
        self.publishes
    }
}

impl DiagnosticsSink for MemorySink {
    fn publish(&mut self, slot: ReadoutSlot, value: Readout) {
        self.latest.insert(slot, value);
        self.publishes += 1;
    }
}

/// Writes readouts to the log at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn publish(&mut self, slot: ReadoutSlot, value: Readout) {
        log::trace!("{}: {}", slot.id(), value);
    }
}

/// Discards everything (readouts switched off)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn publish(&mut self, _slot: ReadoutSlot, _value: Readout) {}
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Box<S> {
    fn publish(&mut self, slot: ReadoutSlot, value: Readout) {
        (**self).publish(slot, value);
    }
}
