//! Strongly-typed identifiers for tanks, pipes, and ticks.

use std::fmt;

/// Identifies one of the five tanks in the fixed network.
///
/// The network topology is fixed at construction time, so the tank set
/// is closed and expressed as a fieldless enum rather than an open
/// integer id. Manual overrides (`fill`/`drain`) take a `TankId`
/// instead of capturing per-tank closures.
///
/// [`Source`](TankId::Source) is the designated source tank; it starts
/// full while every other tank starts empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TankId {
    /// The source tank at the top of the gravity cascade (Z1).
    Source,
    /// First intermediate tank (Z2).
    A,
    /// Second intermediate tank and branch point (Z3).
    B,
    /// Right branch sink (Z5).
    C,
    /// Left branch sink and pump intake (Z4).
    D,
}

impl TankId {
    /// All tanks in layout order.
    pub const ALL: [TankId; 5] = [TankId::Source, TankId::A, TankId::B, TankId::C, TankId::D];

    /// Dense index in `[0, 5)`, usable for array-backed storage.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Panel label as shown on the instrument diagram.
    pub const fn label(self) -> &'static str {
        match self {
            TankId::Source => "Z1",
            TankId::A => "Z2",
            TankId::B => "Z3",
            TankId::C => "Z5",
            TankId::D => "Z4",
        }
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one of the five directed pipes in the fixed network.
///
/// Four gravity edges form a binary branching tree
/// (Source→A, A→B, B→C, B→D); the pump edge D→B closes a cycle and is
/// independently toggle-able.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PipeId {
    /// Gravity edge from the source tank into A.
    SourceToA,
    /// Gravity edge from A into the branch point B.
    AToB,
    /// Branch edge out of B into the right sink.
    BToC,
    /// Branch edge out of B into the left sink.
    BToD,
    /// Forced-flow pump edge from D back up into B, closing a cycle.
    Pump,
}

impl PipeId {
    /// All pipes in flow-evaluation order.
    pub const ALL: [PipeId; 5] = [
        PipeId::SourceToA,
        PipeId::AToB,
        PipeId::BToC,
        PipeId::BToD,
        PipeId::Pump,
    ];

    /// Dense index in `[0, 5)`, usable for array-backed storage.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name for diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            PipeId::SourceToA => "source->a",
            PipeId::AToB => "a->b",
            PipeId::BToC => "b->c",
            PipeId::BToD => "b->d",
            PipeId::Pump => "pump",
        }
    }
}

impl fmt::Display for PipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation advances one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
