//! The fixed flow network, expressed as ordered edge-descriptor data.
//!
//! The per-tick priority order is the system's one nontrivial design
//! choice: earlier steps claim capacity before later steps see the
//! remaining headroom. Representing the order as a `Vec<FlowStep>`
//! consumed by one generic executor keeps it auditable and testable as
//! data instead of hand-written, order-dependent branches.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;
use sluice_core::{Pipe, PipeId, Tank, TankId};

use crate::config::SimConfig;

/// Per-pipe delivered volume from executing one step.
///
/// At most two pipes carry flow in a single step (the branch); inline
/// storage avoids allocation on the tick path.
pub type StepFlows = SmallVec<[(PipeId, f64); 2]>;

// ── FlowStep ───────────────────────────────────────────────────────

/// One entry in the ordered per-tick flow program.
///
/// All variants are plain data fixed at construction time; execution
/// mutates tank volumes and pipe flow indicators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowStep {
    /// Gravity transfer of up to `quantum` units along one edge.
    ///
    /// Guard: the source is not empty and the destination is not full.
    /// Once the guard passes the pipe is marked flowing even if the
    /// destination accepts less than was removed: the flag reports the
    /// guard outcome, not the delivered amount.
    Gravity {
        /// Tank liquid is removed from.
        from: TankId,
        /// Tank liquid is added to.
        to: TankId,
        /// Pipe whose flow indicator this step drives.
        pipe: PipeId,
        /// Per-tick transfer quantum.
        quantum: f64,
    },
    /// 50/50 branch out of one tank into two destinations.
    ///
    /// If both destinations have headroom, `quantum` is removed once
    /// and the actually-removed amount is split evenly. If only one
    /// has headroom, the whole removed amount goes to that side —
    /// deliberate asymmetry that maximizes throughput when one branch
    /// is saturated. If neither has headroom, nothing moves.
    Branch {
        /// Tank liquid is removed from.
        from: TankId,
        /// Left destination.
        left: TankId,
        /// Pipe for the left destination.
        left_pipe: PipeId,
        /// Right destination.
        right: TankId,
        /// Pipe for the right destination.
        right_pipe: PipeId,
        /// Per-tick transfer quantum, shared across both destinations.
        quantum: f64,
    },
    /// Forced transfer, evaluated only while the pump flag is set.
    ///
    /// Same guard and flowing-flag convention as
    /// [`Gravity`](FlowStep::Gravity); the quantum is typically larger,
    /// modeling forced flow against gravity.
    Pump {
        /// Tank liquid is removed from.
        from: TankId,
        /// Tank liquid is added to.
        to: TankId,
        /// Pipe whose flow indicator this step drives.
        pipe: PipeId,
        /// Per-tick transfer quantum.
        quantum: f64,
    },
}

impl FlowStep {
    /// Pipes this step drives.
    fn pipes(&self) -> SmallVec<[PipeId; 2]> {
        match *self {
            Self::Gravity { pipe, .. } | Self::Pump { pipe, .. } => {
                SmallVec::from_slice(&[pipe])
            }
            Self::Branch {
                left_pipe,
                right_pipe,
                ..
            } => SmallVec::from_slice(&[left_pipe, right_pipe]),
        }
    }

    /// Tanks this step touches, source first.
    fn tanks(&self) -> SmallVec<[TankId; 3]> {
        match *self {
            Self::Gravity { from, to, .. } | Self::Pump { from, to, .. } => {
                SmallVec::from_slice(&[from, to])
            }
            Self::Branch {
                from, left, right, ..
            } => SmallVec::from_slice(&[from, left, right]),
        }
    }

    /// The step's transfer quantum.
    fn quantum(&self) -> f64 {
        match *self {
            Self::Gravity { quantum, .. }
            | Self::Branch { quantum, .. }
            | Self::Pump { quantum, .. } => quantum,
        }
    }

    /// Execute this step against the tank and pipe arrays.
    ///
    /// Returns the volume delivered per pipe (empty when the guard
    /// fails or, for [`Pump`](FlowStep::Pump) steps, while the pump is
    /// disabled). Arrays are indexed by `TankId::index` /
    /// `PipeId::index`.
    pub(crate) fn execute(
        &self,
        tanks: &mut [Tank; 5],
        pipes: &mut [Pipe; 5],
        pump_enabled: bool,
    ) -> StepFlows {
        let mut flows = StepFlows::new();
        match *self {
            Self::Gravity {
                from,
                to,
                pipe,
                quantum,
            } => {
                if !tanks[from.index()].is_empty() && !tanks[to.index()].is_full() {
                    let moved = tanks[from.index()].remove(quantum);
                    let delivered = tanks[to.index()].add(moved);
                    // Guard passed, so the edge is flowing regardless of
                    // how much the destination actually accepted.
                    pipes[pipe.index()].set_flowing(true);
                    flows.push((pipe, delivered));
                }
            }
            Self::Pump {
                from,
                to,
                pipe,
                quantum,
            } => {
                if pump_enabled
                    && !tanks[from.index()].is_empty()
                    && !tanks[to.index()].is_full()
                {
                    let moved = tanks[from.index()].remove(quantum);
                    let delivered = tanks[to.index()].add(moved);
                    pipes[pipe.index()].set_flowing(true);
                    flows.push((pipe, delivered));
                }
            }
            Self::Branch {
                from,
                left,
                left_pipe,
                right,
                right_pipe,
                quantum,
            } => {
                if tanks[from.index()].is_empty() {
                    return flows;
                }
                let left_open = !tanks[left.index()].is_full();
                let right_open = !tanks[right.index()].is_full();
                match (left_open, right_open) {
                    (true, true) => {
                        // Split the actually-removed amount so that what
                        // leaves the branch tank equals what arrives at
                        // the destinations.
                        let moved = tanks[from.index()].remove(quantum);
                        let half = moved / 2.0;
                        let left_delivered = tanks[left.index()].add(half);
                        let right_delivered = tanks[right.index()].add(half);
                        pipes[left_pipe.index()].set_flowing(true);
                        pipes[right_pipe.index()].set_flowing(true);
                        flows.push((left_pipe, left_delivered));
                        flows.push((right_pipe, right_delivered));
                    }
                    (true, false) => {
                        let moved = tanks[from.index()].remove(quantum);
                        let delivered = tanks[left.index()].add(moved);
                        pipes[left_pipe.index()].set_flowing(true);
                        flows.push((left_pipe, delivered));
                    }
                    (false, true) => {
                        let moved = tanks[from.index()].remove(quantum);
                        let delivered = tanks[right.index()].add(moved);
                        pipes[right_pipe.index()].set_flowing(true);
                        flows.push((right_pipe, delivered));
                    }
                    (false, false) => {}
                }
            }
        }
        flows
    }
}

// ── TopologyError ──────────────────────────────────────────────────

/// Errors detected while validating a flow-step list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TopologyError {
    /// The step list is empty.
    Empty,
    /// A pipe is driven by more than one step.
    DuplicatePipe {
        /// The pipe claimed twice.
        pipe: PipeId,
    },
    /// A pipe is driven by no step at all.
    UnclaimedPipe {
        /// The pipe nothing drives.
        pipe: PipeId,
    },
    /// A step transfers a tank into itself.
    SelfLoop {
        /// The tank appearing on both sides.
        tank: TankId,
    },
    /// A step quantum is non-finite or non-positive.
    InvalidQuantum {
        /// First pipe of the offending step.
        pipe: PipeId,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "flow-step list is empty"),
            Self::DuplicatePipe { pipe } => {
                write!(f, "pipe {pipe} is driven by more than one step")
            }
            Self::UnclaimedPipe { pipe } => {
                write!(f, "pipe {pipe} is driven by no step")
            }
            Self::SelfLoop { tank } => {
                write!(f, "tank {tank} transfers into itself")
            }
            Self::InvalidQuantum { pipe, value } => {
                write!(
                    f,
                    "step for pipe {pipe} has non-finite or non-positive quantum {value}"
                )
            }
        }
    }
}

impl Error for TopologyError {}

// ── Topology ───────────────────────────────────────────────────────

/// The validated, ordered flow program for one network.
///
/// Construction is the only mutation point; afterwards the step list
/// is fixed for the lifetime of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    steps: Vec<FlowStep>,
}

impl Topology {
    /// Validate and wrap a flow-step list.
    ///
    /// Structural checks: non-empty, every pipe driven by exactly one
    /// step, no self-loops, finite positive quanta.
    pub fn new(steps: Vec<FlowStep>) -> Result<Self, TopologyError> {
        if steps.is_empty() {
            return Err(TopologyError::Empty);
        }
        let mut claims = [0u8; 5];
        for step in &steps {
            let quantum = step.quantum();
            if !quantum.is_finite() || quantum <= 0.0 {
                return Err(TopologyError::InvalidQuantum {
                    pipe: step.pipes()[0],
                    value: quantum,
                });
            }
            let tanks = step.tanks();
            let source = tanks[0];
            for dest in &tanks[1..] {
                if *dest == source {
                    return Err(TopologyError::SelfLoop { tank: source });
                }
            }
            for pipe in step.pipes() {
                claims[pipe.index()] += 1;
            }
        }
        for pipe in PipeId::ALL {
            match claims[pipe.index()] {
                0 => return Err(TopologyError::UnclaimedPipe { pipe }),
                1 => {}
                _ => return Err(TopologyError::DuplicatePipe { pipe }),
            }
        }
        Ok(Self { steps })
    }

    /// The fixed reference network.
    ///
    /// Evaluation order is the fixed priority order: Source→A, A→B,
    /// the B→{C, D} branch, then the pump D→B closing the cycle.
    pub fn reference(config: &SimConfig) -> Result<Self, TopologyError> {
        Self::new(vec![
            FlowStep::Gravity {
                from: TankId::Source,
                to: TankId::A,
                pipe: PipeId::SourceToA,
                quantum: config.gravity_quantum,
            },
            FlowStep::Gravity {
                from: TankId::A,
                to: TankId::B,
                pipe: PipeId::AToB,
                quantum: config.gravity_quantum,
            },
            FlowStep::Branch {
                from: TankId::B,
                left: TankId::C,
                left_pipe: PipeId::BToC,
                right: TankId::D,
                right_pipe: PipeId::BToD,
                quantum: config.gravity_quantum,
            },
            FlowStep::Pump {
                from: TankId::D,
                to: TankId::B,
                pipe: PipeId::Pump,
                quantum: config.pump_quantum,
            },
        ])
    }

    /// The steps in evaluation order.
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }
}
