//! Fixed-cadence background driver for a [`Simulation`].
//!
//! The driver thread owns the simulation exclusively (moved in via
//! `thread::spawn`); control messages arrive over a bounded crossbeam
//! channel and snapshots go back via per-request reply channels. The
//! loop ticks only while the simulation is Running — the Stopped state
//! halts tick invocation without touching simulation state.
//!
//! On shutdown the simulation is recovered through the join handle, so
//! a caller can inspect (or restart) the final state.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use sluice_core::{SimSnapshot, TankId};

use crate::simulation::Simulation;

// ── DriverConfig ───────────────────────────────────────────────────

/// Configuration for [`RealtimeDriver`].
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Target interval between ticks while Running. Default: 20 ms,
    /// the reference cadence.
    pub tick_interval: Duration,
    /// Capacity of the bounded control channel. Default: 64.
    pub control_queue: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(20),
            control_queue: 64,
        }
    }
}

impl DriverConfig {
    /// Validate the driver configuration.
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.tick_interval.is_zero() {
            return Err(DriverError::ZeroInterval);
        }
        if self.control_queue == 0 {
            return Err(DriverError::ZeroControlQueue);
        }
        Ok(())
    }
}

// ── DriverError ────────────────────────────────────────────────────

/// Errors from spawning or communicating with the driver thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverError {
    /// `tick_interval` is zero; the loop would spin.
    ZeroInterval,
    /// `control_queue` is zero; no command could ever be submitted.
    ZeroControlQueue,
    /// The OS refused to spawn the driver thread.
    SpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
    /// The driver thread is gone; the control channel is closed.
    Disconnected,
    /// The driver thread panicked; the simulation cannot be recovered.
    ThreadPanicked,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval => write!(f, "tick_interval must be non-zero"),
            Self::ZeroControlQueue => write!(f, "control_queue must be at least 1"),
            Self::SpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::Disconnected => write!(f, "driver thread disconnected"),
            Self::ThreadPanicked => write!(f, "driver thread panicked"),
        }
    }
}

impl Error for DriverError {}

// ── Control messages ───────────────────────────────────────────────

/// A control message submitted by a user thread.
enum ControlMsg {
    Start,
    Stop,
    SetPump(bool),
    Fill(TankId),
    Drain(TankId),
    Snapshot {
        /// Reply channel for the resulting snapshot.
        reply: Sender<SimSnapshot>,
    },
}

// ── RealtimeDriver ─────────────────────────────────────────────────

/// Handle to a background thread ticking a [`Simulation`] at a fixed
/// cadence while it is Running.
///
/// All methods are cheap message sends; the thread applies them before
/// its next tick. Dropping the handle without calling
/// [`shutdown()`](RealtimeDriver::shutdown) detaches the thread, which
/// then exits on its next iteration once the channel disconnects.
pub struct RealtimeDriver {
    ctrl_tx: Sender<ControlMsg>,
    shutdown_flag: Arc<AtomicBool>,
    handle: JoinHandle<Simulation>,
}

impl RealtimeDriver {
    /// Move `sim` into a new driver thread.
    ///
    /// The simulation keeps whatever run state it had; ticking begins
    /// only once it is Running (via [`start()`](RealtimeDriver::start)
    /// or because it was started before the move).
    pub fn spawn(sim: Simulation, config: DriverConfig) -> Result<Self, DriverError> {
        config.validate()?;
        let (ctrl_tx, ctrl_rx) = bounded(config.control_queue);
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let state = DriverLoop {
            sim,
            ctrl_rx,
            shutdown_flag: Arc::clone(&shutdown_flag),
            tick_budget: config.tick_interval,
        };
        let handle = std::thread::Builder::new()
            .name("sluice-tick".into())
            .spawn(move || state.run())
            .map_err(|e| DriverError::SpawnFailed {
                reason: e.to_string(),
            })?;
        Ok(Self {
            ctrl_tx,
            shutdown_flag,
            handle,
        })
    }

    /// Enter the Running state; the thread begins ticking.
    pub fn start(&self) -> Result<(), DriverError> {
        self.send(ControlMsg::Start)
    }

    /// Enter the Stopped state; the thread halts ticking.
    pub fn stop(&self) -> Result<(), DriverError> {
        self.send(ControlMsg::Stop)
    }

    /// Toggle the pump edge, effective on the next tick.
    pub fn set_pump(&self, enabled: bool) -> Result<(), DriverError> {
        self.send(ControlMsg::SetPump(enabled))
    }

    /// Manual override: set `tank` to exactly its capacity.
    pub fn fill(&self, tank: TankId) -> Result<(), DriverError> {
        self.send(ControlMsg::Fill(tank))
    }

    /// Manual override: set `tank` to exactly zero.
    pub fn drain(&self, tank: TankId) -> Result<(), DriverError> {
        self.send(ControlMsg::Drain(tank))
    }

    /// Request a snapshot of the current state.
    ///
    /// Blocks until the thread services the request — at most one tick
    /// interval plus the tick itself.
    pub fn snapshot(&self) -> Result<SimSnapshot, DriverError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(ControlMsg::Snapshot { reply: reply_tx })?;
        reply_rx.recv().map_err(|_| DriverError::Disconnected)
    }

    /// Stop the thread and recover the simulation.
    pub fn shutdown(self) -> Result<Simulation, DriverError> {
        self.shutdown_flag.store(true, Ordering::Release);
        self.handle.join().map_err(|_| DriverError::ThreadPanicked)
    }

    fn send(&self, msg: ControlMsg) -> Result<(), DriverError> {
        self.ctrl_tx
            .send(msg)
            .map_err(|_| DriverError::Disconnected)
    }
}

impl fmt::Debug for RealtimeDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeDriver")
            .field("shutdown", &self.shutdown_flag.load(Ordering::Acquire))
            .finish()
    }
}

// ── DriverLoop ─────────────────────────────────────────────────────

/// State owned by the driver thread's main loop.
struct DriverLoop {
    sim: Simulation,
    ctrl_rx: Receiver<ControlMsg>,
    shutdown_flag: Arc<AtomicBool>,
    tick_budget: Duration,
}

impl DriverLoop {
    /// Main loop. Runs until the shutdown flag is set or every handle
    /// is gone. Consumes self and returns the `Simulation` so the
    /// caller can recover it through the join handle.
    fn run(mut self) -> Simulation {
        loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                break;
            }
            let iteration_start = Instant::now();

            if self.drain_control() {
                break; // all handles dropped
            }

            if self.sim.is_running() {
                self.sim.tick();
            }

            let elapsed = iteration_start.elapsed();
            if let Some(remaining) = self.tick_budget.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        self.sim
    }

    /// Apply all pending control messages. Returns `true` when the
    /// channel is disconnected.
    fn drain_control(&mut self) -> bool {
        loop {
            match self.ctrl_rx.try_recv() {
                Ok(ControlMsg::Start) => self.sim.start(),
                Ok(ControlMsg::Stop) => self.sim.stop(),
                Ok(ControlMsg::SetPump(enabled)) => self.sim.set_pump(enabled),
                Ok(ControlMsg::Fill(tank)) => self.sim.fill(tank),
                Ok(ControlMsg::Drain(tank)) => self.sim.drain(tank),
                Ok(ControlMsg::Snapshot { reply }) => {
                    // Best-effort reply; the caller may have given up.
                    let _ = reply.send(self.sim.snapshot());
                }
                Err(crossbeam_channel::TryRecvError::Empty) => return false,
                Err(crossbeam_channel::TryRecvError::Disconnected) => return true,
            }
        }
    }
}
