//! The simulation worker: ticks the shared grid as fast as it can on its own thread.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::cycle::CycleDetector;
use crate::error::{EngineError, Result};
use crate::shared::SharedGrid;

const THROUGHPUT_LOG_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
    CycleDetected,
    Failed,
}

impl DriverState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => DriverState::Running,
            2 => DriverState::Stopped,
            3 => DriverState::CycleDetected,
            4 => DriverState::Failed,
            _ => DriverState::Idle,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DriverState::Stopped | DriverState::CycleDetected | DriverState::Failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Someone called [`Driver::stop`].
    Stopped,
    /// A fingerprint came back within the detector's window.
    CycleDetected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub reason: StopReason,
    /// Generation of the grid when the worker exited.
    pub generation: u64,
    /// Ticks performed by this run.
    pub ticks: u64,
}

#[derive(Debug)]
struct Control {
    stop: AtomicBool,
    state: AtomicU8,
}

impl Control {
    fn set_state(&self, state: DriverState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Handle to a running simulation worker. Dropping it stops and joins the worker.
#[derive(Debug)]
pub struct Driver {
    control: Arc<Control>,
    handle: Option<JoinHandle<Result<RunOutcome>>>,
}

impl Driver {
    /// Start ticking `grid` on a dedicated thread with a fresh cycle detector.
    pub fn spawn(grid: SharedGrid, config: &SessionConfig) -> Result<Self> {
        let control = Arc::new(Control {
            stop: AtomicBool::new(false),
            state: AtomicU8::new(DriverState::Running as u8),
        });
        let worker = Worker {
            grid,
            detector: CycleDetector::new(config.history_capacity),
            verify: config.verify_invariants,
            control: Arc::clone(&control),
        };

        let handle = thread::Builder::new()
            .name("life-driver".into())
            .spawn(move || worker.run())?;

        Ok(Driver {
            control,
            handle: Some(handle),
        })
    }

    /// Ask the worker to exit after the tick in progress. Safe to call repeatedly.
    pub fn stop(&self) {
        self.control.stop.store(true, Ordering::Release);
    }

    pub fn state(&self) -> DriverState {
        DriverState::from_u8(self.control.state.load(Ordering::Acquire))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the worker to exit. Does not stop it; call [`Driver::stop`] first
    /// unless the run is expected to end on its own.
    pub fn join(mut self) -> Result<RunOutcome> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<RunOutcome> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| EngineError::WorkerPanicked)?,
            None => Err(EngineError::WorkerPanicked),
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
            if let Err(err) = self.join_inner() {
                log::warn!("simulation worker ended with error: {err}");
            }
        }
    }
}

struct Worker {
    grid: SharedGrid,
    detector: CycleDetector,
    verify: bool,
    control: Arc<Control>,
}

impl Worker {
    fn run(mut self) -> Result<RunOutcome> {
        let result = self.run_loop();
        match &result {
            Ok(outcome) => {
                let state = match outcome.reason {
                    StopReason::Stopped => DriverState::Stopped,
                    StopReason::CycleDetected => DriverState::CycleDetected,
                };
                self.control.set_state(state);
                log::info!(
                    "run ended at generation {} after {} ticks: {:?}",
                    outcome.generation,
                    outcome.ticks,
                    outcome.reason
                );
            }
            Err(err) => {
                self.control.set_state(DriverState::Failed);
                log::warn!("run failed: {err}");
            }
        }
        result
    }

    fn run_loop(&mut self) -> Result<RunOutcome> {
        self.detector.reset();
        log::info!(
            "run started at generation {} (history {})",
            self.grid.generation()?,
            self.detector.capacity()
        );

        let mut reason = StopReason::Stopped;
        let mut ticks = 0;
        let mut window_ticks = 0u64;
        let mut window_start = Instant::now();

        while !self.control.stop.load(Ordering::Acquire) {
            let fingerprint = self.grid.tick()?;
            ticks += 1;
            if self.verify {
                self.grid.verify()?;
            }
            if self.detector.observe(fingerprint) {
                reason = StopReason::CycleDetected;
                break;
            }

            window_ticks += 1;
            let elapsed = window_start.elapsed();
            if elapsed >= THROUGHPUT_LOG_INTERVAL {
                log::debug!(
                    "generations/s: {:.1}",
                    window_ticks as f64 / elapsed.as_secs_f64()
                );
                window_ticks = 0;
                window_start = Instant::now();
            }
        }

        Ok(RunOutcome {
            reason,
            generation: self.grid.generation()?,
            ticks,
        })
    }
}
