//! Rate-limited reader that hands published generations to the presentation layer.
//!
//! The host calls [`DisplaySampler::sample`] from its refresh signal. The sampler
//! does not follow the worker generation by generation: it may show the same
//! generation twice or skip many.

use std::error::Error;

use crate::error::{EngineError, Result};
use crate::grid::Frame;
use crate::shared::SharedGrid;

pub type CallbackResult = std::result::Result<(), Box<dyn Error + Send + Sync>>;

/// What the engine calls back into. Implemented by whoever draws the world.
pub trait Observer {
    /// A consistent copy of one generation, at the host's cadence and once more
    /// after every stop.
    fn on_generation(&mut self, frame: &Frame) -> CallbackResult;

    /// The run ended because the world started repeating. Called once per such
    /// run, before the final [`Observer::on_generation`].
    fn on_cycle_detected(&mut self) -> CallbackResult {
        Ok(())
    }
}

type GenerationCallback = Box<dyn FnMut(&Frame) -> CallbackResult>;
type CycleCallback = Box<dyn FnMut() -> CallbackResult>;

/// Closure-backed [`Observer`].
#[derive(Default)]
pub struct Callbacks {
    generation: Option<GenerationCallback>,
    cycle: Option<CycleCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_generation(
        mut self,
        callback: impl FnMut(&Frame) -> CallbackResult + 'static,
    ) -> Self {
        self.generation = Some(Box::new(callback));
        self
    }

    pub fn on_cycle_detected(mut self, callback: impl FnMut() -> CallbackResult + 'static) -> Self {
        self.cycle = Some(Box::new(callback));
        self
    }
}

impl Observer for Callbacks {
    fn on_generation(&mut self, frame: &Frame) -> CallbackResult {
        match self.generation.as_mut() {
            Some(callback) => callback(frame),
            None => Ok(()),
        }
    }

    fn on_cycle_detected(&mut self) -> CallbackResult {
        match self.cycle.as_mut() {
            Some(callback) => callback(),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct DisplaySampler {
    frame: Frame,
    final_frame: bool,
    cycle_detected: bool,
}

impl DisplaySampler {
    pub fn new(size: usize) -> Self {
        DisplaySampler {
            frame: Frame::for_size(size),
            final_frame: false,
            cycle_detected: false,
        }
    }

    /// The most recently delivered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Schedule one frame for the next [`DisplaySampler::sample`] even if nothing is running.
    pub fn request_redraw(&mut self) {
        self.final_frame = true;
    }

    /// Schedule the final frame of a run, preceded by the cycle notification if `cycle`.
    pub fn request_final(&mut self, cycle: bool) {
        self.final_frame = true;
        self.cycle_detected |= cycle;
    }

    /// Drop anything owed from an earlier run.
    pub fn clear(&mut self) {
        self.final_frame = false;
        self.cycle_detected = false;
    }

    pub fn has_pending(&self) -> bool {
        self.final_frame
    }

    /// Deliver a frame if a run is active or a final frame is owed. Returns whether
    /// the observer was called.
    pub fn sample<O: Observer + ?Sized>(
        &mut self,
        grid: &SharedGrid,
        running: bool,
        observer: &mut O,
    ) -> Result<bool> {
        if !running && !self.final_frame {
            return Ok(false);
        }
        if !running {
            self.final_frame = false;
            if std::mem::take(&mut self.cycle_detected) {
                observer.on_cycle_detected().map_err(EngineError::Render)?;
            }
        }

        grid.snapshot(&mut self.frame)?;
        observer.on_generation(&self.frame).map_err(EngineError::Render)?;
        Ok(true)
    }
}
