//! One simulation session: the current world, the worker advancing it and the
//! sampler showing it. This is the whole surface the presentation layer uses.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SessionConfig;
use crate::driver::{Driver, DriverState, RunOutcome, StopReason};
use crate::error::Result;
use crate::grid::{Frame, Grid};
use crate::sampler::{DisplaySampler, Observer};
use crate::shared::SharedGrid;

#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    rng: StdRng,
    grid: SharedGrid,
    driver: Option<Driver>,
    sampler: DisplaySampler,
    last_outcome: Option<RunOutcome>,
}

impl Session {
    /// Seed a fresh world. Nothing runs until [`Session::resume`] or [`Session::start`].
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let grid = Grid::random(config.size, config.density, &mut rng)?;
        let mut sampler = DisplaySampler::new(config.size);
        sampler.request_redraw();

        Ok(Session {
            config,
            rng,
            grid: SharedGrid::new(grid),
            driver: None,
            sampler,
            last_outcome: None,
        })
    }

    /// Stop any run, then replace the world with a freshly seeded one.
    ///
    /// An invalid `config` is rejected before anything is stopped or replaced. If
    /// the stopped run had failed its error is returned and the old world is kept.
    pub fn reset(&mut self, config: SessionConfig) -> Result<()> {
        config.validate()?;
        self.stop()?;

        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let grid = Grid::random(config.size, config.density, &mut self.rng)?;
        if config.size == self.sampler.frame().size() {
            self.sampler.clear();
        } else {
            self.sampler = DisplaySampler::new(config.size);
        }
        log::info!(
            "world reset: {0}x{0} at density {1:.2}, population {2}",
            config.size,
            config.density,
            grid.population()
        );

        self.grid = SharedGrid::new(grid);
        self.config = config;
        self.last_outcome = None;
        self.sampler.request_redraw();
        Ok(())
    }

    /// Reset with `config` and begin running.
    pub fn start(&mut self, config: SessionConfig) -> Result<()> {
        self.reset(config)?;
        self.resume()
    }

    /// Run the current world from where it is. Does nothing if already running.
    pub fn resume(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        self.reap()?;
        // A notice owed by a run nobody sampled must not be reported for this one.
        self.sampler.clear();
        self.driver = Some(Driver::spawn(self.grid.clone(), &self.config)?);
        Ok(())
    }

    /// Stop the current run and wait for the worker, so no tick happens after this
    /// returns. Returns `None` if nothing was running.
    pub fn stop(&mut self) -> Result<Option<RunOutcome>> {
        match self.driver.take() {
            Some(driver) => {
                driver.stop();
                self.finish(driver).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Host refresh hook. Delivers the current generation while running, and the
    /// cycle notice plus a final frame once a run has ended.
    pub fn sample<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Result<bool> {
        self.reap()?;
        let running = self.driver.is_some();
        self.sampler.sample(&self.grid, running, observer)
    }

    /// Collect a worker that ended on its own.
    fn reap(&mut self) -> Result<()> {
        if self.driver.as_ref().is_some_and(Driver::is_finished) {
            if let Some(driver) = self.driver.take() {
                self.finish(driver)?;
            }
        }
        Ok(())
    }

    fn finish(&mut self, driver: Driver) -> Result<RunOutcome> {
        match driver.join() {
            Ok(outcome) => {
                self.sampler
                    .request_final(outcome.reason == StopReason::CycleDetected);
                self.last_outcome = Some(outcome);
                Ok(outcome)
            }
            Err(err) => {
                self.sampler.request_final(false);
                self.last_outcome = None;
                Err(err)
            }
        }
    }

    /// True while a worker is ticking. Turns false as soon as a cycle stops it,
    /// before the sampler has delivered the final frame.
    pub fn is_running(&self) -> bool {
        self.state() == DriverState::Running
    }

    /// Whether the host should keep calling [`Session::sample`].
    pub fn needs_redraw(&self) -> bool {
        self.driver.is_some() || self.sampler.has_pending()
    }

    pub fn state(&self) -> DriverState {
        match &self.driver {
            Some(driver) => driver.state(),
            None => match self.last_outcome {
                Some(RunOutcome {
                    reason: StopReason::CycleDetected,
                    ..
                }) => DriverState::CycleDetected,
                Some(_) => DriverState::Stopped,
                None => DriverState::Idle,
            },
        }
    }

    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn generation(&self) -> Result<u64> {
        self.grid.generation()
    }

    pub fn population(&self) -> Result<usize> {
        self.grid.population()
    }

    /// The frame most recently handed to an observer.
    pub fn frame(&self) -> &Frame {
        self.sampler.frame()
    }
}
