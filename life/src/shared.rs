//! The grid as seen by both the simulation worker and the display sampler.
//!
//! The worker is the only writer. It computes the next generation while holding a
//! read lock, so samplers are never blocked by the expensive part, and takes the
//! write lock only to swap the finished matrix in. A reader therefore always sees
//! one complete generation together with its own population and generation number.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{EngineError, Result};
use crate::grid::{Frame, Grid};

#[derive(Debug, Clone)]
pub struct SharedGrid {
    inner: Arc<RwLock<Grid>>,
}

impl SharedGrid {
    pub fn new(grid: Grid) -> Self {
        SharedGrid {
            inner: Arc::new(RwLock::new(grid)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Grid>> {
        self.inner.read().map_err(|_| EngineError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Grid>> {
        self.inner.write().map_err(|_| EngineError::LockPoisoned)
    }

    /// Advance one generation and publish it. Must only be called from one thread at a time.
    pub fn tick(&self) -> Result<u64> {
        let next = self.read()?.next_generation();
        Ok(self.write()?.publish(next))
    }

    pub fn snapshot(&self, dest: &mut Frame) -> Result<()> {
        self.read()?.snapshot(dest)
    }

    pub fn verify(&self) -> Result<()> {
        self.read()?.verify()
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.read()?.size())
    }

    pub fn generation(&self) -> Result<u64> {
        Ok(self.read()?.generation())
    }

    pub fn population(&self) -> Result<usize> {
        Ok(self.read()?.population())
    }

    #[cfg(test)]
    fn fingerprint(&self) -> Result<u64> {
        Ok(self.read()?.fingerprint())
    }
}
