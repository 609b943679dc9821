//! Parameters for one simulation session.

use crate::error::ConfigError;

/// Side length used when nothing else is configured.
pub const DEFAULT_SIZE: usize = 500;
/// Number of recent fingerprints kept by the cycle detector.
pub const DEFAULT_HISTORY_CAPACITY: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Side length of the square world in cells.
    pub size: usize,
    /// Probability that a cell starts alive, in `[0, 1]`.
    pub density: f64,
    /// Seed for the initial random fill. `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// How many generations back the cycle detector looks. Cycles longer than
    /// this are not detected.
    pub history_capacity: usize,
    /// Recount population and fingerprint after every tick.
    pub verify_invariants: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            density: 0.5,
            seed: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            verify_invariants: false,
        }
    }
}

impl SessionConfig {
    pub fn new(size: usize, density: f64) -> Self {
        Self {
            size,
            density,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grid(self.size, self.density)?;
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        Ok(())
    }
}

pub(crate) fn validate_grid(size: usize, density: f64) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroSize);
    }
    // NaN fails the range check too.
    if !(0.0..=1.0).contains(&density) {
        return Err(ConfigError::DensityOutOfRange(density));
    }
    Ok(())
}
