use std::error::Error;

/// Rejected grid or session parameters. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size must be non-zero")]
    ZeroSize,
    #[error("Density must lie in [0, 1], got {0}")]
    DensityOutOfRange(f64),
    #[error("Cycle history capacity must be non-zero")]
    ZeroHistory,
    #[error("Grid must be square: {rows} rows but row {row} has {len} cells")]
    NotSquare { rows: usize, row: usize, len: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The grid's cached counters disagree with its matrix. Fatal to the run.
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("Snapshot buffer is {actual}x{actual}, grid is {expected}x{expected}")]
    SnapshotSize { expected: usize, actual: usize },

    #[error("Grid lock poisoned by a panicking thread")]
    LockPoisoned,

    #[error("Simulation worker panicked")]
    WorkerPanicked,

    #[error("Failed to spawn simulation worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Render callback failed: {0}")]
    Render(#[source] Box<dyn Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, EngineError>;
