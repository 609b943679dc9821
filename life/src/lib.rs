/*!
* A live cell dies if it has fewer than two live neighbors.
* A live cell with two or three live neighbors lives on to the next generation.
* A live cell with more than three live neighbors dies.
* A dead cell will be brought back to live if it has exactly three live neighbors.
*
* The world is a square torus: every edge wraps to the opposite one, so every cell
* has exactly eight neighbors.
*/

pub mod config;
pub mod cycle;
pub mod driver;
pub mod error;
pub mod grid;
pub mod sampler;
pub mod session;
pub mod shared;

pub use config::SessionConfig;
pub use cycle::CycleDetector;
pub use driver::{Driver, DriverState, RunOutcome, StopReason};
pub use error::{ConfigError, EngineError};
pub use grid::{CellState, Frame, Grid};
pub use sampler::{CallbackResult, Callbacks, DisplaySampler, Observer};
pub use session::Session;
pub use shared::SharedGrid;
