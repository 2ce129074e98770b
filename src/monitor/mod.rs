//! Poll loop module
//!
//! Drives detection cycles on a fixed interval with a back-off after failures

mod runner;
mod types;

pub use runner::Monitor;
pub use types::{CycleReport, Detection, LoopState, LoopTiming, RunSummary};
