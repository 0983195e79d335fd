pub mod gate;
pub mod naming;
pub mod outcome;
pub mod runner;

pub use gate::{GateGuard, TriggerGate};
pub use naming::unique_output_path;
pub use outcome::{BatchEvent, BatchSummary, ItemOutcome, ItemStatus};
pub use runner::{BatchHandle, BatchRunner};
