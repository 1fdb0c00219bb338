pub mod controller;
pub mod payload;
pub mod phase;
pub mod reconcile;

pub use controller::{Endpoint, SubmissionController, SubmissionError, SubmissionOutcome};
pub use phase::SubmissionPhase;
