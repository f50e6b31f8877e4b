//! Side-effecting services: the external comparison tool and the job runner.

pub mod compare;
pub mod runner;

pub use compare::{CompareError, CompareRequest, ComparisonTool, ExternalTool};
pub use runner::{FailurePolicy, JobOutcome, JobRunner, RunSummary, RunnerError};
