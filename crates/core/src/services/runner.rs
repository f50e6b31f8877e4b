use std::fs;
use std::io;

use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::JobDescriptor;
use crate::services::compare::{CompareRequest, ComparisonTool};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// What to do with the output file when the comparison tool fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Delete the output so the job is retried on the next run.
    #[default]
    Discard,
    /// Leave whatever the tool wrote; the job counts as done on the next run.
    Keep,
}

/// Terminal state of a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Ground-truth table absent; the binary never went through that stage.
    MissingGroundTruth,
    /// Reassembled table absent; the reassembly stage has not run yet.
    NotReady,
    /// Output file already present.
    AlreadyDone,
    Completed,
    Failed(String),
}

/// A job that ended in [`JobOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    pub variant: String,
    pub binary: String,
    pub reason: String,
}

/// Per-outcome counts for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub already_done: usize,
    pub missing_ground_truth: usize,
    pub not_ready: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedJob>,
    pub started_at: String,
    pub finished_at: String,
}

impl RunSummary {
    fn record(&mut self, job: &JobDescriptor, outcome: &JobOutcome) {
        self.total += 1;
        match outcome {
            JobOutcome::MissingGroundTruth => self.missing_ground_truth += 1,
            JobOutcome::NotReady => self.not_ready += 1,
            JobOutcome::AlreadyDone => self.already_done += 1,
            JobOutcome::Completed => self.completed += 1,
            JobOutcome::Failed(reason) => {
                self.failed += 1;
                self.failures.push(FailedJob {
                    variant: job.variant.flat_name(),
                    binary: job.binary_name.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Number of comparison tool invocations performed.
    pub fn invocations(&self) -> usize {
        self.completed + self.failed
    }
}

/// Executes comparison jobs with skip-if-done semantics.
///
/// Jobs share no state beyond the filesystem, so they may run in any order.
pub struct JobRunner<'a> {
    pub tool: &'a dyn ComparisonTool,
    /// Worker count; `<= 1` runs sequentially in enumeration order.
    pub workers: usize,
    pub failure_policy: FailurePolicy,
}

impl<'a> JobRunner<'a> {
    pub fn new(tool: &'a dyn ComparisonTool) -> Self {
        Self { tool, workers: 1, failure_policy: FailurePolicy::default() }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Run every job. Individual job failures are reported in the summary, never returned.
    pub fn run(&self, jobs: &[JobDescriptor]) -> Result<RunSummary, RunnerError> {
        let started_at = Utc::now().to_rfc3339();

        let outcomes: Vec<JobOutcome> = if self.workers > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .thread_name(|idx| format!("tablecmp-worker-{idx}"))
                .build()?;
            pool.install(|| jobs.par_iter().map(|job| self.run_job(job)).collect())
        } else {
            jobs.iter().map(|job| self.run_job(job)).collect()
        };

        let mut summary = RunSummary { started_at, ..RunSummary::default() };
        for (job, outcome) in jobs.iter().zip(&outcomes) {
            summary.record(job, outcome);
        }
        summary.finished_at = Utc::now().to_rfc3339();
        Ok(summary)
    }

    /// Run a single job to completion.
    pub fn run_job(&self, job: &JobDescriptor) -> JobOutcome {
        let ground_truth = job.ground_truth_table();
        if !ground_truth.exists() {
            tracing::debug!(path = %ground_truth.display(), "ground truth missing");
            return JobOutcome::MissingGroundTruth;
        }

        let reassembled = job.reassembled_table();
        if !reassembled.exists() {
            tracing::debug!(path = %reassembled.display(), "reassembled table missing");
            return JobOutcome::NotReady;
        }

        let output_dir = job.output_dir();
        if let Err(e) = fs::create_dir_all(&output_dir) {
            let reason = format!("Failed to create output dir {}: {e}", output_dir.display());
            tracing::warn!(binary = %job.binary_name, "{reason}");
            return JobOutcome::Failed(reason);
        }

        let output = job.output_file();
        if output.exists() {
            tracing::debug!(path = %output.display(), "already compared, skipping");
            return JobOutcome::AlreadyDone;
        }

        let request = CompareRequest {
            ground_truth: &ground_truth,
            reassembled: &reassembled,
            output: &output,
        };
        tracing::info!(command = %self.tool.describe(&request), "running comparison");

        match self.tool.compare(&request) {
            Ok(()) => JobOutcome::Completed,
            Err(e) => {
                tracing::warn!(
                    binary = %job.binary_name,
                    variant = %job.variant.flat_name(),
                    error = %e,
                    "comparison failed"
                );
                if self.failure_policy == FailurePolicy::Discard {
                    if let Err(rm) = fs::remove_file(&output) {
                        if rm.kind() != io::ErrorKind::NotFound {
                            tracing::warn!(path = %output.display(), error = %rm, "failed to discard partial output");
                        }
                    }
                }
                JobOutcome::Failed(e.to_string())
            }
        }
    }
}
