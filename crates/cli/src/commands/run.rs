use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tablecmp_core::config::OptionGrid;
use tablecmp_core::enumerator::{BinaryFilter, JobEnumerator};
use tablecmp_core::exclusion::{ExcludeList, ExclusionPredicate, NoExclusions};
use tablecmp_core::layout::{
    BenchmarkLayout, DEFAULT_GROUND_TRUTH_BASE, DEFAULT_INPUT_BASE, DEFAULT_OUTPUT_BASE,
    DEFAULT_REASSEMBLY_BASE,
};
use tablecmp_core::model::{Dataset, JobDescriptor, Package};
use tablecmp_core::services::compare::{DEFAULT_ARGS, DEFAULT_PROGRAM};
use tablecmp_core::services::{ExternalTool, FailurePolicy, JobRunner, RunSummary};

/// Everything the run command needs, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dataset: Dataset,
    pub input_dir: PathBuf,
    /// Base of the reassembler output.
    pub output_dir: PathBuf,
    pub gt_dir: PathBuf,
    pub stat_dir: PathBuf,
    pub package: Option<String>,
    pub workers: usize,
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    pub exclude_file: Option<PathBuf>,
    pub grid_file: Option<PathBuf>,
    pub compare_program: PathBuf,
    pub compare_args: Vec<String>,
    pub keep_failed_output: bool,
    pub dry_run: bool,
    pub json: bool,
}

impl RunOptions {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            input_dir: PathBuf::from(DEFAULT_INPUT_BASE),
            output_dir: PathBuf::from(DEFAULT_REASSEMBLY_BASE),
            gt_dir: PathBuf::from(DEFAULT_GROUND_TRUTH_BASE),
            stat_dir: PathBuf::from(DEFAULT_OUTPUT_BASE),
            package: None,
            workers: 1,
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            exclude_file: None,
            grid_file: None,
            compare_program: PathBuf::from(DEFAULT_PROGRAM),
            compare_args: DEFAULT_ARGS.iter().map(|a| a.to_string()).collect(),
            keep_failed_output: false,
            dry_run: false,
            json: false,
        }
    }

    pub fn layout(&self) -> BenchmarkLayout {
        BenchmarkLayout::for_dataset(
            self.dataset,
            &self.input_dir,
            &self.output_dir,
            &self.gt_dir,
            &self.stat_dir,
        )
    }
}

/// Result of one package: the job list on a dry run, otherwise the run summary.
#[derive(Debug, Serialize)]
pub struct PackageReport {
    pub package: Package,
    pub dataset: Dataset,
    pub job_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<JobDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
}

/// Resolve which packages to process. An unknown name yields an empty selection.
pub fn select_packages(requested: Option<&str>) -> Vec<Package> {
    match requested {
        None => Package::ALL.to_vec(),
        Some(name) => match name.parse::<Package>() {
            Ok(package) => vec![package],
            Err(e) => {
                tracing::info!("{e}; nothing to do");
                Vec::new()
            }
        },
    }
}

/// Enumerate and run comparison jobs for the selected packages.
pub fn run_command(opts: &RunOptions) -> Result<Vec<PackageReport>> {
    let packages = select_packages(opts.package.as_deref());
    if packages.is_empty() {
        return Ok(Vec::new());
    }

    let layout = opts.layout();
    let grid = match &opts.grid_file {
        Some(path) => OptionGrid::load(path)?,
        None => OptionGrid::default(),
    };
    let exclusion: Box<dyn ExclusionPredicate> = match &opts.exclude_file {
        Some(path) => Box::new(ExcludeList::load(path)?),
        None => Box::new(NoExclusions),
    };
    let filter = BinaryFilter::new(
        Some(crate::split_names(&opts.blacklist)),
        Some(crate::split_names(&opts.whitelist)),
    );
    let enumerator = JobEnumerator {
        layout: &layout,
        grid: &grid,
        filter: &filter,
        exclusion: exclusion.as_ref(),
    };

    let tool = ExternalTool::new(&opts.compare_program, opts.compare_args.clone());
    let policy =
        if opts.keep_failed_output { FailurePolicy::Keep } else { FailurePolicy::Discard };
    let runner = JobRunner::new(&tool).with_workers(opts.workers).with_failure_policy(policy);

    let mut reports = Vec::with_capacity(packages.len());
    for package in packages {
        let jobs = enumerator.enumerate(package);
        tracing::info!(package = %package, dataset = %opts.dataset, jobs = jobs.len(), "enumerated");

        let report = if opts.dry_run {
            PackageReport {
                package,
                dataset: opts.dataset,
                job_count: jobs.len(),
                jobs: Some(jobs),
                summary: None,
            }
        } else {
            let summary = runner
                .run(&jobs)
                .with_context(|| format!("Failed to run jobs for {package}"))?;
            PackageReport {
                package,
                dataset: opts.dataset,
                job_count: jobs.len(),
                jobs: None,
                summary: Some(summary),
            }
        };

        if !opts.json {
            print_report(&report);
        }
        reports.push(report);
    }

    if opts.json {
        let serialized =
            serde_json::to_string_pretty(&reports).context("Failed to serialize run report")?;
        println!("{}", serialized);
    }

    Ok(reports)
}

fn print_report(report: &PackageReport) {
    println!("Package {} ({}): {} jobs", report.package, report.dataset, report.job_count);

    if let Some(jobs) = &report.jobs {
        if jobs.is_empty() {
            println!("  (none)");
        }
        for job in jobs {
            println!(
                "  - {} {} -> {}",
                job.variant.flat_name(),
                job.binary_name,
                job.output_file().display()
            );
        }
    }

    if let Some(summary) = &report.summary {
        println!(
            "  completed: {}, already done: {}, missing ground truth: {}, not ready: {}, failed: {}",
            summary.completed,
            summary.already_done,
            summary.missing_ground_truth,
            summary.not_ready,
            summary.failed
        );
        for failure in &summary.failures {
            println!("  ! {} {}: {}", failure.variant, failure.binary, failure.reason);
        }
    }
}
