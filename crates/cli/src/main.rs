use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use table_compare::commands::{run_command, RunOptions};
use table_compare::{init_tracing, parse_dataset};
use tablecmp_core::model::Dataset;

/// Compare ground-truth and reassembled function tables across a benchmark corpus.
///
/// This CLI is a thin wrapper around `tablecmp-core` (exposed in code as `tablecmp_core`).
/// Jobs whose result file already exists are skipped, so interrupted runs can
/// simply be restarted.
#[derive(Parser, Debug)]
#[command(
    name = "table-compare",
    version,
    about = "Batch function-table comparison driver",
    long_about = None
)]
struct Cli {
    /// Dataset to process (setA or setC).
    #[arg(value_parser = parse_dataset)]
    dataset: Dataset,

    /// Base directory of the benchmark binaries; the dataset tag is appended.
    #[arg(long, default_value = "benchmark")]
    input_dir: PathBuf,

    /// Base directory of the reassembler output; the dataset tag is appended.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Base directory of the ground-truth tables; the dataset tag is appended.
    #[arg(long, default_value = "gt")]
    gt_dir: PathBuf,

    /// Base directory for comparison results; the dataset tag is appended.
    #[arg(long, default_value = "stat/table")]
    stat_dir: PathBuf,

    /// Package to process. All known packages run when omitted.
    #[arg(long)]
    package: Option<String>,

    /// Number of parallel workers. 1 runs jobs sequentially.
    #[arg(long, default_value_t = 1)]
    core: usize,

    /// Binary names to skip.
    #[arg(long, num_args = 1..)]
    blacklist: Vec<String>,

    /// Only process these binary names.
    #[arg(long, num_args = 1..)]
    whitelist: Vec<String>,

    /// YAML or JSON file with per-dataset exclusion rules.
    #[arg(long)]
    exclude_file: Option<PathBuf>,

    /// YAML or JSON file overriding the compiler/optimization/linker grid.
    #[arg(long)]
    grid: Option<PathBuf>,

    /// Comparison program to run [default: python3 table_size.py].
    #[arg(long)]
    compare_program: Option<PathBuf>,

    /// Leading argument passed to the comparison program (repeatable).
    #[arg(long = "compare-arg", allow_hyphen_values = true)]
    compare_args: Vec<String>,

    /// Keep the output file of a failed comparison instead of deleting it.
    #[arg(long, default_value_t = false)]
    keep_failed_output: bool,

    /// List the jobs without running anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Emit JSON instead of human-readable text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let defaults = RunOptions::new(cli.dataset);
    // Extra arguments follow the default script when no program is given.
    let (compare_program, compare_args) = match cli.compare_program {
        Some(program) => (program, cli.compare_args),
        None => {
            let mut args = defaults.compare_args;
            args.extend(cli.compare_args);
            (defaults.compare_program, args)
        }
    };

    let opts = RunOptions {
        dataset: cli.dataset,
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        gt_dir: cli.gt_dir,
        stat_dir: cli.stat_dir,
        package: cli.package,
        workers: cli.core,
        blacklist: cli.blacklist,
        whitelist: cli.whitelist,
        exclude_file: cli.exclude_file,
        grid_file: cli.grid,
        compare_program,
        compare_args,
        keep_failed_output: cli.keep_failed_output,
        dry_run: cli.dry_run,
        json: cli.json,
    };
    run_command(&opts)?;

    Ok(())
}
