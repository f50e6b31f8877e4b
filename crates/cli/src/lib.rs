pub mod commands;

use std::sync::OnceLock;

use tablecmp_core::model::Dataset;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install a stderr tracing subscriber (if one is not already active).
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
/// Calling this function multiple times is harmless.
pub fn init_tracing(verbose: bool) {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("table_compare={default_level},tablecmp_core={default_level}"))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    let _ = TRACING_INIT.set(());
}

/// clap value parser for the positional dataset tag.
pub fn parse_dataset(value: &str) -> Result<Dataset, String> {
    value.parse::<Dataset>().map_err(|e| e.to_string())
}

/// Split comma-separated entries, dropping empty ones.
///
/// Lets `--blacklist a,b` and `--blacklist a b` mean the same thing.
pub fn split_names(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
