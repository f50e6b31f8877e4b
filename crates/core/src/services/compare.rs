use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Default comparison program and its leading arguments.
pub const DEFAULT_PROGRAM: &str = "python3";
pub const DEFAULT_ARGS: &[&str] = &["table_size.py"];

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Failed to create output file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Exit { program: String, status: ExitStatus },
    #[error("Comparison tool error: {0}")]
    Tool(String),
}

/// Inputs and destination of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareRequest<'a> {
    pub ground_truth: &'a Path,
    pub reassembled: &'a Path,
    /// File receiving the tool's standard output.
    pub output: &'a Path,
}

/// Trait implemented by comparison tools; the runner only sees this seam.
pub trait ComparisonTool: Send + Sync {
    fn compare(&self, request: &CompareRequest<'_>) -> Result<(), CompareError>;
    fn name(&self) -> &str;

    /// Human-readable rendering of an invocation, for logs.
    fn describe(&self, request: &CompareRequest<'_>) -> String {
        format!(
            "{} {} {} > {}",
            self.name(),
            request.ground_truth.display(),
            request.reassembled.display(),
            request.output.display()
        )
    }
}

/// Comparison tool run as a child process: `program args... <gt> <reassembled>`.
///
/// Arguments are passed as separate argv entries; no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for ExternalTool {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_ARGS.iter().map(|a| a.to_string()).collect())
    }
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl ComparisonTool for ExternalTool {
    fn compare(&self, request: &CompareRequest<'_>) -> Result<(), CompareError> {
        let stdout = File::create(request.output).map_err(|source| CompareError::Output {
            path: request.output.to_path_buf(),
            source,
        })?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(request.ground_truth)
            .arg(request.reassembled)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .status()
            .map_err(|source| CompareError::Spawn { program: self.program_name(), source })?;

        if !status.success() {
            return Err(CompareError::Exit { program: self.program_name(), status });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.program.to_str().unwrap_or("comparison-tool")
    }

    fn describe(&self, request: &CompareRequest<'_>) -> String {
        let mut line = self.program_name();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        format!(
            "{line} {} {} > {}",
            request.ground_truth.display(),
            request.reassembled.display(),
            request.output.display()
        )
    }
}
