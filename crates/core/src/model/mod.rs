//! Core data model for comparison jobs.
//!
//! This module contains:
//! - The supported datasets and benchmark packages
//! - Build variants (package/compiler/optimization/linker)
//! - The immutable job descriptor consumed by the runner

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File holding the ground-truth function table, relative to a job's ground-truth dir.
pub const GROUND_TRUTH_TABLE: &str = "norm_db/func.json";
/// File holding the reassembled function table, relative to a job's reassembly dir.
pub const REASSEMBLED_TABLE: &str = "super/b2r2_meta.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("\"{0}\" is invalid. Please choose one from setA or setC.")]
    UnknownDataset(String),
    #[error("Unsupported package: {0}")]
    UnknownPackage(String),
}

/// Benchmark dataset tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    #[serde(rename = "setA")]
    SetA,
    #[serde(rename = "setC")]
    SetC,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::SetA, Dataset::SetC];

    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::SetA => "setA",
            Dataset::SetC => "setC",
        }
    }
}

impl FromStr for Dataset {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ModelError::UnknownDataset(s.to_string()))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Benchmark package (a corpus of binaries built across variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Package {
    #[serde(rename = "coreutils-9.1")]
    Coreutils91,
    #[serde(rename = "binutils-2.40")]
    Binutils240,
    #[serde(rename = "spec_cpu2006")]
    SpecCpu2006,
    #[serde(rename = "spec_cpu2017")]
    SpecCpu2017,
}

impl Package {
    /// Every supported package, in the order used when no package is requested.
    pub const ALL: [Package; 4] =
        [Package::Coreutils91, Package::Binutils240, Package::SpecCpu2006, Package::SpecCpu2017];

    pub fn as_str(self) -> &'static str {
        match self {
            Package::Coreutils91 => "coreutils-9.1",
            Package::Binutils240 => "binutils-2.40",
            Package::SpecCpu2006 => "spec_cpu2006",
            Package::SpecCpu2017 => "spec_cpu2017",
        }
    }
}

impl FromStr for Package {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Package::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ModelError::UnknownPackage(s.to_string()))
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One build configuration of a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub package: Package,
    pub compiler: String,
    pub opt_level: String,
    pub linker: String,
}

impl Variant {
    pub fn new(
        package: Package,
        compiler: impl Into<String>,
        opt_level: impl Into<String>,
        linker: impl Into<String>,
    ) -> Self {
        Self {
            package,
            compiler: compiler.into(),
            opt_level: opt_level.into(),
            linker: linker.into(),
        }
    }

    /// Relative directory for this variant: `package/compiler/opt_linker`.
    pub fn subdir(&self) -> PathBuf {
        PathBuf::from(self.package.as_str())
            .join(&self.compiler)
            .join(format!("{}_{}", self.opt_level, self.linker))
    }

    /// Variant key with path separators flattened: `package_compiler_opt_linker`.
    pub fn flat_name(&self) -> String {
        format!("{}_{}_{}_{}", self.package, self.compiler, self.opt_level, self.linker)
    }
}

/// Identity of a job within one enumeration.
pub type JobKey<'a> = (Package, &'a str, &'a str, &'a str, &'a str);

/// Immutable description of one binary's comparison task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub variant: Variant,
    pub arch: String,
    pub pie: String,
    pub binary_name: String,
    pub binary_path: PathBuf,
    pub ground_truth_dir: PathBuf,
    pub reassembly_dir: PathBuf,
    pub output_root: PathBuf,
}

impl JobDescriptor {
    pub fn key(&self) -> JobKey<'_> {
        (
            self.variant.package,
            &self.variant.compiler,
            &self.variant.opt_level,
            &self.variant.linker,
            &self.binary_name,
        )
    }

    pub fn ground_truth_table(&self) -> PathBuf {
        self.ground_truth_dir.join(GROUND_TRUTH_TABLE)
    }

    pub fn reassembled_table(&self) -> PathBuf {
        self.reassembly_dir.join(REASSEMBLED_TABLE)
    }

    /// Per-binary output directory: `output_root/variant/binary`.
    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(self.variant.subdir()).join(&self.binary_name)
    }

    /// Final result file: `output_dir/<flattened variant>_<binary>`.
    pub fn output_file(&self) -> PathBuf {
        self.output_dir().join(format!("{}_{}", self.variant.flat_name(), self.binary_name))
    }
}
