use std::path::{Path, PathBuf};

use crate::model::{Dataset, Variant};

/// Default base for benchmark binaries.
pub const DEFAULT_INPUT_BASE: &str = "benchmark";
/// Default base for reassembler output.
pub const DEFAULT_REASSEMBLY_BASE: &str = "output";
/// Default base for ground-truth tables.
pub const DEFAULT_GROUND_TRUTH_BASE: &str = "gt";
/// Default base for comparison results.
pub const DEFAULT_OUTPUT_BASE: &str = "stat/table";

/// Logical layout of the benchmark trees for one dataset.
///
/// This is derived from the chosen base directories. It does *not* perform any IO
/// itself; the enumerator and runner touch the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkLayout {
    pub dataset: Dataset,
    /// Root of the compiled binaries (`<input>/<dataset>`).
    pub input_root: PathBuf,
    /// Root of the ground-truth tables (`<gt>/<dataset>`).
    pub ground_truth_root: PathBuf,
    /// Root of the reassembler output (`<output>/<dataset>`).
    pub reassembly_root: PathBuf,
    /// Root of the comparison results (`<stat/table>/<dataset>`).
    pub output_root: PathBuf,
}

impl BenchmarkLayout {
    /// Compute the layout for `dataset`, joining each base directory with the dataset tag.
    pub fn for_dataset(
        dataset: Dataset,
        input_base: impl AsRef<Path>,
        reassembly_base: impl AsRef<Path>,
        ground_truth_base: impl AsRef<Path>,
        output_base: impl AsRef<Path>,
    ) -> Self {
        let tag = dataset.as_str();
        Self {
            dataset,
            input_root: input_base.as_ref().join(tag),
            ground_truth_root: ground_truth_base.as_ref().join(tag),
            reassembly_root: reassembly_base.as_ref().join(tag),
            output_root: output_base.as_ref().join(tag),
        }
    }

    /// Layout with every base at its default, relative to the working directory.
    pub fn with_defaults(dataset: Dataset) -> Self {
        Self::for_dataset(
            dataset,
            DEFAULT_INPUT_BASE,
            DEFAULT_REASSEMBLY_BASE,
            DEFAULT_GROUND_TRUTH_BASE,
            DEFAULT_OUTPUT_BASE,
        )
    }

    /// Directory listing the candidate binaries of a variant.
    pub fn bin_dir(&self, variant: &Variant) -> PathBuf {
        self.input_root.join(variant.subdir()).join("bin")
    }

    pub fn ground_truth_dir(&self, variant: &Variant, binary: &str) -> PathBuf {
        self.ground_truth_root.join(variant.subdir()).join(binary)
    }

    pub fn reassembly_dir(&self, variant: &Variant, binary: &str) -> PathBuf {
        self.reassembly_root.join(variant.subdir()).join(binary)
    }
}
