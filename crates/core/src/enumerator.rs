//! Job enumeration.
//!
//! Expands the option grid for one package against the binaries present on
//! disk, applies blacklist/whitelist/exclusion filtering, and produces the
//! ordered list of [`JobDescriptor`]s.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::OptionGrid;
use crate::exclusion::{ExclusionKey, ExclusionPredicate};
use crate::layout::BenchmarkLayout;
use crate::model::{JobDescriptor, Package, Variant};

/// Name-based include/exclude sets supplied by the caller.
///
/// An empty set behaves as if no set was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryFilter {
    blacklist: Option<HashSet<String>>,
    whitelist: Option<HashSet<String>>,
}

impl BinaryFilter {
    pub fn new<B, W>(blacklist: Option<B>, whitelist: Option<W>) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self { blacklist: non_empty_set(blacklist), whitelist: non_empty_set(whitelist) }
    }

    /// Blacklist wins over whitelist.
    pub fn allows(&self, binary: &str) -> bool {
        if self.blacklist.as_ref().is_some_and(|b| b.contains(binary)) {
            return false;
        }
        if self.whitelist.as_ref().is_some_and(|w| !w.contains(binary)) {
            return false;
        }
        true
    }
}

fn non_empty_set<I>(items: Option<I>) -> Option<HashSet<String>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items.map(|i| i.into_iter().map(Into::into).collect::<HashSet<_>>()).filter(|s| !s.is_empty())
}

/// Produces the job list for a package under one dataset layout.
pub struct JobEnumerator<'a> {
    pub layout: &'a BenchmarkLayout,
    pub grid: &'a OptionGrid,
    pub filter: &'a BinaryFilter,
    pub exclusion: &'a dyn ExclusionPredicate,
}

impl<'a> JobEnumerator<'a> {
    /// Variants whose `bin/` directory cannot be listed contribute no jobs.
    pub fn enumerate(&self, package: Package) -> Vec<JobDescriptor> {
        let mut jobs = Vec::new();

        for point in self.grid.points() {
            let variant = Variant::new(package, point.compiler, point.opt_level, point.linker);
            let bin_dir = self.layout.bin_dir(&variant);

            let binaries = match list_binaries(&bin_dir) {
                Ok(binaries) => binaries,
                Err(e) => {
                    tracing::warn!(
                        path = %bin_dir.display(),
                        error = %e,
                        "failed to list binaries, skipping variant"
                    );
                    continue;
                }
            };

            for binary_path in binaries {
                let Some(binary_name) =
                    binary_path.file_name().and_then(|n| n.to_str()).map(str::to_string)
                else {
                    tracing::warn!(path = %binary_path.display(), "skipping non UTF-8 binary name");
                    continue;
                };

                if !self.filter.allows(&binary_name) {
                    continue;
                }

                let key = ExclusionKey {
                    dataset: self.layout.dataset,
                    package,
                    compiler: point.compiler,
                    opt_level: point.opt_level,
                    binary: &binary_name,
                };
                if self.exclusion.is_excluded(&key) {
                    tracing::debug!(binary = %binary_name, variant = %variant.flat_name(), "excluded");
                    continue;
                }

                jobs.push(JobDescriptor {
                    ground_truth_dir: self.layout.ground_truth_dir(&variant, &binary_name),
                    reassembly_dir: self.layout.reassembly_dir(&variant, &binary_name),
                    output_root: self.layout.output_root.clone(),
                    arch: point.arch.to_string(),
                    pie: point.pie.to_string(),
                    variant: variant.clone(),
                    binary_name,
                    binary_path,
                });
            }
        }

        tracing::debug!(package = %package, jobs = jobs.len(), "enumerated jobs");
        jobs
    }
}

/// Regular files directly under `dir`, sorted by name.
///
/// A missing `dir`, or a path that is not a directory, yields nothing.
fn list_binaries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
