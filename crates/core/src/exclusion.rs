//! Per-dataset binary exclusion rules.
//!
//! Some binaries are known to be unusable for a dataset (e.g. the ground-truth
//! stage cannot handle them). The enumerator asks an [`ExclusionPredicate`]
//! before emitting a job.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Dataset, Package};

/// Lookup key for exclusion decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionKey<'a> {
    pub dataset: Dataset,
    pub package: Package,
    pub compiler: &'a str,
    pub opt_level: &'a str,
    pub binary: &'a str,
}

/// Decides whether a binary is globally excluded for a dataset.
pub trait ExclusionPredicate: Send + Sync {
    fn is_excluded(&self, key: &ExclusionKey<'_>) -> bool;
}

/// Predicate that excludes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoExclusions;

impl ExclusionPredicate for NoExclusions {
    fn is_excluded(&self, _key: &ExclusionKey<'_>) -> bool {
        false
    }
}

/// One exclusion rule. Absent fields match any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeRule {
    pub binary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<Package>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_level: Option<String>,
}

impl ExcludeRule {
    pub fn matches(&self, key: &ExclusionKey<'_>) -> bool {
        self.binary == key.binary
            && self.dataset.map_or(true, |d| d == key.dataset)
            && self.package.map_or(true, |p| p == key.package)
            && self.compiler.as_deref().map_or(true, |c| c == key.compiler)
            && self.opt_level.as_deref().map_or(true, |o| o == key.opt_level)
    }
}

/// File-backed list of exclusion rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeList {
    #[serde(default)]
    pub excludes: Vec<ExcludeRule>,
}

impl ExcludeList {
    pub fn new(excludes: Vec<ExcludeRule>) -> Self {
        Self { excludes }
    }

    /// Load rules from a YAML (`.yaml`/`.yml`) or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read exclude list at {}", path.display()))?;
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&body).context("Failed to parse exclude list JSON")
        } else {
            serde_yaml::from_str(&body).context("Failed to parse exclude list YAML")
        }
    }

    pub fn len(&self) -> usize {
        self.excludes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excludes.is_empty()
    }
}

impl ExclusionPredicate for ExcludeList {
    fn is_excluded(&self, key: &ExclusionKey<'_>) -> bool {
        self.excludes.iter().any(|rule| rule.matches(key))
    }
}
