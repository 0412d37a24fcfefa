// src/config.rs
//! Configuration loaded from `codeprobe.toml`, with per-field defaults so a
//! partial file (or none at all) always yields a complete configuration.

use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "codeprobe.toml";

/// Reporting thresholds for per-function findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// A function longer than this many lines is flagged as long.
    #[serde(default = "default_long_function_lines")]
    pub long_function_lines: usize,
    /// A function with more parameters than this is flagged.
    #[serde(default = "default_max_function_params")]
    pub max_function_params: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            long_function_lines: default_long_function_lines(),
            max_function_params: default_max_function_params(),
        }
    }
}

/// Tuning for both duplicate detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// Smallest line-window considered a candidate block.
    #[serde(default = "default_min_block_size")]
    pub min_block_size: usize,
    /// Largest line-window generated per anchor line. Safety valve against
    /// pathological candidate growth on very long files.
    #[serde(default = "default_max_window")]
    pub max_window: usize,
    /// Smallest function body (in lines) the function detector considers.
    #[serde(default = "default_min_function_size")]
    pub min_function_size: usize,
    /// Acceptance threshold for near-duplicate pairs, in [0, 1].
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Drop comment lines (and triple-quoted regions) before windowing.
    #[serde(default = "default_true")]
    pub ignore_comments: bool,
    /// Trim leading/trailing whitespace per line before windowing.
    #[serde(default = "default_true")]
    pub ignore_whitespace: bool,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            min_block_size: default_min_block_size(),
            max_window: default_max_window(),
            min_function_size: default_min_function_size(),
            similarity_threshold: default_similarity_threshold(),
            ignore_comments: true,
            ignore_whitespace: true,
        }
    }
}

/// Directory-walk settings for batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Recurse into subdirectories.
    #[serde(default = "default_true")]
    pub recursive: bool,
    /// Regex patterns a path must match to be analyzed (empty = all).
    #[serde(default)]
    pub include: Vec<String>,
    /// Regex patterns that exclude a path from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// Top-level `codeprobe.toml` shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProbeToml {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub duplicates: DuplicateConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl ProbeToml {
    /// Parses a config file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::from(e).with_path(path))?;
        let parsed: ProbeToml = toml::from_str(&raw)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Loads `codeprobe.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns error only for a present-but-invalid file.
    pub fn discover() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let t = self.duplicates.similarity_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(ProbeError::Config(format!(
                "similarity_threshold must be within [0, 1], got {t}"
            )));
        }
        if self.duplicates.min_block_size == 0 {
            return Err(ProbeError::Config(
                "min_block_size must be at least 1".to_string(),
            ));
        }
        if self.duplicates.max_window < self.duplicates.min_block_size {
            return Err(ProbeError::Config(
                "max_window must be >= min_block_size".to_string(),
            ));
        }
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}
const fn default_long_function_lines() -> usize {
    50
}
const fn default_max_function_params() -> usize {
    4
}
const fn default_min_block_size() -> usize {
    5
}
const fn default_max_window() -> usize {
    30
}
const fn default_min_function_size() -> usize {
    5
}
const fn default_similarity_threshold() -> f64 {
    0.85
}
