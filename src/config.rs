// Mon Feb 16 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub rollup: RollupConfig,
    pub diff: DiffConfig,
    pub advisory: AdvisoryConfig,
    pub max_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Bytes a section's symbols may exceed its declared size by before a warning.
    pub tolerance_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    pub top_n: Option<usize>,
    pub top_symbols: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Extra regexes stripped from object file paths before comparing.
    pub strip_patterns: Vec<String>,
    pub use_default_patterns: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    pub oversize_ratio: f64,
    pub similarity_ratio: f64,
    pub min_duplicate_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            rollup: RollupConfig::default(),
            diff: DiffConfig::default(),
            advisory: AdvisoryConfig::default(),
            max_threads: num_cpus::get(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { tolerance_bytes: 16 }
    }
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            top_n: Some(20),
            top_symbols: 20,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            strip_patterns: Vec::new(),
            use_default_patterns: true,
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            oversize_ratio: 0.10,
            similarity_ratio: 0.90,
            min_duplicate_size: 1024,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        self.rollup.top_n = top_n;
        self
    }

    pub fn with_tolerance(mut self, tolerance_bytes: u64) -> Self {
        self.parser.tolerance_bytes = tolerance_bytes;
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_threads == 0 {
            return Err("max_threads must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.advisory.oversize_ratio) {
            return Err("advisory.oversize_ratio must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.advisory.similarity_ratio) {
            return Err("advisory.similarity_ratio must be between 0.0 and 1.0".to_string());
        }
        for pattern in &self.diff.strip_patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(format!("invalid strip pattern `{}`: {}", pattern, e));
            }
        }
        Ok(())
    }
}
