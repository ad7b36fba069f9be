// Tue Feb 17 2026 - Alex

use crate::linkmap::library::{file_name, framework_name, split_archive_member};
use once_cell::sync::Lazy;
use regex::Regex;

const DEFAULT_STRIP_PATTERNS: [&str; 5] = [
    r"^.*/DerivedData/[^/]+/",
    r"^(?:/private)?/var/folders/[^/]+/[^/]+/[^/]+/",
    r"^(?:/private)?/tmp/[^/]+/",
    r"^(?:.*/)?Build/Intermediates(?:\.noindex)?/",
    r"Objects-normal/[^/]+/",
];

static DEFAULT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_STRIP_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Maps object file paths from different build trees onto one comparable key.
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    patterns: Vec<Regex>,
}

impl PathNormalizer {
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
        }
    }

    pub fn with_patterns(extra: &[String], use_defaults: bool) -> Result<Self, regex::Error> {
        let mut patterns = if use_defaults { DEFAULT_PATTERNS.clone() } else { Vec::new() };
        for pattern in extra {
            patterns.push(Regex::new(pattern)?);
        }
        Ok(Self { patterns })
    }

    pub fn normalize(&self, path: &str) -> String {
        if let Some((archive, member)) = split_archive_member(path) {
            return format!("{}({})", file_name(archive), member);
        }

        if let Some(name) = framework_name(path) {
            if let Some(start) = path.find(&format!("{}.framework/", name)) {
                return path[start..].to_string();
            }
        }

        let mut key = path.to_string();
        for pattern in &self.patterns {
            key = pattern.replace_all(&key, "").into_owned();
        }
        key
    }
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
