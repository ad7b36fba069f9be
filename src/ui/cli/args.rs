// Tue Feb 17 2026 - Alex

use crate::output::Renderer;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "linkmap-analyzer")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Size attribution and build-to-build diffs for linker map files", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON config file; missing keys fall back to defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Attribute the size of one link map to libraries, files and sections.
    Analyze(AnalyzeArgs),
    /// Diff two link maps.
    Compare(CompareArgs),
    /// Analyze many link maps in parallel.
    Batch(BatchArgs),
    /// Inspect or merge a size history file.
    History(HistoryArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    pub input: PathBuf,

    /// Rows kept per view before the rest is folded into `<others>`.
    #[arg(short, long)]
    pub top: Option<usize>,

    #[arg(long, conflicts_with = "top")]
    pub all: bool,

    #[arg(long)]
    pub symbols: Option<usize>,

    #[arg(short, long, default_value = "text")]
    pub format: String,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub demangle: bool,

    /// Append this build to a history file.
    #[arg(long)]
    pub history: Option<PathBuf>,

    #[arg(long, requires = "history")]
    pub label: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    pub old: PathBuf,

    pub new: PathBuf,

    #[arg(short, long, default_value = "text")]
    pub format: String,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BatchArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long)]
    pub threads: Option<usize>,

    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write one report per input into this directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    pub file: PathBuf,

    /// Diff the libraries of two recorded versions.
    #[arg(long, num_args = 2, value_names = ["BASELINE", "CURRENT"])]
    pub diff: Option<Vec<String>>,

    /// Fold another history file into this one.
    #[arg(long)]
    pub merge: Option<PathBuf>,
}

impl AnalyzeArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }
        self.renderer().map(|_| ())
    }

    pub fn renderer(&self) -> Result<Renderer, String> {
        self.format.parse()
    }

    /// `None` keeps the configured cut, `Some(None)` disables it.
    pub fn top_n(&self) -> Option<Option<usize>> {
        if self.all {
            Some(None)
        } else {
            self.top.map(Some)
        }
    }
}

impl CompareArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.old == self.new {
            return Err("Baseline and current link maps are the same file".to_string());
        }
        self.renderer().map(|_| ())
    }

    pub fn renderer(&self) -> Result<Renderer, String> {
        self.format.parse()
    }
}

impl BatchArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == Some(0) {
            return Err("Thread count must be at least 1".to_string());
        }
        self.renderer().map(|_| ())
    }

    pub fn renderer(&self) -> Result<Renderer, String> {
        self.format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_analyze() {
        let args = Args::try_parse_from([
            "linkmap-analyzer",
            "analyze",
            "App-LinkMap.txt",
            "--top",
            "5",
            "-f",
            "json",
            "--history",
            "history.json",
            "--label",
            "2.3.0",
        ])
        .unwrap();

        match args.command {
            Command::Analyze(a) => {
                assert_eq!(a.input, PathBuf::from("App-LinkMap.txt"));
                assert_eq!(a.top_n(), Some(Some(5)));
                assert_eq!(a.renderer(), Ok(Renderer::Json));
                assert_eq!(a.label.as_deref(), Some("2.3.0"));
                assert!(a.validate().is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_label_requires_history() {
        assert!(Args::try_parse_from(["linkmap-analyzer", "analyze", "a.txt", "--label", "1.0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["linkmap-analyzer", "compare", "old.txt", "new.txt", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log_level, "debug");
        assert!(matches!(args.command, Command::Compare(_)));
    }

    #[test]
    fn test_history_diff_takes_two_versions() {
        let args =
            Args::try_parse_from(["linkmap-analyzer", "history", "h.json", "--diff", "1.0", "1.1"]).unwrap();
        match args.command {
            Command::History(h) => assert_eq!(h.diff, Some(vec!["1.0".to_string(), "1.1".to_string()])),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_format() {
        let args = Args::try_parse_from(["linkmap-analyzer", "batch", "a.txt", "-f", "pdf"]).unwrap();
        match args.command {
            Command::Batch(b) => assert!(b.validate().is_err()),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
