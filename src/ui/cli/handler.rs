// Tue Feb 17 2026 - Alex

use super::args::{AnalyzeArgs, Args, BatchArgs, Command, CompareArgs, HistoryArgs};
use crate::batch::{parse_batch, parse_batch_with, BatchInput};
use crate::config::Config;
use crate::demangle::{Demangle, ItaniumDemangler};
use crate::diff::{signed_delta, DiffEngine};
use crate::history::{HistoryEntry, HistoryLog};
use crate::linkmap::{LinkMapParser, Snapshot};
use crate::output::{format_delta, format_size, Renderable, Renderer};
use crate::report::AnalysisReport;
use crate::rollup::aggregate;
use crate::ui::progress::ProgressManager;
use crate::ui::{print_error, print_info, print_success, print_warning};
use anyhow::{anyhow, Context};
use chrono::Utc;
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::Path;

pub struct CommandHandler {
    config: Config,
    quiet: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            quiet: false,
        }
    }

    pub fn execute(mut self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args)?;
        self.quiet = args.quiet;

        if args.no_color {
            colored::control::set_override(false);
        }

        if let Some(path) = &args.config {
            self.config = Config::load(path)?;
        }
        self.config.validate().map_err(|e| anyhow!(e))?;

        match args.command {
            Command::Analyze(analyze_args) => self.handle_analyze(analyze_args),
            Command::Compare(compare_args) => self.handle_compare(compare_args),
            Command::Batch(batch_args) => self.handle_batch(batch_args),
            Command::History(history_args) => self.handle_history(history_args),
        }
    }

    fn setup_logging(&self, args: &Args) -> anyhow::Result<()> {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        };

        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp(None)
            .try_init()
            .context("logger already initialised")?;

        Ok(())
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            print_info(message);
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            print_success(message);
        }
    }

    fn load(&self, path: &Path) -> anyhow::Result<Snapshot> {
        self.info(&format!("Loading link map: {}", path.display()));

        let input = BatchInput::from_file(path).with_context(|| format!("failed to read {}", path.display()))?;
        let snapshot = LinkMapParser::new(self.config.parser.clone())
            .with_source(input.source)
            .parse(&input.text)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        self.success(&format!(
            "Parsed {} symbols from {} object files ({})",
            snapshot.symbols().len(),
            snapshot.object_files().len(),
            format_size(snapshot.total_size())
        ));
        for diagnostic in snapshot.diagnostics() {
            if !self.quiet {
                print_warning(&diagnostic.to_string());
            }
        }

        Ok(snapshot)
    }

    fn emit(
        &self,
        renderer: Renderer,
        item: Renderable<'_>,
        demangler: Option<&dyn Demangle>,
        output: Option<&Path>,
    ) -> anyhow::Result<()> {
        match output {
            Some(path) => {
                renderer
                    .render_to_file(&item, demangler, path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                self.success(&format!("Report saved to: {}", path.display()));
            }
            None => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(&renderer.render(&item, demangler))?;
                lock.flush()?;
            }
        }
        Ok(())
    }

    fn handle_analyze(&self, args: AnalyzeArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow!(e))?;
        let renderer = args.renderer().map_err(|e| anyhow!(e))?;

        let snapshot = self.load(&args.input)?;

        let mut config = self.config.clone();
        if let Some(top_n) = args.top_n() {
            config = config.with_top_n(top_n);
        }
        if let Some(symbols) = args.symbols {
            config.rollup.top_symbols = symbols;
        }

        let report = AnalysisReport::build(&snapshot, &config);
        let demangler: Option<&dyn Demangle> = if args.demangle { Some(&ItaniumDemangler) } else { None };
        self.emit(renderer, Renderable::Analysis(&report), demangler, args.output.as_deref())?;

        if let Some(history_path) = &args.history {
            let mut log = HistoryLog::load(history_path)?;
            let label = args.label.clone().unwrap_or_else(|| report.label());
            let timestamp = snapshot.source().timestamp.unwrap_or_else(Utc::now);
            log.append(HistoryEntry::from_rollup(&label, timestamp, &aggregate(&snapshot, None)));
            log.save(history_path)?;
            self.success(&format!(
                "Recorded {} in {} ({} entries)",
                label,
                history_path.display(),
                log.len()
            ));
        }

        Ok(())
    }

    fn handle_compare(&self, args: CompareArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow!(e))?;
        let renderer = args.renderer().map_err(|e| anyhow!(e))?;

        let inputs = [
            BatchInput::from_file(&args.old).with_context(|| format!("failed to read {}", args.old.display()))?,
            BatchInput::from_file(&args.new).with_context(|| format!("failed to read {}", args.new.display()))?,
        ];
        self.info(&format!("Comparing {} -> {}", args.old.display(), args.new.display()));

        let mut snapshots = Vec::with_capacity(2);
        for outcome in parse_batch(&inputs, &self.config.parser, 2) {
            let label = outcome.source.label();
            snapshots.push(outcome.result.with_context(|| format!("failed to parse {}", label))?);
        }
        let (old, new) = match snapshots.as_slice() {
            [old, new] => (old, new),
            _ => return Err(anyhow!("expected two parsed link maps")),
        };

        let engine = DiffEngine::from_config(&self.config.diff).context("invalid strip pattern")?;
        let comparison = engine.compare(
            &old.source().label(),
            &aggregate(old, None),
            &new.source().label(),
            &aggregate(new, None),
        );

        if !self.quiet {
            let delta = comparison.libraries.total_delta;
            let line = format!(
                "Total: {} -> {} ({})",
                format_size(comparison.libraries.total_baseline),
                format_size(comparison.libraries.total_current),
                format_delta(delta)
            );
            let line = if delta > 0 {
                line.red()
            } else if delta < 0 {
                line.green()
            } else {
                line.normal()
            };
            eprintln!("{} {}", "[+]".green(), line);
        }

        self.emit(renderer, Renderable::Comparison(&comparison), None, args.output.as_deref())
    }

    fn handle_batch(&self, args: BatchArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow!(e))?;
        let renderer = args.renderer().map_err(|e| anyhow!(e))?;

        let mut inputs = Vec::with_capacity(args.inputs.len());
        let mut failed = 0usize;
        for path in &args.inputs {
            match BatchInput::from_file(path) {
                Ok(input) => inputs.push(input),
                Err(e) => {
                    print_error(&format!("{}: {}", path.display(), e));
                    failed += 1;
                }
            }
        }

        if let Some(dir) = &args.output_dir {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let threads = args.threads.unwrap_or(self.config.max_threads);
        self.info(&format!("Parsing {} link maps on {} threads", inputs.len(), threads));

        let progress = ProgressManager::new()
            .with_enabled(!args.no_progress && !self.quiet)
            .create(inputs.len() as u64, "parsing");
        let outcomes = parse_batch_with(&inputs, &self.config.parser, threads, &|_| progress.inc(1));
        progress.finish_and_clear();

        for outcome in &outcomes {
            let label = outcome.source.label();
            match &outcome.result {
                Ok(snapshot) => {
                    self.success(&format!(
                        "{}: {} in {} symbols",
                        label,
                        format_size(snapshot.total_size()),
                        snapshot.symbols().len()
                    ));
                    if let Some(dir) = &args.output_dir {
                        let report = AnalysisReport::build(snapshot, &self.config);
                        let stem = Path::new(&label)
                            .file_stem()
                            .map(|s| s.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "linkmap".to_string());
                        let path = dir.join(format!("{}.{}", stem, renderer.extension()));
                        renderer
                            .render_to_file(&Renderable::Analysis(&report), None, &path)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                    }
                }
                Err(e) => {
                    print_error(&format!("{}: {}", label, e));
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(anyhow!("{} of {} link maps failed", failed, args.inputs.len()));
        }
        Ok(())
    }

    fn handle_history(&self, args: HistoryArgs) -> anyhow::Result<()> {
        let mut log = HistoryLog::load(&args.file)?;

        if let Some(other) = &args.merge {
            let incoming = HistoryLog::load(other)?;
            let added = incoming.len();
            log.merge(incoming);
            log.save(&args.file)?;
            self.success(&format!("Merged {} entries from {}", added, other.display()));
        }

        if let Some(versions) = &args.diff {
            let (baseline, current) = match versions.as_slice() {
                [a, b] => (a.as_str(), b.as_str()),
                _ => return Err(anyhow!("--diff takes exactly two versions")),
            };
            let report = log
                .diff_versions(baseline, current)
                .ok_or_else(|| anyhow!("version {} or {} is not recorded", baseline, current))?;

            println!("{}", format!("{} -> {}", baseline, current).cyan().bold());
            println!("{}", "-".repeat(40).cyan());
            for entry in report.changed() {
                println!(
                    "  {:<40} {:>12} {}",
                    entry.key,
                    format_delta(entry.delta),
                    entry.classification
                );
            }
            println!("  {:<40} {:>12}", "total", format_delta(report.total_delta));
            return Ok(());
        }

        if log.is_empty() {
            self.info(&format!("No entries in {}", args.file.display()));
            return Ok(());
        }

        println!("{}", "Size history".cyan().bold());
        println!("{}", "-".repeat(60).cyan());
        let entries = log.entries();
        for (i, entry) in entries.iter().enumerate() {
            let change = entries
                .get(i + 1)
                .map(|older| format_delta(signed_delta(older.total_size, entry.total_size)))
                .unwrap_or_default();
            println!(
                "  {:<16} {}  {:>12} {:>12}",
                entry.version,
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                format_size(entry.total_size),
                change
            );
        }

        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
