// Tue Feb 17 2026 - Alex

use crate::config::ParserConfig;
use crate::linkmap::{LinkMapError, LinkMapParser, Snapshot, SourceMetadata};
use chrono::{DateTime, Utc};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct BatchInput {
    pub source: SourceMetadata,
    pub text: String,
}

impl BatchInput {
    pub fn new(source: SourceMetadata, text: String) -> Self {
        Self { source, text }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = read_link_map(path)?;
        let mut source = SourceMetadata::new().with_path(&path.to_string_lossy());
        if let Ok(modified) = path.metadata().and_then(|m| m.modified()) {
            source = source.with_timestamp(DateTime::<Utc>::from(modified));
        }
        Ok(Self { source, text })
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub source: SourceMetadata,
    pub result: Result<Snapshot, LinkMapError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Reads a link map through a memory map. Invalid UTF-8 is replaced rather
/// than rejected; linkers do not promise an encoding for paths.
pub fn read_link_map(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }
    let mmap = unsafe { Mmap::map(&file) }?;
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

pub fn parse_batch(inputs: &[BatchInput], config: &ParserConfig, threads: usize) -> Vec<BatchOutcome> {
    parse_batch_with(inputs, config, threads, &|_| {})
}

/// Parses every input on a dedicated pool of `threads` workers. Outcomes are
/// returned in input order and `on_done` is called once per input as it
/// finishes, from whichever worker parsed it.
pub fn parse_batch_with(
    inputs: &[BatchInput],
    config: &ParserConfig,
    threads: usize,
    on_done: &(dyn Fn(&BatchOutcome) + Sync),
) -> Vec<BatchOutcome> {
    let parse_one = |input: &BatchInput| {
        let outcome = BatchOutcome {
            source: input.source.clone(),
            result: LinkMapParser::new(config.clone())
                .with_source(input.source.clone())
                .parse(&input.text),
        };
        if let Err(e) = &outcome.result {
            log::warn!("{}: {}", input.source.label(), e);
        }
        on_done(&outcome);
        outcome
    };

    match rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build() {
        Ok(pool) => pool.install(|| inputs.par_iter().map(parse_one).collect()),
        Err(e) => {
            log::warn!("falling back to sequential parsing: {}", e);
            inputs.iter().map(parse_one).collect()
        }
    }
}
