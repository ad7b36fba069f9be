// Tue Feb 17 2026 - Alex

pub mod csv;
pub mod formatter;
pub mod html;
pub mod json;
pub mod text;

pub use formatter::{format_delta, format_percent, format_size};

use crate::demangle::Demangle;
use crate::diff::Comparison;
use crate::report::AnalysisReport;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Text,
    Csv,
    Json,
    Html,
}

#[derive(Debug, Clone, Copy)]
pub enum Renderable<'a> {
    Analysis(&'a AnalysisReport),
    Comparison(&'a Comparison),
}

impl Renderer {
    /// Renders to bytes. Demangling only changes displayed symbol names.
    pub fn render(&self, item: &Renderable<'_>, demangler: Option<&dyn Demangle>) -> Vec<u8> {
        let out = match (self, item) {
            (Renderer::Text, Renderable::Analysis(r)) => text::analysis(r, demangler),
            (Renderer::Text, Renderable::Comparison(c)) => text::comparison(c),
            (Renderer::Csv, Renderable::Analysis(r)) => csv::analysis(r, demangler),
            (Renderer::Csv, Renderable::Comparison(c)) => csv::comparison(c),
            (Renderer::Json, Renderable::Analysis(r)) => json::analysis(r, demangler),
            (Renderer::Json, Renderable::Comparison(c)) => json::comparison(c),
            (Renderer::Html, Renderable::Analysis(r)) => html::analysis(r, demangler),
            (Renderer::Html, Renderable::Comparison(c)) => html::comparison(c),
        };
        out.into_bytes()
    }

    pub fn render_to_file(
        &self,
        item: &Renderable<'_>,
        demangler: Option<&dyn Demangle>,
        path: &Path,
    ) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&self.render(item, demangler))?;
        writer.flush()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Renderer::Text => "txt",
            Renderer::Csv => "csv",
            Renderer::Json => "json",
            Renderer::Html => "html",
        }
    }
}

impl FromStr for Renderer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Renderer::Text),
            "csv" => Ok(Renderer::Csv),
            "json" => Ok(Renderer::Json),
            "html" => Ok(Renderer::Html),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Renderer::Text => "text",
            Renderer::Csv => "csv",
            Renderer::Json => "json",
            Renderer::Html => "html",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::Config;
    use crate::diff::{Comparison, DiffEngine};
    use crate::linkmap::parse;
    use crate::report::AnalysisReport;
    use crate::rollup::aggregate;

    pub const BASELINE: &str = "\
# Path: /build/App
# Object files:
[0] /p/libFoo.a(a.o)
[1] main.o
[2] /p/libBar.a(b.o)
# Sections:
0x1000 0x300 __TEXT __text
# Symbols:
0x1000 0x100 [0] __ZN3foo3barEv
0x1100 0x180 [1] _main
0x1280 0x80 [2] _b
";

    pub const CURRENT: &str = "\
# Path: /build/App
# Object files:
[0] /p/libFoo.a(a.o)
[1] main.o
[2] /p/libBaz.a(c.o)
# Sections:
0x1000 0x340 __TEXT __text
# Symbols:
0x1000 0x120 [0] __ZN3foo3barEv
0x1120 0x180 [1] _main
0x12a0 0xa0 [2] _c
";

    pub fn analysis() -> AnalysisReport {
        AnalysisReport::build(&parse(BASELINE).unwrap(), &Config::default())
    }

    pub fn comparison() -> Comparison {
        let old = aggregate(&parse(BASELINE).unwrap(), None);
        let new = aggregate(&parse(CURRENT).unwrap(), None);
        DiffEngine::default().compare("1.0", &old, "1.1", &new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_from_str() {
        assert_eq!("JSON".parse::<Renderer>(), Ok(Renderer::Json));
        assert_eq!("txt".parse::<Renderer>(), Ok(Renderer::Text));
        assert!("pdf".parse::<Renderer>().is_err());
    }

    #[test]
    fn test_every_renderer_produces_output() {
        let report = fixtures::analysis();
        let comparison = fixtures::comparison();
        for renderer in [Renderer::Text, Renderer::Csv, Renderer::Json, Renderer::Html] {
            assert!(!renderer.render(&Renderable::Analysis(&report), None).is_empty());
            assert!(!renderer.render(&Renderable::Comparison(&comparison), None).is_empty());
        }
    }
}
