// Tue Feb 17 2026 - Alex

use crate::demangle::{display_name, Demangle};
use crate::diff::{Comparison, DiffReport};
use crate::output::formatter::{format_change, format_delta, format_percent, format_size};
use crate::report::AnalysisReport;
use crate::rollup::RollupRow;

const RULE: &str = "================================================================================";

pub fn analysis(report: &AnalysisReport, demangler: Option<&dyn Demangle>) -> String {
    let mut text = String::new();

    text.push_str(RULE);
    text.push_str("\n                             LINK MAP SIZE REPORT\n");
    text.push_str(RULE);
    text.push('\n');
    text.push_str(&format!("Source: {}\n", report.label()));
    if let Some(arch) = report.source.header("Arch") {
        text.push_str(&format!("Arch: {}\n", arch));
    }
    text.push_str(&format!("Total size: {}\n", format_size(report.total_size)));
    text.push_str(&format!(
        "Object files: {} | Sections: {} | Symbols: {}\n",
        report.object_file_count, report.section_count, report.symbol_count
    ));

    rows_section(&mut text, "Sections", &report.rollups.by_section);
    rows_section(&mut text, "Libraries", &report.rollups.by_library);
    rows_section(&mut text, "Object files", &report.rollups.by_file);

    if !report.top_symbols.is_empty() {
        text.push_str("\nLargest symbols\n---------------\n");
        for sym in &report.top_symbols {
            text.push_str(&format!(
                "  {:>12} {:>8}  {}  [{} / {}]\n",
                format_size(sym.size),
                format_percent(sym.percent_of_total),
                display_name(demangler, &sym.name),
                sym.library,
                sym.section
            ));
        }
    }

    if !report.diagnostics.is_empty() {
        text.push_str("\nDiagnostics\n-----------\n");
        for diagnostic in &report.diagnostics {
            text.push_str(&format!("  {}\n", diagnostic));
        }
    }

    if !report.advisories.is_empty() {
        text.push_str("\nAdvisories (low confidence)\n---------------------------\n");
        for advisory in &report.advisories {
            text.push_str(&format!("  {}\n", advisory));
        }
    }

    text
}

fn rows_section(text: &mut String, title: &str, rows: &[RollupRow]) {
    if rows.is_empty() {
        return;
    }
    text.push_str(&format!("\n{}\n{}\n", title, "-".repeat(title.len())));
    for row in rows {
        text.push_str(&format!(
            "  {:<48} {:>12} {:>8} {:>6}\n",
            row.key,
            format_size(row.size),
            format_percent(row.percent_of_total),
            row.count
        ));
    }
}

pub fn comparison(comparison: &Comparison) -> String {
    let mut text = String::new();

    text.push_str(RULE);
    text.push_str("\n                           LINK MAP SIZE COMPARISON\n");
    text.push_str(RULE);
    text.push('\n');
    text.push_str(&format!("Baseline: {}\n", comparison.baseline));
    text.push_str(&format!("Current:  {}\n", comparison.current));

    let totals = &comparison.libraries;
    text.push_str(&format!(
        "Total: {} -> {} ({}, {})\n",
        format_size(totals.total_baseline),
        format_size(totals.total_current),
        format_delta(totals.total_delta),
        format_change(totals.total_percent_change())
    ));

    report_section(&mut text, "Libraries", &comparison.libraries);
    report_section(&mut text, "Sections", &comparison.sections);
    report_section(&mut text, "Object files", &comparison.files);

    text
}

fn report_section(text: &mut String, title: &str, report: &DiffReport) {
    text.push_str(&format!("\n{}\n{}\n", title, "-".repeat(title.len())));
    if !report.has_changes() {
        text.push_str("  no changes\n");
        return;
    }
    for entry in report.changed() {
        text.push_str(&format!(
            "  {:<48} {:>12} -> {:<12} {:>12} {:>9}  {}\n",
            entry.key,
            format_size(entry.baseline_size),
            format_size(entry.current_size),
            format_delta(entry.delta),
            format_change(entry.percent_change()),
            entry.classification
        ));
    }
}
