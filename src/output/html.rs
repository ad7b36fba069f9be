// Tue Feb 17 2026 - Alex

use crate::demangle::{display_name, Demangle};
use crate::diff::{Classification, Comparison, DiffReport};
use crate::output::formatter::{format_change, format_delta, format_percent, format_size, html_escape};
use crate::report::AnalysisReport;
use crate::rollup::RollupRow;

fn head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str("body { font-family: -apple-system, 'Helvetica Neue', sans-serif; background: #f7f7f9; color: #222; padding: 20px; }\n");
    html.push_str("h1, h2 { color: #2c3e50; }\n");
    html.push_str("table { border-collapse: collapse; width: 100%; margin: 20px 0; background: #fff; }\n");
    html.push_str("th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; }\n");
    html.push_str("th { background: #34495e; color: #fff; }\n");
    html.push_str("tr:nth-child(even) { background: #f2f2f2; }\n");
    html.push_str("td.num { text-align: right; font-family: Menlo, monospace; }\n");
    html.push_str(".grew, .added { color: #c0392b; }\n");
    html.push_str(".shrank, .removed { color: #27ae60; }\n");
    html.push_str(".summary-box { background: #fff; padding: 15px; border-radius: 5px; border: 1px solid #ddd; }\n");
    html.push_str(".warning { color: #d35400; }\n");
    html.push_str("</style>\n</head>\n<body>\n");
}

pub fn analysis(report: &AnalysisReport, demangler: Option<&dyn Demangle>) -> String {
    let mut html = String::new();
    let label = report.label();

    head(&mut html, &format!("Link Map Report - {}", label));

    html.push_str("<h1>Link Map Size Report</h1>\n");
    html.push_str("<div class=\"summary-box\">\n");
    html.push_str(&format!("<p>Source: <code>{}</code></p>\n", html_escape(&label)));
    if let Some(arch) = report.source.header("Arch") {
        html.push_str(&format!("<p>Arch: {}</p>\n", html_escape(arch)));
    }
    html.push_str(&format!("<p>Total size: <strong>{}</strong></p>\n", format_size(report.total_size)));
    html.push_str(&format!(
        "<p>Object files: {} | Sections: {} | Symbols: {}</p>\n",
        report.object_file_count, report.section_count, report.symbol_count
    ));
    html.push_str("</div>\n");

    rows_table(&mut html, "Sections", &report.rollups.by_section);
    rows_table(&mut html, "Libraries", &report.rollups.by_library);
    rows_table(&mut html, "Object Files", &report.rollups.by_file);

    if !report.top_symbols.is_empty() {
        html.push_str("<h2>Largest Symbols</h2>\n");
        html.push_str("<table>\n<tr><th>Symbol</th><th>Size</th><th>Share</th><th>Library</th><th>Section</th></tr>\n");
        for sym in &report.top_symbols {
            html.push_str(&format!(
                "<tr><td><code>{}</code></td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{}</td><td>{}</td></tr>\n",
                html_escape(&display_name(demangler, &sym.name)),
                format_size(sym.size),
                format_percent(sym.percent_of_total),
                html_escape(&sym.library),
                html_escape(&sym.section)
            ));
        }
        html.push_str("</table>\n");
    }

    if !report.diagnostics.is_empty() || !report.advisories.is_empty() {
        html.push_str("<h2>Findings</h2>\n<ul>\n");
        for diagnostic in &report.diagnostics {
            html.push_str(&format!("<li class=\"warning\">{}</li>\n", html_escape(&diagnostic.to_string())));
        }
        for advisory in &report.advisories {
            html.push_str(&format!("<li>{} <em>(low confidence)</em></li>\n", html_escape(&advisory.to_string())));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn rows_table(html: &mut String, title: &str, rows: &[RollupRow]) {
    if rows.is_empty() {
        return;
    }
    html.push_str(&format!("<h2>{}</h2>\n", title));
    html.push_str("<table>\n<tr><th>Name</th><th>Size</th><th>Share</th><th>Symbols</th></tr>\n");
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            html_escape(&row.key),
            format_size(row.size),
            format_percent(row.percent_of_total),
            row.count
        ));
    }
    html.push_str("</table>\n");
}

pub fn comparison(comparison: &Comparison) -> String {
    let mut html = String::new();

    head(
        &mut html,
        &format!("Link Map Comparison - {} vs {}", comparison.baseline, comparison.current),
    );

    let totals = &comparison.libraries;
    html.push_str("<h1>Link Map Size Comparison</h1>\n");
    html.push_str("<div class=\"summary-box\">\n");
    html.push_str(&format!("<p>Baseline: <code>{}</code></p>\n", html_escape(&comparison.baseline)));
    html.push_str(&format!("<p>Current: <code>{}</code></p>\n", html_escape(&comparison.current)));
    html.push_str(&format!(
        "<p>Total: {} &rarr; {} (<strong>{}</strong>, {})</p>\n",
        format_size(totals.total_baseline),
        format_size(totals.total_current),
        format_delta(totals.total_delta),
        format_change(totals.total_percent_change())
    ));
    html.push_str("</div>\n");

    diff_table(&mut html, "Libraries", &comparison.libraries);
    diff_table(&mut html, "Sections", &comparison.sections);
    diff_table(&mut html, "Object Files", &comparison.files);

    html.push_str("</body>\n</html>\n");
    html
}

fn diff_table(html: &mut String, title: &str, report: &DiffReport) {
    html.push_str(&format!("<h2>{}</h2>\n", title));
    html.push_str("<table>\n<tr><th>Name</th><th>Baseline</th><th>Current</th><th>Change</th><th>%</th><th>Status</th></tr>\n");
    for entry in &report.entries {
        if entry.classification == Classification::Unchanged {
            continue;
        }
        html.push_str(&format!(
            "<tr class=\"{cls}\"><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td>{cls}</td></tr>\n",
            html_escape(&entry.key),
            format_size(entry.baseline_size),
            format_size(entry.current_size),
            format_delta(entry.delta),
            format_change(entry.percent_change()),
            cls = entry.classification
        ));
    }
    html.push_str("</table>\n");
}
