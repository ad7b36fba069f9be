// Tue Feb 17 2026 - Alex

use crate::demangle::{display_name, Demangle};
use crate::diff::{Comparison, DiffReport};
use crate::output::formatter::csv_escape;
use crate::report::AnalysisReport;
use crate::rollup::RollupRow;

pub fn analysis(report: &AnalysisReport, demangler: Option<&dyn Demangle>) -> String {
    let mut csv = String::new();

    csv.push_str("view,key,size,count,percent_of_total,library,section\n");

    push_rows(&mut csv, "section", &report.rollups.by_section);
    push_rows(&mut csv, "library", &report.rollups.by_library);
    push_rows(&mut csv, "file", &report.rollups.by_file);

    for sym in &report.top_symbols {
        csv.push_str(&format!(
            "symbol,{},{},1,{:.6},{},{}\n",
            csv_escape(&display_name(demangler, &sym.name)),
            sym.size,
            sym.percent_of_total,
            csv_escape(&sym.library),
            csv_escape(&sym.section)
        ));
    }

    csv
}

fn push_rows(csv: &mut String, view: &str, rows: &[RollupRow]) {
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{:.6},,\n",
            view,
            csv_escape(&row.key),
            row.size,
            row.count,
            row.percent_of_total
        ));
    }
}

pub fn comparison(comparison: &Comparison) -> String {
    let mut csv = String::new();

    csv.push_str("level,key,baseline_size,current_size,delta,percent_change,classification\n");

    push_entries(&mut csv, "library", &comparison.libraries);
    push_entries(&mut csv, "section", &comparison.sections);
    push_entries(&mut csv, "file", &comparison.files);

    csv
}

fn push_entries(csv: &mut String, level: &str, report: &DiffReport) {
    for entry in &report.entries {
        let change = entry
            .percent_change()
            .map(|p| format!("{:.6}", p))
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            level,
            csv_escape(&entry.key),
            entry.baseline_size,
            entry.current_size,
            entry.delta,
            change,
            entry.classification
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    #[test]
    fn test_analysis_csv_rows() {
        let csv = analysis(&fixtures::analysis(), None);
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("view,key,size,count,percent_of_total,library,section"));
        assert!(csv.contains("section,\"__TEXT,__text\",768,3,1.000000,,"));
        assert!(csv.contains("library,<main target>,384,1,0.500000,,"));
        assert!(csv.contains("symbol,_main,384,1,0.500000,<main target>,\"__TEXT,__text\""));
    }

    #[test]
    fn test_comparison_csv_rows() {
        let csv = comparison(&fixtures::comparison());

        assert!(csv.contains("library,libBar,128,0,-128,-1.000000,removed"));
        assert!(csv.contains("library,libBaz,0,160,160,,added"));
        assert!(csv.contains("library,<main target>,384,384,0,0.000000,unchanged"));
    }
}
