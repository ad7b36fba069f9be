// Tue Feb 17 2026 - Alex

use crate::demangle::{display_name, Demangle};
use crate::diff::Comparison;
use crate::report::AnalysisReport;
use serde::Serialize;
use serde_json::{json, Value};

pub fn analysis(report: &AnalysisReport, demangler: Option<&dyn Demangle>) -> String {
    let mut value = match serde_json::to_value(report) {
        Ok(v) => v,
        Err(e) => return failure(e),
    };

    if demangler.is_some() {
        if let Some(Value::Array(symbols)) = value.get_mut("top_symbols") {
            for (row, sym) in symbols.iter_mut().zip(&report.top_symbols) {
                if let Value::Object(map) = row {
                    map.insert(
                        "display_name".to_string(),
                        Value::String(display_name(demangler, &sym.name).into_owned()),
                    );
                }
            }
        }
    }

    pretty(&value)
}

pub fn comparison(comparison: &Comparison) -> String {
    let mut value = match serde_json::to_value(comparison) {
        Ok(v) => v,
        Err(e) => return failure(e),
    };

    if let Value::Object(map) = &mut value {
        map.insert(
            "total_percent_change".to_string(),
            json!(comparison.libraries.total_percent_change()),
        );
    }

    pretty(&value)
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(failure)
}

fn failure(e: serde_json::Error) -> String {
    log::error!("json rendering failed: {}", e);
    json!({ "error": e.to_string() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demangle::ItaniumDemangler;
    use crate::output::fixtures;

    #[test]
    fn test_analysis_json_shape() {
        let value: Value = serde_json::from_str(&analysis(&fixtures::analysis(), None)).unwrap();

        assert_eq!(value["total_size"], 768);
        assert_eq!(value["source"]["path"], Value::Null);
        assert_eq!(value["source"]["headers"]["Path"], "/build/App");
        assert_eq!(value["rollups"]["by_library"][0]["key"], "<main target>");
        assert!(value["top_symbols"][0].get("display_name").is_none());
    }

    #[test]
    fn test_analysis_json_adds_display_names() {
        let report = fixtures::analysis();
        let value: Value = serde_json::from_str(&analysis(&report, Some(&ItaniumDemangler))).unwrap();

        let symbols = value["top_symbols"].as_array().unwrap();
        let foo = symbols.iter().find(|s| s["name"] == "__ZN3foo3barEv").unwrap();
        assert_eq!(foo["display_name"], "foo::bar");
    }

    #[test]
    fn test_comparison_json() {
        let value: Value = serde_json::from_str(&comparison(&fixtures::comparison())).unwrap();

        assert_eq!(value["baseline"], "1.0");
        assert_eq!(value["libraries"]["total_delta"], 64);
        assert_eq!(value["libraries"]["entries"][0]["key"], "libBaz");
        assert_eq!(value["libraries"]["entries"][0]["classification"], "added");
    }
}
