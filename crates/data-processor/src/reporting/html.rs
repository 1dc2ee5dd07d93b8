//! Self-contained HTML report.

use crate::types::{CleaningReport, DatasetSummary};
use serde_json::Value;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#f0f0f0}img{max-width:800px;display:block;margin-bottom:1em}";

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => escape_html(s),
        Some(other) => escape_html(&other.to_string()),
    }
}

/// Render the report page.
///
/// `plots` are file names relative to the page.
pub fn render_report(
    title: &str,
    summary: &DatasetSummary,
    cleaning: &CleaningReport,
    plots: &[String],
) -> String {
    let mut html = String::new();
    // writing into a String cannot fail
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<h1>{}</h1>\n<p>Generated {}</p>\n",
        escape_html(title),
        STYLE,
        escape_html(title),
        escape_html(&summary.generated_at)
    );

    let _ = write!(
        html,
        "<h2>Overview</h2>\n<table>\n<tr><th></th><th>Rows</th><th>Columns</th></tr>\n\
         <tr><td>Before</td><td>{}</td><td>{}</td></tr>\n\
         <tr><td>After</td><td>{}</td><td>{}</td></tr>\n</table>\n",
        summary.original_rows, summary.original_columns, summary.final_rows, summary.final_columns
    );

    html.push_str("<h2>Cleaning</h2>\n<ul>\n");
    let dropped = if cleaning.dropped_columns.is_empty() {
        "none".to_string()
    } else {
        cleaning.dropped_columns.join(", ")
    };
    let _ = writeln!(html, "<li>Dropped columns: {}</li>", escape_html(&dropped));
    let _ = writeln!(
        html,
        "<li>Duplicate rows removed: {}</li>",
        cleaning.duplicates_removed
    );
    let _ = writeln!(html, "<li>Fill method: {}</li>", cleaning.fill_method);
    for action in &cleaning.actions {
        let _ = writeln!(html, "<li>{}</li>", escape_html(action));
    }
    html.push_str("</ul>\n");

    html.push_str(
        "<h2>Column statistics</h2>\n<table>\n<tr><th>Column</th><th>Type</th><th>Missing</th>\
         <th>Unique</th><th>Min</th><th>Max</th><th>Mean</th><th>Mode</th></tr>\n",
    );
    for stats in &summary.columns {
        let mean = stats.mean.map(|m| format!("{m:.4}")).unwrap_or_default();
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&stats.name),
            stats.kind,
            stats.missing,
            stats.unique,
            cell(stats.min.as_ref()),
            cell(stats.max.as_ref()),
            mean,
            cell(stats.mode.as_ref())
        );
    }
    html.push_str("</table>\n");

    html.push_str(
        "<h2>Missing values</h2>\n<table>\n<tr><th>Column</th><th>Before fill</th><th>After</th></tr>\n",
    );
    for (name, before) in &cleaning.missing_before {
        let after = summary
            .missing
            .get(name)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "dropped".to_string());
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(name),
            before,
            after
        );
    }
    html.push_str("</table>\n");

    if !summary.sample.is_empty() {
        // column order follows the table, not the record keys
        let names: Vec<&str> = summary.columns.iter().map(|c| c.name.as_str()).collect();
        html.push_str("<h2>Sample rows</h2>\n<table>\n<tr>");
        for name in &names {
            let _ = write!(html, "<th>{}</th>", escape_html(name));
        }
        html.push_str("</tr>\n");
        for record in &summary.sample {
            html.push_str("<tr>");
            for name in &names {
                let _ = write!(html, "<td>{}</td>", cell(record.get(*name)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    }

    if !plots.is_empty() {
        html.push_str("<h2>Histograms</h2>\n");
        for plot in plots {
            let name = escape_html(plot);
            let _ = writeln!(html, "<img src=\"{name}\" alt=\"{name}\">");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FillMethod;
    use crate::table::ColumnKind;
    use crate::types::ColumnStats;
    use serde_json::{Map, json};
    use std::collections::BTreeMap;

    fn summary() -> DatasetSummary {
        let mut record = Map::new();
        record.insert("name".to_string(), json!("<b>Bob</b>"));
        DatasetSummary {
            generated_at: "2024-01-01 00:00:00".to_string(),
            original_rows: 3,
            original_columns: 3,
            final_rows: 2,
            final_columns: 2,
            remaining_duplicates: 0,
            column_types: BTreeMap::from([("name".to_string(), ColumnKind::Text)]),
            missing: BTreeMap::from([("name".to_string(), 0)]),
            columns: vec![ColumnStats {
                name: "name".to_string(),
                kind: ColumnKind::Text,
                dtype: "str".to_string(),
                missing: 0,
                unique: 1,
                min: None,
                max: None,
                mean: None,
                mode: Some(json!("<b>Bob</b>")),
            }],
            sample: vec![record],
        }
    }

    fn cleaning() -> CleaningReport {
        CleaningReport {
            renamed_columns: Vec::new(),
            missing_before: BTreeMap::from([("name".to_string(), 0), ("notes".to_string(), 3)]),
            dropped_columns: vec!["notes".to_string()],
            fill_method: FillMethod::Ffill,
            dedup_columns: vec!["name".to_string()],
            duplicates_removed: 1,
            actions: vec!["Removed 1 duplicate rows (33.3%)".to_string()],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_report_escapes_values() {
        let html = render_report("Report for a<b>.csv", &summary(), &cleaning(), &[]);
        assert!(html.contains("Report for a&lt;b&gt;.csv"));
        assert!(html.contains("&lt;b&gt;Bob&lt;/b&gt;"));
        assert!(!html.contains("<b>Bob</b>"));
    }

    #[test]
    fn test_report_sections() {
        let plots = vec!["hist_age.png".to_string()];
        let html = render_report("data.csv", &summary(), &cleaning(), &plots);

        assert!(html.contains("Dropped columns: notes"));
        assert!(html.contains("Duplicate rows removed: 1"));
        assert!(html.contains("<td>notes</td><td>3</td><td>dropped</td>"));
        assert!(html.contains("<img src=\"hist_age.png\""));
    }

    #[test]
    fn test_sample_columns_follow_table_order() {
        use crate::reporting::build_summary;
        use crate::table::Table;
        use polars::prelude::*;

        let table = Table::new(df!["zeta" => [1i64], "alpha" => ["a"]].unwrap());
        let summary = build_summary(&table, 1, 2, &table.column_names()).unwrap();

        let keys: Vec<&str> = summary.sample[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let html = render_report("t.csv", &summary, &cleaning(), &[]);
        assert!(html.contains("<tr><th>zeta</th><th>alpha</th></tr>"));
    }
}
