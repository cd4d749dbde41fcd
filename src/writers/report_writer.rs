//! Profile report rendering.
//!
//! The HTML output is self-contained (inline CSS, no scripts) and wrapped in a
//! fixed-height scrolling container so it can be embedded in a page panel.

use crate::analyzers::{ColumnProfile, CorrelationMatrix, ProfileReport};
use crate::error::Result;
use crate::utils::constants::REPORT_CONTAINER_HEIGHT_PX;
use std::fs;
use std::path::Path;
use tracing::info;

pub struct ReportWriter {
    container_height: u32,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            container_height: REPORT_CONTAINER_HEIGHT_PX,
        }
    }

    pub fn with_container_height(mut self, height: u32) -> Self {
        self.container_height = height;
        self
    }

    pub fn write_html(&self, report: &ProfileReport, path: &Path) -> Result<()> {
        fs::write(path, self.render_html(report))?;
        info!("Profile report written to {}", path.display());
        Ok(())
    }

    pub fn write_json(&self, report: &ProfileReport, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(report)?)?;
        info!("Profile data written to {}", path.display());
        Ok(())
    }

    pub fn render_html(&self, report: &ProfileReport) -> String {
        let body = format!(
            "{overview}\n{columns}\n{correlations}",
            overview = render_overview(report),
            columns = render_columns(&report.columns),
            correlations = render_correlations(&report.correlations),
        );
        wrap_scrollable(&body, self.container_height)
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap report markup in a full page with a scrolling container of fixed height
pub fn wrap_scrollable(inner: &str, height: u32) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>London Weather Data Profile</title>
    <style>{css}</style>
</head>
<body>
    <div id="container" style="height: {height}px;">
{inner}
    </div>
</body>
</html>"#,
        css = inline_css(),
        height = height,
        inner = inner,
    )
}

fn inline_css() -> &'static str {
    "body { margin: 0; padding: 0; overflow: hidden; font-family: sans-serif; } \
     #container { overflow: auto; padding: 10px; } \
     table { border-collapse: collapse; margin-bottom: 1.5em; } \
     th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: right; } \
     th:first-child, td:first-child { text-align: left; } \
     .bar { display: inline-block; background: #3498db; height: 10px; }"
}

fn render_overview(report: &ProfileReport) -> String {
    let scope = match report.filter {
        Some(range) => format!("Readings from {}", range),
        None => "Full table".to_string(),
    };

    format!(
        "<h1>Overview</h1>\n<table>\n\
         <tr><td>Scope</td><td>{}</td></tr>\n\
         <tr><td>Rows</td><td>{}</td></tr>\n\
         <tr><td>Date range</td><td>{}</td></tr>\n\
         <tr><td>Duplicate dates</td><td>{}</td></tr>\n\
         <tr><td>Missing days</td><td>{}</td></tr>\n\
         </table>",
        escape(&scope),
        report.total_rows,
        report.date_span,
        report.duplicate_dates,
        report.missing_days
    )
}

fn render_columns(columns: &[ColumnProfile]) -> String {
    let mut html = String::from(
        "<h1>Variables</h1>\n<table>\n<tr><th>Column</th><th>Count</th><th>Missing</th>\
         <th>Distinct</th><th>Zeros</th><th>Min</th><th>P25</th><th>Median</th>\
         <th>P75</th><th>Max</th><th>Mean</th><th>Std</th></tr>\n",
    );

    for column in columns {
        let p = column.percentiles;
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{} ({:.1}%)</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&column.name),
            column.count,
            column.missing,
            column.missing_percentage(),
            column.distinct,
            column.zeros,
            cell(column.min),
            cell(p.map(|p| p.p25)),
            cell(p.map(|p| p.p50)),
            cell(p.map(|p| p.p75)),
            cell(column.max),
            cell(column.mean),
            cell(column.std_dev),
        ));
    }
    html.push_str("</table>\n");

    for column in columns.iter().filter(|c| !c.histogram.is_empty()) {
        let peak = column.histogram.iter().map(|b| b.count).max().unwrap_or(1).max(1);
        html.push_str(&format!("<h2>{}</h2>\n<table>\n", escape(&column.name)));
        for bin in &column.histogram {
            html.push_str(&format!(
                "<tr><td>{:.2} to {:.2}</td><td>{}</td><td><span class=\"bar\" style=\"width: {}px;\"></span></td></tr>\n",
                bin.lower,
                bin.upper,
                bin.count,
                bin.count * 200 / peak
            ));
        }
        html.push_str("</table>\n");
    }

    html
}

fn render_correlations(matrix: &CorrelationMatrix) -> String {
    let mut html = String::from("<h1>Correlations</h1>\n<table>\n<tr><th></th>");
    for name in &matrix.columns {
        html.push_str(&format!("<th>{}</th>", escape(name)));
    }
    html.push_str("</tr>\n");

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        html.push_str(&format!("<tr><td>{}</td>", escape(name)));
        for value in row {
            html.push_str(&format!("<td>{}</td>", cell(*value)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>");
    html
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
