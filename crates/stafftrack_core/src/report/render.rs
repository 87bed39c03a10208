//! Report rendering boundary.
//!
//! The download format (PDF in the UI shell) is produced by an external
//! renderer; the core ships a plain-text table renderer for the CLI.

use super::table::ReportTable;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const EMPTY_TABLE_MESSAGE: &str = "No logs found matching your criteria.";

/// Rendering or export failure.
#[derive(Debug)]
pub enum ReportError {
    Render(String),
    Io(std::io::Error),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(message) => write!(f, "report rendering failed: {message}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Turns a report table into a downloadable document.
pub trait ReportRenderer {
    /// File extension of produced documents, without the dot.
    fn extension(&self) -> &'static str;
    fn render(&self, table: &ReportTable) -> Result<Vec<u8>, ReportError>;
}

/// Fixed-width plain-text table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTableRenderer;

impl TextTableRenderer {
    pub fn render_string(&self, table: &ReportTable) -> String {
        let widths = column_widths(table);
        let mut out = String::new();
        out.push_str(&table.title);
        out.push('\n');
        for line in &table.subtitle_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        push_row(&mut out, &table.columns, &widths);
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-");
        out.push_str(&rule);
        out.push('\n');
        if table.rows.is_empty() {
            out.push_str(EMPTY_TABLE_MESSAGE);
            out.push('\n');
        }
        for row in &table.rows {
            push_row(&mut out, row, &widths);
        }
        out
    }
}

impl ReportRenderer for TextTableRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, table: &ReportTable) -> Result<Vec<u8>, ReportError> {
        Ok(self.render_string(table).into_bytes())
    }
}

fn column_widths(table: &ReportTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|name| name.chars().count())
        .collect();
    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }
    widths
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Outcome of an export, reported as data instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub ok: bool,
    pub path: Option<PathBuf>,
    pub message: String,
}

/// Renders `table` into `out_dir`. Failures come back as a message.
pub fn export_report(
    renderer: &dyn ReportRenderer,
    table: &ReportTable,
    out_dir: &Path,
) -> ExportResult {
    let path = out_dir.join(table.file_name(renderer.extension()));
    let written = renderer
        .render(table)
        .and_then(|bytes| std::fs::write(&path, bytes).map_err(ReportError::from));

    match written {
        Ok(()) => {
            info!(
                "event=report_export module=report status=ok rows={}",
                table.rows.len()
            );
            ExportResult {
                ok: true,
                message: format!("Report saved to {}", path.display()),
                path: Some(path),
            }
        }
        Err(err) => {
            error!(
                "event=report_export module=report status=error error_code=export_failed error={err}"
            );
            ExportResult {
                ok: false,
                path: None,
                message: format!("Failed to export report: {err}"),
            }
        }
    }
}
