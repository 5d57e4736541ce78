//! Plain-text history report.

use chrono::{DateTime, Local};
use serde::Serialize;

/// One numbered row of an exported history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub index: usize,
    pub expression: String,
    pub result: String,
}

/// Render rows as a titled text table.
pub fn render_table(rows: &[ExportRow], exported_at: DateTime<Local>) -> String {
    let expression_width = rows
        .iter()
        .map(|row| row.expression.chars().count())
        .chain(std::iter::once("Expression".len()))
        .max()
        .unwrap_or(0);
    let index_width = rows.len().to_string().len().max(1);

    let mut out = String::new();
    out.push_str("Calculation History\n");
    out.push_str(&format!(
        "Exported on: {}\n\n",
        exported_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "{:>iw$}  {:<ew$}  {}\n",
        "#",
        "Expression",
        "Result",
        iw = index_width,
        ew = expression_width
    ));
    for row in rows {
        out.push_str(&format!(
            "{:>iw$}  {:<ew$}  {}\n",
            row.index,
            row.expression,
            row.result,
            iw = index_width,
            ew = expression_width
        ));
    }
    out
}
