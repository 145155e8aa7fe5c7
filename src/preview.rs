//! ASCII previews of induced tables.

use crate::schema::Table;

/// Default cell width used by the CLI.
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 30;

/// Render a table's rows as a bordered grid.
///
/// Columns are the primary key (if any) followed by every field. Text cells are
/// shown quoted, missing cells as `None`, and every cell is cut to
/// `max_column_width` characters.
pub fn render_table(table: &Table, max_column_width: usize) -> String {
    let keys = table.columns();
    let cells: Vec<Vec<String>> = table
        .rows
        .values()
        .map(|row| {
            keys.iter()
                .map(|key| {
                    let text = row
                        .get(key)
                        .map_or_else(|| "None".to_string(), ToString::to_string);
                    text.chars().take(max_column_width).collect()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(key.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = format!(
        "+-{}-+",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    let line = |values: &[&str]| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut out = Vec::with_capacity(cells.len() + 4);
    out.push(border.clone());
    out.push(line(&keys));
    out.push(border.clone());
    for row in &cells {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(line(&values));
    }
    out.push(border);
    out.join("\n")
}
