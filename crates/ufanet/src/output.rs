//! Output rendering: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses
//! `tabled`, JSON serializes the original data via serde, plain emits
//! one identifier per line for scripting.

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render a list of serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            if data.is_empty() {
                return Ok("(none)".into());
            }
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: u64,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: u64,
    }

    fn to_row(item: &Item) -> Row {
        Row { id: item.id }
    }

    #[test]
    fn json_output_is_pretty_printed() {
        let out = render_list(&OutputFormat::Json, &[Item { id: 7 }], to_row, |i| {
            i.id.to_string()
        })
        .unwrap();
        assert!(out.contains("\"id\": 7"), "unexpected output: {out}");
    }

    #[test]
    fn plain_output_is_one_id_per_line() {
        let items = [Item { id: 1 }, Item { id: 2 }];
        let out = render_list(&OutputFormat::Plain, &items, to_row, |i| i.id.to_string()).unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn empty_table_renders_placeholder() {
        let out =
            render_list(&OutputFormat::Table, &[], to_row, |i: &Item| i.id.to_string()).unwrap();
        assert_eq!(out, "(none)");
    }
}
