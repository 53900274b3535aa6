use std::fmt::{Display, Formatter};
use std::io::Write;

use ferrodcf_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    out: &mut impl Write,
    envelope: &Envelope<Value>,
    table: Option<&str>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut *out, envelope)?;
            } else {
                serde_json::to_writer(&mut *out, envelope)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Table => render_table(out, envelope, table)?,
    }

    out.flush()?;
    Ok(())
}

/// Metadata header followed by the command's own table, or the data as
/// indented JSON when the command has none.
fn render_table(
    out: &mut impl Write,
    envelope: &Envelope<Value>,
    table: Option<&str>,
) -> Result<(), CliError> {
    let meta = &envelope.meta;
    let sources = meta
        .source_chain
        .iter()
        .map(|source| source.as_str())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "request_id  : {}", meta.request_id)?;
    writeln!(out, "schema      : {}", meta.schema_version)?;
    writeln!(out, "generated_at: {}", meta.generated_at_rfc3339())?;
    if let Some(ticker) = &meta.ticker {
        writeln!(out, "ticker      : {ticker}")?;
    }
    writeln!(out, "sources     : {sources}")?;
    writeln!(out, "latency_ms  : {}", meta.latency_ms)?;

    if !meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    match table {
        Some(table) if !envelope.data.is_null() => {
            writeln!(out)?;
            write!(out, "{table}")?;
        }
        _ => {
            writeln!(out, "data:")?;
            for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            match error.source {
                Some(source) => writeln!(out, "  - [{source}] {}: {}", error.code, error.message)?,
                None => writeln!(out, "  - {}: {}", error.code, error.message)?,
            }
        }
    }

    Ok(())
}

/// Fixed-width text table; the first column is left-aligned, the rest right.
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            title: None,
            headers: headers.iter().map(|header| (*header).to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = self.headers.iter().map(String::len).collect::<Vec<_>>();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                match widths.get_mut(index) {
                    Some(width) => *width = (*width).max(cell.len()),
                    None => widths.push(cell.len()),
                }
            }
        }
        widths
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let widths = self.widths();
        let write_row = |f: &mut Formatter<'_>, cells: &[String]| -> std::fmt::Result {
            for (index, cell) in cells.iter().enumerate() {
                let width = widths.get(index).copied().unwrap_or(0);
                if index == 0 {
                    write!(f, "{cell:<width$}")?;
                } else {
                    write!(f, "  {cell:>width$}")?;
                }
            }
            writeln!(f)
        };

        if let Some(title) = &self.title {
            writeln!(f, "{title}")?;
        }
        write_row(f, &self.headers)?;
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(f, "{}", "-".repeat(total))?;
        for row in &self.rows {
            write_row(f, row)?;
        }
        Ok(())
    }
}

/// Money-like amount with thousands separators and no decimals.
pub fn amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn per_share(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use ferrodcf_core::{EnvelopeError, EnvelopeMeta, ProviderId, SourceError};
    use serde_json::json;

    use super::*;

    fn envelope(data: Value, errors: Vec<EnvelopeError>) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", "v1.0.0", vec![ProviderId::Fixture])
            .expect("valid meta");
        Envelope::new(meta, data, errors).expect("valid envelope")
    }

    fn rendered(envelope: &Envelope<Value>, table: Option<&str>, format: OutputFormat) -> String {
        let mut out = Vec::new();
        render(&mut out, envelope, table, format, false).expect("renders");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn table_output_puts_the_command_table_under_the_header() {
        let envelope = envelope(json!({"intrinsic_value": 1.0}), Vec::new());

        let text = rendered(&envelope, Some("item  value\n"), OutputFormat::Table);
        assert!(text.starts_with("request_id  : request-12345\n"));
        assert!(text.contains("sources     : fixture\n"));
        assert!(text.ends_with("\nitem  value\n"));
    }

    #[test]
    fn failed_run_lists_errors_with_their_source() {
        let error = EnvelopeError::snapshot_source(
            ProviderId::Fixture,
            &SourceError::data_unavailable("no fixture snapshot for 'ZZZZ'"),
        );
        let envelope = envelope(Value::Null, vec![error]);

        let text = rendered(&envelope, Some("unused"), OutputFormat::Table);
        assert!(text.contains("data:\n  null\n"));
        assert!(text.contains("  - [fixture] source.data_unavailable: "));
        assert!(!text.contains("unused"));
    }

    #[test]
    fn json_output_is_one_line() {
        let envelope = envelope(json!({"intrinsic_value": 1.0}), Vec::new());

        let text = rendered(&envelope, None, OutputFormat::Json);
        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(parsed["data"]["intrinsic_value"], 1.0);
    }

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(amount(391_000.4), "391,000");
        assert_eq!(amount(-1_234_567.0), "-1,234,567");
        assert_eq!(amount(999.6), "1,000");
        assert_eq!(amount(0.2), "0");
    }

    #[test]
    fn table_aligns_columns() {
        let mut table = Table::new(&["year", "fcff"]).with_title("projection");
        table.push_row(vec![String::from("1"), amount(12_345.0)]);
        table.push_row(vec![String::from("10"), amount(5.0)]);

        let rendered = table.to_string();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "projection");
        assert_eq!(lines[1], "year    fcff");
        assert_eq!(lines[3], "1     12,345");
        assert_eq!(lines[4], "10         5");
    }
}
