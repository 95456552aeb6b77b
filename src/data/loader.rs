use std::path::Path;

use anyhow::{Context, Result};

use super::model::{DosSpectrum, Series, Table, VariableNames};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a comma-delimited property table from disk.
pub fn load_table(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading table {}", path.display()))?;
    let table = parse_table(&text).with_context(|| format!("parsing table {}", path.display()))?;
    log::info!(
        "Loaded {} rows x {} columns from {} ({})",
        table.series.len(),
        table.series.width(),
        path.display(),
        table.names
    );
    Ok(table)
}

/// Load a whitespace-delimited density-of-states file from disk.
pub fn load_dos(path: &Path) -> Result<DosSpectrum> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading DOS file {}", path.display()))?;
    let dos = parse_dos(&text).with_context(|| format!("parsing DOS file {}", path.display()))?;
    log::info!("Loaded {} DOS points from {}", dos.len(), path.display());
    Ok(dos)
}

// ---------------------------------------------------------------------------
// Table parser
// ---------------------------------------------------------------------------

/// Table layout: one header row naming the variables, then numeric rows.
///
/// The first data row fixes the column count; the header is cut (or padded)
/// to match. Tokens that do not parse as floats become NaN, short rows are
/// NaN-padded, and rows wider than the first one are rejected. Every line
/// after the header must hold data: a blank line is an error.
pub fn parse_table(text: &str) -> Result<Table, ParseError> {
    // The CSV reader drops empty records, so blank lines are caught here.
    if let Some(i) = text.lines().skip(1).position(|line| line.trim().is_empty()) {
        return Err(ParseError::EmptyLine { line: i + 2 });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut series: Option<Series> = None;
    for result in reader.records() {
        let record = result?;
        let series = series.get_or_insert_with(|| Series::new(record.len().max(1)));

        if record.len() > series.width() {
            return Err(ParseError::RowTooWide {
                line: record.position().map_or(0, |p| p.line() as usize),
                expected: series.width(),
                found: record.len(),
            });
        }

        let row: Vec<f64> = record.iter().map(parse_or_nan).collect();
        series.push_row(&row);
    }

    let series = series.ok_or(ParseError::NoData)?;
    let names = VariableNames::new(header).with_width(series.width());
    Ok(Table { series, names })
}

fn parse_or_nan(token: &str) -> f64 {
    token.parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Triplet parser
// ---------------------------------------------------------------------------

/// DOS layout: `spin1 spin2 energy` per line, whitespace separated, no header.
/// Spin 1 is negated so both channels can share one energy axis.
pub fn parse_dos(text: &str) -> Result<DosSpectrum, ParseError> {
    let mut dos = DosSpectrum::default();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(ParseError::MissingColumns {
                line: line_no,
                found: tokens.len(),
            });
        }

        let mut values = [0.0; 3];
        for (column, (slot, token)) in values.iter_mut().zip(&tokens).enumerate() {
            *slot = token.parse::<f64>().map_err(|_| ParseError::NotANumber {
                line: line_no,
                column,
                token: token.to_string(),
            })?;
        }

        dos.spin1.push(-values[0]);
        dos.spin2.push(values[1]);
        dos.energy.push(values[2]);
    }

    Ok(dos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_token_becomes_nan() {
        let table = parse_table("P,H,V\n1.0,2.0,x").unwrap();

        assert_eq!(table.series.len(), 1);
        assert_eq!(table.series.width(), 3);
        let row = table.series.row(0);
        assert_eq!(&row[..2], &[1.0, 2.0]);
        assert!(row[2].is_nan());
        assert_eq!(table.names.as_slice(), &["P", "H", "V"]);
    }

    #[test]
    fn header_is_cut_to_first_data_row() {
        let table = parse_table("P,H,V,Extra\n0,1,2\n2,3,4\n").unwrap();
        assert_eq!(table.names.as_slice(), &["P", "H", "V"]);
        assert_eq!(table.series.column(2), vec![2.0, 4.0]);
    }

    #[test]
    fn short_rows_are_nan_padded() {
        let table = parse_table("P,H,V\n0,1,2\n2,3\n").unwrap();
        assert_eq!(table.series.value(1, 1), 3.0);
        assert!(table.series.value(1, 2).is_nan());
    }

    #[test]
    fn wide_rows_are_rejected() {
        let err = parse_table("P,H\n0,1\n2,3,4\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::RowTooWide {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn blank_line_is_an_error() {
        let err = parse_table("P,H,V\n0,1,2\n\n2,3,4\n").unwrap_err();
        assert!(matches!(err, ParseError::EmptyLine { line: 3 }));

        let err = parse_table("P,H,V\n0,1,2\n   \n").unwrap_err();
        assert!(matches!(err, ParseError::EmptyLine { line: 3 }));

        // A single trailing newline ends the last row; it is not a blank line.
        assert_eq!(parse_table("P,H,V\n0,1,2\n").unwrap().series.len(), 1);
    }

    #[test]
    fn wide_row_reports_its_line() {
        let err = parse_table("P,H\n0,1\n2,3\n4,5,6\n").unwrap_err();
        assert!(matches!(err, ParseError::RowTooWide { line: 4, .. }));
    }

    #[test]
    fn header_only_is_an_error() {
        assert!(matches!(parse_table("P,H,V\n"), Err(ParseError::NoData)));
        assert!(matches!(parse_table(""), Err(ParseError::NoData)));
    }

    #[test]
    fn trailing_delimiter_adds_a_nan_column() {
        let table = parse_table("P,H,\n0,1,\n").unwrap();
        assert_eq!(table.series.width(), 3);
        assert!(table.series.value(0, 2).is_nan());
        assert_eq!(table.names.get(2), "Volume");
    }

    #[test]
    fn dos_negates_spin_one() {
        let dos = parse_dos("0.5 0.25 -3.0\n1.0 2.0 -2.5 extra\n").unwrap();
        assert_eq!(dos.spin1, vec![-0.5, -1.0]);
        assert_eq!(dos.spin2, vec![0.25, 2.0]);
        assert_eq!(dos.energy, vec![-3.0, -2.5]);
    }

    #[test]
    fn dos_rejects_short_lines() {
        let err = parse_dos("0.5 0.25 -3.0\n1.0 2.0\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingColumns { line: 2, found: 2 }));
    }

    #[test]
    fn dos_rejects_non_numeric_tokens() {
        let err = parse_dos("0.5 abc -3.0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::NotANumber {
                line: 1,
                column: 1,
                ..
            }
        ));
    }

    #[test]
    fn load_table_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_table(&dir.path().join("absent.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.csv"));
    }
}
