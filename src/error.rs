use thiserror::Error;

/// Failures while turning input text into numeric arrays.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input has a header but no data rows")]
    NoData,

    #[error("line {line} is empty")]
    EmptyLine { line: usize },

    #[error("line {line}: expected at most {expected} columns, found {found}")]
    RowTooWide {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: expected at least 3 columns, found {found}")]
    MissingColumns { line: usize, found: usize },

    #[error("line {line}, column {column}: '{token}' is not a number")]
    NotANumber {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("reading CSV")]
    Csv(#[from] csv::Error),
}

/// Input that cannot be walked onto the pressure grid.
#[derive(Debug, Error, PartialEq)]
pub enum AlignError {
    #[error("series has no rows")]
    Empty,

    #[error("row {row}: pressure is not a number")]
    MissingPressure { row: usize },

    #[error("row {row}: pressure {pressure} is lower than the previous row ({previous})")]
    Unsorted {
        row: usize,
        pressure: f64,
        previous: f64,
    },

    #[error("row {row}: pressure {pressure} appears more than once")]
    Duplicate { row: usize, pressure: f64 },
}

/// Shape mismatch between two series being subtracted.
#[derive(Debug, Error, PartialEq)]
pub enum DiffError {
    #[error("cannot subtract a {other_rows}x{other_cols} series from a {base_rows}x{base_cols} baseline")]
    ShapeMismatch {
        base_rows: usize,
        base_cols: usize,
        other_rows: usize,
        other_cols: usize,
    },
}

/// Drawing or encoding a figure failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("figure has {panels} panels but a {rows}x{cols} layout")]
    Layout {
        panels: usize,
        rows: usize,
        cols: usize,
    },

    #[error("drawing failed: {0}")]
    Backend(String),
}

/// Wrong number of positional arguments.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("wrong number of arguments ({found})\n{usage}")]
pub struct UsageError {
    pub found: usize,
    pub usage: &'static str,
}
