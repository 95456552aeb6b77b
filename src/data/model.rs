use std::fmt;

/// Labels used when a table has fewer than the compared columns.
pub const DEFAULT_NAMES: [&str; 6] = ["Pressure", "Enthalpy", "Volume", "Bandgap1", "Bandgap2", "MagTot"];

// ---------------------------------------------------------------------------
// Series – a row-major block of floats, column 0 is pressure
// ---------------------------------------------------------------------------

/// An ordered sequence of fixed-width numeric rows.
///
/// Column 0 holds pressure. Missing or unparseable values are NaN, which
/// means `Series` deliberately has no `PartialEq`: compare with
/// [`Series::same_values`] instead.
#[derive(Debug, Clone)]
pub struct Series {
    width: usize,
    values: Vec<f64>,
}

impl Series {
    /// An empty series with `width` columns.
    pub fn new(width: usize) -> Self {
        Self::with_capacity(width, 0)
    }

    pub fn with_capacity(width: usize, rows: usize) -> Self {
        assert!(width > 0, "a series needs at least one column");
        Series {
            width,
            values: Vec::with_capacity(width * rows),
        }
    }

    /// Build a series from literal rows. Rows are clipped or NaN-padded to `width`.
    pub fn from_rows<R: AsRef<[f64]>>(width: usize, rows: &[R]) -> Self {
        let mut series = Self::with_capacity(width, rows.len());
        for row in rows {
            series.push_row(row.as_ref());
        }
        series
    }

    /// Append a row, dropping extra values and padding short rows with NaN.
    pub fn push_row(&mut self, row: &[f64]) {
        let keep = row.len().min(self.width);
        self.values.extend_from_slice(&row[..keep]);
        self.values
            .extend(std::iter::repeat(f64::NAN).take(self.width - keep));
    }

    /// Append a row of NaN, the marker for an absent pressure checkpoint.
    pub fn push_nan_row(&mut self) {
        self.values
            .extend(std::iter::repeat(f64::NAN).take(self.width));
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.values[index * self.width..(index + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.width)
    }

    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.width + column]
    }

    pub(crate) fn value_mut(&mut self, row: usize, column: usize) -> &mut f64 {
        &mut self.values[row * self.width + column]
    }

    /// Copy of one column. Out-of-range columns read as NaN.
    pub fn column(&self, column: usize) -> Vec<f64> {
        if column >= self.width {
            return vec![f64::NAN; self.len()];
        }
        self.rows().map(|row| row[column]).collect()
    }

    pub fn pressures(&self) -> Vec<f64> {
        self.column(0)
    }

    /// The same rows clipped or NaN-padded to exactly `width` columns.
    pub fn with_width(&self, width: usize) -> Series {
        let mut out = Series::with_capacity(width, self.len());
        for row in self.rows() {
            out.push_row(row);
        }
        out
    }

    /// Element-wise equality treating NaN as equal to NaN.
    pub fn same_values(&self, other: &Series) -> bool {
        self.width == other.width
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

// ---------------------------------------------------------------------------
// VariableNames – column labels parallel to a Series
// ---------------------------------------------------------------------------

/// Ordered column labels taken from a table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableNames(Vec<String>);

impl VariableNames {
    pub fn new(names: Vec<String>) -> Self {
        VariableNames(names)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label for `column`, falling back to the canonical name or `ColumnN`.
    pub fn get(&self, column: usize) -> String {
        match self.0.get(column) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => DEFAULT_NAMES
                .get(column)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Column{column}")),
        }
    }

    /// First `width` labels, filling gaps with the fallback labels.
    pub fn with_width(&self, width: usize) -> VariableNames {
        VariableNames((0..width).map(|i| self.get(i)).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for VariableNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Table – one parsed comparison file
// ---------------------------------------------------------------------------

/// A parsed comma-delimited property table.
#[derive(Debug, Clone)]
pub struct Table {
    pub series: Series,
    pub names: VariableNames,
}

// ---------------------------------------------------------------------------
// DosSpectrum – one parsed density-of-states file
// ---------------------------------------------------------------------------

/// Spin-resolved density of states sampled along an energy axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DosSpectrum {
    /// Spin-1 occupation, negated so it draws on the left half of the plot.
    pub spin1: Vec<f64>,
    /// Spin-2 occupation.
    pub spin2: Vec<f64>,
    /// Energy axis, same length as the occupations.
    pub energy: Vec<f64>,
}

impl DosSpectrum {
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }
}
