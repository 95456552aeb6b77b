use super::model::Series;
use crate::error::DiffError;

/// Row-wise `other - baseline`, keeping `other`'s pressures in column 0.
///
/// Both series must already be aligned to the same grid. NaN rows propagate
/// into the result without error.
pub fn difference(baseline: &Series, other: &Series) -> Result<Series, DiffError> {
    if baseline.len() != other.len() || baseline.width() != other.width() {
        return Err(DiffError::ShapeMismatch {
            base_rows: baseline.len(),
            base_cols: baseline.width(),
            other_rows: other.len(),
            other_cols: other.width(),
        });
    }

    let mut result = Series::with_capacity(other.width(), other.len());
    for (base, row) in baseline.rows().zip(other.rows()) {
        let diff: Vec<f64> = row.iter().zip(base).map(|(o, b)| o - b).collect();
        result.push_row(&diff);
    }
    for i in 0..result.len() {
        *result.value_mut(i, 0) = other.value(i, 0);
    }
    Ok(result)
}
