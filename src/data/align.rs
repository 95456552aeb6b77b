use anyhow::Context;

use super::model::Series;
use crate::error::AlignError;

/// Columns kept for comparison: pressure, enthalpy, volume, bandgap (spin 1),
/// bandgap (spin 2) and total magnetization.
pub const COMPARED_COLUMNS: usize = 6;

/// A first pressure above this is treated as a missing zero-pressure point.
pub const ZERO_PRESSURE_EPSILON: f64 = 0.001;

// ---------------------------------------------------------------------------
// PressureGrid – the checkpoints every compared series is forced onto
// ---------------------------------------------------------------------------

/// Ascending pressure checkpoints (kbar).
#[derive(Debug, Clone, PartialEq)]
pub struct PressureGrid {
    checkpoints: Vec<f64>,
}

impl PressureGrid {
    /// `0`, every 2 kbar up to 10, then every 20 kbar up to 380.
    pub fn canonical() -> Self {
        let checkpoints = std::iter::once(0.0)
            .chain((2..=10).step_by(2).map(f64::from))
            .chain((20..400).step_by(20).map(f64::from))
            .collect();
        PressureGrid { checkpoints }
    }

    pub fn checkpoints(&self) -> &[f64] {
        &self.checkpoints
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

impl Default for PressureGrid {
    fn default() -> Self {
        Self::canonical()
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Force `series` onto `grid` so several series can be compared row by row.
///
/// The result has one row per checkpoint, followed by any input rows past the
/// last checkpoint (or a single NaN row when there are none). Checkpoints the
/// input does not reach are filled with NaN rows; nothing is interpolated.
///
/// Pressures must be numeric and strictly ascending. An off-grid sample sits
/// in the slot of the next checkpoint at or above it, since the walk only ever
/// inserts gaps and never drops rows.
pub fn align_to_grid(series: &Series, grid: &PressureGrid) -> Result<Series, AlignError> {
    let series = series.with_width(COMPARED_COLUMNS);
    check_pressures(&series)?;

    let mut aligned = Series::with_capacity(COMPARED_COLUMNS, grid.len() + series.len());
    let mut next = 0;
    let mut gaps = 0;

    for (k, &checkpoint) in grid.checkpoints().iter().enumerate() {
        let present = next < series.len() && {
            let pressure = series.value(next, 0);
            if k == 0 {
                pressure <= checkpoint + ZERO_PRESSURE_EPSILON
            } else {
                pressure.trunc() <= checkpoint
            }
        };

        if present {
            aligned.push_row(series.row(next));
            next += 1;
        } else {
            aligned.push_nan_row();
            gaps += 1;
        }
    }

    if next < series.len() {
        for row in series.rows().skip(next) {
            aligned.push_row(row);
        }
    } else {
        aligned.push_nan_row();
    }

    log::debug!(
        "Aligned {} rows onto {} checkpoints: {} gaps, {} trailing rows",
        series.len(),
        grid.len(),
        gaps,
        aligned.len() - grid.len()
    );
    Ok(aligned)
}

/// Align every named series, then NaN-pad the shorter results so all share
/// one length. A failure names the series that could not be aligned.
pub fn align_all(named: &[(&str, &Series)], grid: &PressureGrid) -> anyhow::Result<Vec<Series>> {
    let mut aligned = named
        .iter()
        .map(|&(name, series)| {
            align_to_grid(series, grid).with_context(|| format!("aligning {name} to the pressure grid"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    pad_to_common_length(&mut aligned);
    Ok(aligned)
}

/// Append NaN rows until every series is as long as the longest one.
pub fn pad_to_common_length(series: &mut [Series]) {
    let rows = series.iter().map(Series::len).max().unwrap_or(0);
    for s in series {
        while s.len() < rows {
            s.push_nan_row();
        }
    }
}

fn check_pressures(series: &Series) -> Result<(), AlignError> {
    if series.is_empty() {
        return Err(AlignError::Empty);
    }

    let mut previous: Option<f64> = None;
    for (row, values) in series.rows().enumerate() {
        let pressure = values[0];
        if pressure.is_nan() {
            return Err(AlignError::MissingPressure { row });
        }
        if let Some(previous) = previous {
            if pressure == previous {
                return Err(AlignError::Duplicate { row, pressure });
            }
            if pressure < previous {
                return Err(AlignError::Unsorted {
                    row,
                    pressure,
                    previous,
                });
            }
        }
        previous = Some(pressure);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_at(pressures: &[f64]) -> Series {
        let rows: Vec<Vec<f64>> = pressures
            .iter()
            .map(|&p| vec![p, -p, 10.0 + p, 1.0, 2.0, 0.5])
            .collect();
        Series::from_rows(COMPARED_COLUMNS, &rows)
    }

    fn is_nan_row(row: &[f64]) -> bool {
        row.iter().all(|v| v.is_nan())
    }

    #[test]
    fn canonical_grid_has_twenty_five_points() {
        let grid = PressureGrid::canonical();
        assert_eq!(grid.len(), 25);
        assert_eq!(&grid.checkpoints()[..7], &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 20.0]);
        assert_eq!(grid.checkpoints().last(), Some(&380.0));
    }

    #[test]
    fn on_grid_series_is_unchanged() {
        let grid = PressureGrid::canonical();
        let series = rows_at(grid.checkpoints());

        let aligned = align_to_grid(&series, &grid).unwrap();

        let mut expected = series.clone();
        expected.push_nan_row();
        assert!(aligned.same_values(&expected));
    }

    #[test]
    fn missing_internal_checkpoint_gets_one_gap() {
        let grid = PressureGrid::canonical();
        let pressures: Vec<f64> = grid
            .checkpoints()
            .iter()
            .copied()
            .filter(|&p| p != 6.0)
            .collect();

        let aligned = align_to_grid(&rows_at(&pressures), &grid).unwrap();

        assert_eq!(aligned.len(), grid.len() + 1);
        assert_eq!(aligned.value(2, 0), 4.0);
        assert!(is_nan_row(aligned.row(3)));
        assert_eq!(aligned.value(4, 0), 8.0);
        assert_eq!(aligned.pressures()[5..grid.len()], grid.checkpoints()[5..]);
    }

    #[test]
    fn missing_zero_pressure_is_filled() {
        let grid = PressureGrid::canonical();
        let aligned = align_to_grid(&rows_at(&[2.0, 4.0]), &grid).unwrap();

        assert!(is_nan_row(aligned.row(0)));
        assert_eq!(aligned.value(1, 0), 2.0);
        assert_eq!(aligned.value(2, 0), 4.0);
        assert!((3..aligned.len()).all(|i| is_nan_row(aligned.row(i))));
        assert_eq!(aligned.len(), grid.len() + 1);
    }

    #[test]
    fn near_zero_pressure_counts_as_zero() {
        let grid = PressureGrid::canonical();
        let aligned = align_to_grid(&rows_at(&[0.0005, 2.0]), &grid).unwrap();
        assert_eq!(aligned.value(0, 0), 0.0005);
        assert_eq!(aligned.value(1, 0), 2.0);
    }

    #[test]
    fn fractional_pressures_truncate_onto_checkpoints() {
        let grid = PressureGrid::canonical();
        let aligned = align_to_grid(&rows_at(&[0.0, 2.4, 4.9, 20.5]), &grid).unwrap();

        assert_eq!(aligned.value(1, 0), 2.4);
        assert_eq!(aligned.value(2, 0), 4.9);
        assert!(is_nan_row(aligned.row(3)));
        assert_eq!(aligned.value(6, 0), 20.5);
    }

    #[test]
    fn rows_past_the_grid_are_kept() {
        let grid = PressureGrid::canonical();
        let mut pressures = grid.checkpoints().to_vec();
        pressures.extend([400.0, 420.0]);

        let aligned = align_to_grid(&rows_at(&pressures), &grid).unwrap();

        assert_eq!(aligned.len(), grid.len() + 2);
        assert_eq!(aligned.value(grid.len(), 0), 400.0);
        assert_eq!(aligned.value(grid.len() + 1, 0), 420.0);
    }

    #[test]
    fn columns_are_clipped_and_padded() {
        let grid = PressureGrid::canonical();
        let wide = Series::from_rows(8, &[[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]]);
        let narrow = Series::from_rows(3, &[[0.0, 1.0, 2.0]]);

        let wide = align_to_grid(&wide, &grid).unwrap();
        let narrow = align_to_grid(&narrow, &grid).unwrap();

        assert_eq!(wide.width(), COMPARED_COLUMNS);
        assert_eq!(wide.row(0), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(narrow.width(), COMPARED_COLUMNS);
        assert_eq!(&narrow.row(0)[..3], &[0.0, 1.0, 2.0]);
        assert!(narrow.row(0)[3..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn unsorted_and_duplicate_pressures_are_rejected() {
        let grid = PressureGrid::canonical();
        assert_eq!(
            align_to_grid(&rows_at(&[0.0, 4.0, 2.0]), &grid).unwrap_err(),
            AlignError::Unsorted {
                row: 2,
                pressure: 2.0,
                previous: 4.0
            }
        );
        assert_eq!(
            align_to_grid(&rows_at(&[0.0, 2.0, 2.0]), &grid).unwrap_err(),
            AlignError::Duplicate {
                row: 2,
                pressure: 2.0
            }
        );
    }

    #[test]
    fn nan_pressure_and_empty_input_are_rejected() {
        let grid = PressureGrid::canonical();
        assert_eq!(
            align_to_grid(&rows_at(&[0.0, f64::NAN]), &grid).unwrap_err(),
            AlignError::MissingPressure { row: 1 }
        );
        assert_eq!(
            align_to_grid(&Series::new(6), &grid).unwrap_err(),
            AlignError::Empty
        );
    }

    #[test]
    fn align_all_equalises_lengths() {
        let grid = PressureGrid::canonical();
        let mut long = grid.checkpoints().to_vec();
        long.extend([400.0, 420.0, 440.0]);
        let short = rows_at(&[0.0, 2.0]);
        let long = rows_at(&long);

        let aligned = align_all(&[("short", &short), ("long", &long)], &grid).unwrap();

        assert_eq!(aligned[0].len(), grid.len() + 3);
        assert_eq!(aligned[1].len(), grid.len() + 3);
        assert!(is_nan_row(aligned[0].row(grid.len() + 2)));
    }

    #[test]
    fn align_all_names_the_failing_series() {
        let grid = PressureGrid::canonical();
        let good = rows_at(&[0.0, 2.0]);
        let bad = rows_at(&[0.0, 4.0, 2.0]);

        let err = align_all(&[("FeO", &good), ("MnO", &bad)], &grid).unwrap_err();

        assert!(err.to_string().contains("MnO"));
        assert!(matches!(
            err.downcast_ref::<AlignError>(),
            Some(AlignError::Unsorted { row: 2, .. })
        ));
    }
}
