use anyhow::Result;

use super::figure::{Axes, Figure, Line};
use crate::color::{self, BLUE, GREEN, SPIN_DOWN_HUE, SPIN_UP_HUE};
use crate::data::align::{align_all, PressureGrid, COMPARED_COLUMNS};
use crate::data::diff::difference;
use crate::data::model::{DosSpectrum, Series, Table, VariableNames};

/// A figure and the label its image file is named after.
pub type NamedFigure = (String, Figure);

const PRESSURE_LABEL: &str = "Pressure (kbar)";
const BANDGAP_LABEL: &str = "Bandgap (eV)";
const MAGNETIZATION_LABEL: &str = "Magnetization (Bohrs)";

// Column indices in a property table.
const ENTHALPY: usize = 1;
const VOLUME: usize = 2;
const BANDGAP_SPIN1: usize = 3;
const BANDGAP_SPIN2: usize = 4;
const MAG_TOTAL: usize = 5;
const FIRST_ION: usize = 6;

// ---------------------------------------------------------------------------
// Single compound
// ---------------------------------------------------------------------------

/// Property-vs-pressure plots for one compound: enthalpy, volume and total
/// magnetization, band gaps, ion magnetization, and a 2x3 composite named
/// after the compound.
pub fn compound_figures(table: &Table, compound: &str) -> Vec<NamedFigure> {
    let width = table.series.width().max(COMPARED_COLUMNS);
    let series = table.series.with_width(width);
    let names = table.names.with_width(width);
    let pressure = series.pressures();

    let property = |column: usize| {
        Axes::new(names.get(column))
            .x_label(names.get(0))
            .y_label(names.get(column))
            .line(Line::new(pressure.clone(), series.column(column), GREEN).label(compound))
    };

    let bandgap = Axes::new("Bandgap")
        .x_label(PRESSURE_LABEL)
        .y_label(BANDGAP_LABEL)
        .line(Line::new(pressure.clone(), series.column(BANDGAP_SPIN1), GREEN).label("Spin 1"))
        .line(Line::new(pressure.clone(), series.column(BANDGAP_SPIN2), BLUE).label("Spin 2"))
        .with_legend();

    let ion_mag = ion_magnetization(&series, &names);

    let mut figures: Vec<NamedFigure> = [ENTHALPY, VOLUME, MAG_TOTAL]
        .into_iter()
        .map(|column| (names.get(column), Figure::single(property(column))))
        .collect();
    figures.push(("Bandgap".to_string(), Figure::single(bandgap.clone())));
    figures.push(("IonMag".to_string(), Figure::single(ion_mag.clone())));

    let composite = Figure::grid(2, 3)
        .panel(property(ENTHALPY))
        .panel(property(VOLUME))
        .panel(property(MAG_TOTAL))
        .panel(bandgap)
        .panel(ion_mag);
    figures.push((compound.to_string(), composite));
    figures
}

/// Per-ion magnetization: the first half of the ion columns are drawn in
/// greens, the rest in blues. Columns with no numeric value at all (left by
/// a trailing delimiter) are skipped.
fn ion_magnetization(series: &Series, names: &VariableNames) -> Axes {
    let pressure = series.pressures();
    let ions: Vec<usize> = (FIRST_ION..series.width())
        .filter(|&c| series.column(c).iter().any(|v| !v.is_nan()))
        .collect();
    let (up, down) = ions.split_at(ions.len() / 2);

    let mut axes = Axes::new("Ion Magnetization")
        .x_label(PRESSURE_LABEL)
        .y_label(MAGNETIZATION_LABEL)
        .with_legend();
    for (columns, hue) in [(up, SPIN_UP_HUE), (down, SPIN_DOWN_HUE)] {
        let shades = color::generate_shades(hue, columns.len());
        for (&column, shade) in columns.iter().zip(shades) {
            let line = Line::new(pressure.clone(), series.column(column), shade);
            axes = axes.line(line.label(names.get(column)));
        }
    }
    axes
}

// ---------------------------------------------------------------------------
// Comparison of two or three compounds
// ---------------------------------------------------------------------------

/// Relative enthalpy and volume against the first (baseline) compound, raw
/// band gaps and total magnetization, and a 2x3 `Variables Comparison`
/// composite. Every table is aligned to the canonical pressure grid first.
pub fn comparison_figures(compounds: &[(&str, &Table)]) -> Result<Vec<NamedFigure>> {
    let Some(&(_, baseline_table)) = compounds.first() else {
        return Ok(Vec::new());
    };
    let grid = PressureGrid::canonical();
    let names = baseline_table.names.with_width(COMPARED_COLUMNS);

    let named: Vec<(&str, &Series)> = compounds
        .iter()
        .map(|&(name, table)| (name, &table.series))
        .collect();
    let aligned = align_all(&named, &grid)?;

    let baseline = &aligned[0];
    let differences = aligned
        .iter()
        .map(|series| difference(baseline, series))
        .collect::<Result<Vec<_>, _>>()?;

    let relative = |column: usize| {
        let mut axes = Axes::new(format!("Relative {}", names.get(column)))
            .x_label(names.get(0))
            .y_label(names.get(column))
            .with_legend();
        for (k, (diff, (name, _))) in differences.iter().zip(compounds).enumerate() {
            let label = if k == 0 {
                format!("{name}(baseline)")
            } else {
                name.to_string()
            };
            let color = relative_color(k, compounds.len());
            axes = axes.line(Line::new(diff.pressures(), diff.column(column), color).label(label));
        }
        axes
    };

    let raw = |column: usize| {
        let mut axes = Axes::new(names.get(column))
            .x_label(names.get(0))
            .y_label(names.get(column))
            .with_legend();
        for (k, (series, (name, _))) in aligned.iter().zip(compounds).enumerate() {
            let color = color::compound_color(k);
            axes = axes.line(Line::new(series.pressures(), series.column(column), color).label(*name));
        }
        axes
    };

    let mut figures = Vec::new();
    for column in [ENTHALPY, VOLUME] {
        figures.push((format!("Relative{}", names.get(column)), Figure::single(relative(column))));
    }
    for column in [BANDGAP_SPIN1, BANDGAP_SPIN2, MAG_TOTAL] {
        figures.push((names.get(column), Figure::single(raw(column))));
    }

    let legend = relative(ENTHALPY).legend_entries();
    let mut composite = Figure::grid(2, 3).legend(legend);
    for column in [ENTHALPY, VOLUME] {
        composite = composite.panel(without_legend(relative(column)));
    }
    for column in [BANDGAP_SPIN1, BANDGAP_SPIN2, MAG_TOTAL] {
        composite = composite.panel(without_legend(raw(column)));
    }
    figures.push(("Variables Comparison".to_string(), composite));

    Ok(figures)
}

/// A two-way comparison draws the baseline difference in blue; three-way
/// comparisons use the usual compound colours.
fn relative_color(index: usize, compounds: usize) -> plotters::style::RGBColor {
    match (index, compounds) {
        (0, 2) => BLUE,
        _ => color::compound_color(index),
    }
}

fn without_legend(mut axes: Axes) -> Axes {
    axes.legend = false;
    axes
}

// ---------------------------------------------------------------------------
// Density of states
// ---------------------------------------------------------------------------

fn dos_axes(dos: &DosSpectrum, title: &str) -> Axes {
    Axes::new(title)
        .hide_x_axis()
        .line(Line::new(dos.spin1.clone(), dos.energy.clone(), BLUE).label("Spin 1"))
        .line(Line::new(dos.spin2.clone(), dos.energy.clone(), GREEN).label("Spin 2"))
}

/// Spin 1 to the left, spin 2 to the right, energy on the vertical axis.
pub fn dos_figure(dos: &DosSpectrum, title: &str) -> Figure {
    Figure::single(dos_axes(dos, title).y_label("Energy").with_legend())
}

/// Side-by-side DOS panels sharing one figure legend.
pub fn dos_panels(spectra: &[(&str, &DosSpectrum)]) -> Figure {
    let mut figure = Figure::grid(1, spectra.len().max(1));
    for (i, (name, dos)) in spectra.iter().enumerate() {
        let axes = dos_axes(dos, name);
        figure = figure.panel(if i == 0 { axes.y_label("Energy") } else { axes });
    }
    let legend = figure
        .panels
        .first()
        .map(Axes::legend_entries)
        .unwrap_or_default();
    figure.legend(legend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;

    const HEADER: &str = "Pressure,Enthalpy,Volume,Bandgap1,Bandgap2,MagTot,Fe1,Fe2,O1,O2,";

    fn table(pressures: &[f64], offset: f64) -> Table {
        let mut text = String::from(HEADER);
        text.push('\n');
        for p in pressures {
            text.push_str(&format!(
                "{p},{},{},1.0,1.1,3.5,2.0,2.1,-2.0,-2.1,\n",
                -100.0 + p * 0.1 + offset,
                40.0 - p * 0.02
            ));
        }
        parse_table(&text).unwrap()
    }

    fn labels(figures: &[NamedFigure]) -> Vec<&str> {
        figures.iter().map(|(label, _)| label.as_str()).collect()
    }

    #[test]
    fn compound_plot_set() {
        let figures = compound_figures(&table(&[0.0, 2.0, 4.0], 0.0), "FeO");
        assert_eq!(
            labels(&figures),
            ["Enthalpy", "Volume", "MagTot", "Bandgap", "IonMag", "FeO"]
        );

        let (_, composite) = &figures[5];
        assert_eq!((composite.rows, composite.cols), (2, 3));
        assert_eq!(composite.panels.len(), 5);
        assert!(composite.check_layout().is_ok());
    }

    #[test]
    fn ion_magnetization_skips_empty_columns() {
        let figures = compound_figures(&table(&[0.0, 2.0], 0.0), "FeO");
        let (_, ion_mag) = &figures[4];
        let axes = &ion_mag.panels[0];

        let labels: Vec<_> = axes.lines.iter().filter_map(|l| l.label.as_deref()).collect();
        assert_eq!(labels, ["Fe1", "Fe2", "O1", "O2"]);
        assert_ne!(axes.lines[0].color, axes.lines[2].color);
    }

    #[test]
    fn narrow_tables_still_plot() {
        let narrow = parse_table("P,H\n0,1\n2,2\n").unwrap();
        let figures = compound_figures(&narrow, "X");
        assert_eq!(labels(&figures)[..3], ["H", "Volume", "MagTot"]);
        assert!(figures[4].1.panels[0].lines.is_empty());
    }

    #[test]
    fn two_way_comparison_plot_set() {
        let grid = PressureGrid::canonical();
        let a = table(grid.checkpoints(), 0.0);
        let b = table(&[0.0, 2.0, 4.0, 8.0, 10.0, 20.0], 0.5);

        let figures = comparison_figures(&[("A", &a), ("B", &b)]).unwrap();

        assert_eq!(
            labels(&figures),
            [
                "RelativeEnthalpy",
                "RelativeVolume",
                "Bandgap1",
                "Bandgap2",
                "MagTot",
                "Variables Comparison"
            ]
        );

        let relative = &figures[0].1.panels[0];
        assert_eq!(relative.title, "Relative Enthalpy");
        let baseline = &relative.lines[0];
        assert_eq!(baseline.label.as_deref(), Some("A(baseline)"));
        assert_eq!(baseline.color, BLUE);
        assert_eq!(baseline.x.len(), grid.len() + 1);
        assert!(baseline.y[..grid.len()].iter().all(|&v| v == 0.0));

        let other = &relative.lines[1];
        approx::assert_abs_diff_eq!(other.y[1], 0.5, epsilon = 1e-9);
        assert!(other.y[3].is_nan());
        assert_eq!(other.x[4], 8.0);

        let composite = &figures[5].1;
        assert_eq!(composite.panels.len(), 5);
        assert_eq!(composite.legend.len(), 2);
        assert!(composite.panels.iter().all(|p| !p.legend));
    }

    #[test]
    fn three_way_comparison_uses_compound_colours() {
        let a = table(&[0.0, 2.0], 0.0);
        let b = table(&[0.0, 2.0], 1.0);
        let c = table(&[2.0], 2.0);

        let figures = comparison_figures(&[("A", &a), ("B", &b), ("C", &c)]).unwrap();

        let relative = &figures[1].1.panels[0];
        let colours: Vec<_> = relative.lines.iter().map(|l| l.color).collect();
        assert_eq!(colours, color::COMPOUND_COLORS);
        let third = &relative.lines[2];
        assert!(third.x[0].is_nan());
        assert_eq!(third.x[1], 2.0);
    }

    #[test]
    fn unsorted_input_names_the_compound() {
        let a = table(&[0.0, 2.0], 0.0);
        let b = table(&[0.0, 4.0, 2.0], 0.0);
        let err = comparison_figures(&[("A", &a), ("B", &b)]).unwrap_err();
        assert!(format!("{err:#}").contains("aligning B"));
    }

    #[test]
    fn dos_panels_share_a_legend() {
        let dos = DosSpectrum {
            spin1: vec![-0.1, -0.2],
            spin2: vec![0.1, 0.3],
            energy: vec![-1.0, 0.0],
        };
        let figure = dos_panels(&[("A", &dos), ("B", &dos), ("C", &dos)]);

        assert_eq!((figure.rows, figure.cols), (1, 3));
        assert_eq!(figure.panels[0].y_label, "Energy");
        assert!(figure.panels[1].y_label.is_empty());
        assert!(figure.panels.iter().all(|p| p.hide_x_axis));
        assert_eq!(
            figure.legend,
            vec![("Spin 1".to_string(), BLUE), ("Spin 2".to_string(), GREEN)]
        );

        let single = dos_figure(&dos, "dos.dat");
        assert_eq!(single.panels[0].title, "dos.dat");
        assert_eq!(single.panels[0].lines[0].x, vec![-0.1, -0.2]);
    }
}
