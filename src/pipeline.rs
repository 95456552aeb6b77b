use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::{CompareInvocation, DosInvocation, Input};
use crate::data::loader::{load_dos, load_table};
use crate::output::{comparison_dir, dos_image_path, ensure_dir, image_path, single_dir};
use crate::render::plots::{comparison_figures, compound_figures, dos_figure, dos_panels, NamedFigure};
use crate::render::FigureSink;

/// File name of the three-panel DOS figure.
pub const DOS_PANELS_NAME: &str = "DOSPLOTS";

// ---------------------------------------------------------------------------
// Property tables
// ---------------------------------------------------------------------------

/// Run a comparison-tool invocation. Returns the directory the plots went to.
pub fn run_compare<S: FigureSink>(sink: &mut S, base: &Path, invocation: &CompareInvocation) -> Result<PathBuf> {
    match invocation {
        CompareInvocation::Single(input) => plot_compound(sink, base, input),
        CompareInvocation::Compare(inputs) => plot_comparison(sink, base, inputs),
    }
}

/// Plots for one compound, written to `<name>plots` (or a `new` sibling).
pub fn plot_compound<S: FigureSink>(sink: &mut S, base: &Path, input: &Input) -> Result<PathBuf> {
    let table = load_table(&input.path)?;
    let dir = single_dir(base, &input.name);
    ensure_dir(&dir)?;

    save_all(sink, &dir, &compound_figures(&table, &input.name))?;
    Ok(dir)
}

/// Plots comparing two or three compounds against the first, written to
/// `<name1>vs<name2>[vs<name3>]`.
pub fn plot_comparison<S: FigureSink>(sink: &mut S, base: &Path, inputs: &[Input]) -> Result<PathBuf> {
    let tables = inputs
        .iter()
        .map(|input| load_table(&input.path))
        .collect::<Result<Vec<_>>>()?;
    let compounds: Vec<(&str, _)> = inputs
        .iter()
        .map(|input| input.name.as_str())
        .zip(&tables)
        .collect();

    let figures = comparison_figures(&compounds)?;

    let names: Vec<&str> = inputs.iter().map(|input| input.name.as_str()).collect();
    let dir = comparison_dir(base, &names);
    ensure_dir(&dir)?;

    save_all(sink, &dir, &figures)?;
    Ok(dir)
}

fn save_all<S: FigureSink>(sink: &mut S, dir: &Path, figures: &[NamedFigure]) -> Result<()> {
    for (label, figure) in figures {
        sink.save(figure, &image_path(dir, label))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Density of states
// ---------------------------------------------------------------------------

/// Run a DOS-tool invocation. Returns the image written.
pub fn run_dos<S: FigureSink>(sink: &mut S, base: &Path, invocation: &DosInvocation) -> Result<PathBuf> {
    match invocation {
        DosInvocation::Single(path) => {
            let dos = load_dos(path)?;
            let target = dos_image_path(path);
            sink.save(&dos_figure(&dos, &path.display().to_string()), &target)?;
            Ok(target)
        }
        DosInvocation::Panels(inputs) => {
            let spectra = inputs
                .iter()
                .map(|input| load_dos(&input.path))
                .collect::<Result<Vec<_>>>()?;
            let panels: Vec<(&str, _)> = inputs
                .iter()
                .map(|input| input.name.as_str())
                .zip(&spectra)
                .collect();

            let target = image_path(base, DOS_PANELS_NAME);
            sink.save(&dos_panels(&panels), &target)?;
            Ok(target)
        }
    }
}
