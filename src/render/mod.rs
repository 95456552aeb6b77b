//! Rendering layer: explicit figure objects and the plot sets built from them.
//!
//! ```text
//!   aligned Series ──► plots ──► Figure { Axes { Line.. }.. } ──► FigureSink
//! ```
//!
//! Figures are plain values; nothing is drawn until a [`FigureSink`] receives
//! them, so one process can build and write any number of figures without
//! shared plotting state.
pub mod figure;
pub mod plots;

use std::path::Path;

use anyhow::{Context, Result};

pub use figure::{Axes, Figure, Line};

/// Destination for finished figures.
pub trait FigureSink {
    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()>;
}

/// Writes figures as bitmap images through `plotters`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapSink;

impl FigureSink for BitmapSink {
    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()> {
        figure
            .draw_bitmap(path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}
