//! Density-of-states and pressure-series comparison plots.
//!
//! Two command-line tools share this library: `outcar-compare` aligns property
//! tables onto a common pressure grid and plots them against a baseline
//! compound, and `dos_plot` draws spin-resolved density-of-states curves.

pub mod cli;
pub mod color;
pub mod data;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod render;
