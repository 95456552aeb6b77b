use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extension used for plot images unless a caller picks another.
pub const IMAGE_EXTENSION: &str = "png";

// ---------------------------------------------------------------------------
// Directory naming
// ---------------------------------------------------------------------------

/// Directory for one compound's plots: `<name>plots`, or `new<name>plots`
/// (prefixed again as often as needed) when that already exists.
pub fn single_dir(base: &Path, compound: &str) -> PathBuf {
    let mut dir_name = format!("{compound}plots");
    let first = base.join(&dir_name);
    if !first.exists() {
        return first;
    }

    loop {
        dir_name.insert_str(0, "new");
        let candidate = base.join(&dir_name);
        if !candidate.exists() {
            log::warn!(
                "{} already exists, writing to {} instead",
                first.display(),
                candidate.display()
            );
            return candidate;
        }
    }
}

/// Directory for a comparison: the compound names joined by `vs`. An existing
/// directory is reused and its images overwritten.
pub fn comparison_dir(base: &Path, compounds: &[&str]) -> PathBuf {
    base.join(compounds.join("vs"))
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

/// `<dir>/<label>.png` with path separators in `label` replaced.
pub fn image_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{}.{IMAGE_EXTENSION}", file_stem(label)))
}

/// A label usable as a single path component.
pub fn file_stem(label: &str) -> String {
    label.replace(['/', '\\'], "_")
}

/// `<input>plot.jpg`, next to the input file.
pub fn dos_image_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push("plot.jpg");
    PathBuf::from(name)
}
