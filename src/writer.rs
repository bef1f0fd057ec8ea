//! Atomic file output.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use tracing::{debug, info};

/// Writes `contents` to `path` so that readers see either the old file or the new one.
///
/// The bytes go to a temporary file in the target's directory, which is then
/// renamed over the target. The temporary file is removed if anything fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("feed");
    let prefix = format!("{}-", stem);

    let mut file = Builder::new()
        .prefix(&prefix)
        .suffix(".xml")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    debug!("Writing {} bytes to {}", contents.len(), file.path().display());

    file.write_all(contents).context("Failed to write temporary file")?;
    file.as_file().sync_all().context("Failed to flush temporary file")?;

    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}
