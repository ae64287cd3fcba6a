use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{GenerateError, Result};

/// Writes generated text to `path`, creating missing parent directories.
///
/// An existing file is replaced; callers decide whether overwriting is
/// allowed.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    let io_err = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)?;
    info!(path = %path.display(), bytes = text.len(), "Wrote output");
    Ok(())
}
