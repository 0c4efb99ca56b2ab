//! Write-then-rename file replacement shared by both stores

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

/// Replace `path` with `bytes` so readers see either the old or the new file.
///
/// The temp file lives in the destination directory; a rename across
/// filesystems would not be atomic.
pub(crate) fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    if let Ok(existing) = std::fs::metadata(path) {
        // keep the target's mode; temp files are created owner-only
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    debug!(path = %path.display(), bytes = bytes.len(), "File replaced");
    Ok(())
}
