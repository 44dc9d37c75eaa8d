/// Session files: snapshot bytes on disk.
///
/// The engine only hands out bytes; this module decides where they live.
/// Writes go to a sibling temp file first and are renamed into place, so an
/// interrupted save leaves the previous snapshot intact.
use anyhow::{Context, Result};
use mergerank_core::RankingSession;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a saved session. `Ok(None)` when the file does not exist.
pub fn load_session(path: &Path) -> Result<Option<RankingSession>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read session file {}", path.display())),
    };
    let session = RankingSession::from_bytes(&bytes)
        .with_context(|| format!("Cannot resume from {}", path.display()))?;
    debug!(path = %path.display(), complete = session.is_complete(), "Loaded session");
    Ok(Some(session))
}

pub fn save_session(path: &Path, session: &RankingSession) -> Result<()> {
    let bytes = session.to_bytes().context("Failed to serialize session")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp = temp_path(path);
    std::fs::write(&tmp, &bytes)
        .with_context(|| format!("Failed to write session file {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move session file into place at {}", path.display()))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Saved session");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
