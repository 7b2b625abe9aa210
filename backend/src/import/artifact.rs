use log::{debug, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where the upload named `file_name` is kept: a unique prefix keeps two
/// uploads of the same name from overwriting each other on disk.
fn path_for(upload_dir: &Path, file_name: &str) -> PathBuf {
    upload_dir.join(format!("{}_{}", Uuid::new_v4(), sanitize(file_name)))
}

/// Reduces a client-supplied name to a safe, single path component.
pub(super) fn sanitize(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Writes the raw upload under `upload_dir` and returns its path.
pub(super) fn store(upload_dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(upload_dir)?;
    let path = path_for(upload_dir, file_name);
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    debug!("Stored upload '{}' at {}", file_name, path.display());
    Ok(path)
}

/// Best-effort removal of a stored upload. Failures are only logged.
pub fn remove(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed stored upload {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => warn!("Could not remove stored upload {}: {}", path.display(), err),
    }
}
