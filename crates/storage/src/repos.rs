use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use attractor_core::AppError;
use chrono::{DateTime, Utc};

use crate::models::DeploymentRecord;

// ─── Deployment Records ─────────────────────────────────────────────────────

/// File name of a record captured at `checkpoint`: `faucet-<unix-seconds>.json`.
pub fn record_file_name(checkpoint: DateTime<Utc>) -> String {
    format!("faucet-{}.json", checkpoint.timestamp())
}

/// Persist a deployment record under `dir`, creating the directory if needed.
///
/// Never overwrites: an existing record with the same checkpoint is an error.
pub fn save_record(
    dir: &Path,
    checkpoint: DateTime<Utc>,
    record: &DeploymentRecord,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(record_file_name(checkpoint));

    let json = serde_json::to_string_pretty(record)
        .map_err(|e| AppError::Encode(format!("deployment record: {e}")))?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot create {}: {e}", path.display()),
            ))
        })?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    tracing::debug!(path = %path.display(), "Deployment record written");
    Ok(path)
}

/// Read a deployment record back.
pub fn load_record(path: &Path) -> Result<DeploymentRecord, AppError> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| AppError::Encode(format!("{}: {e}", path.display())))
}
