//! First-use setup: create the backing file and recover the id counters.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;

use super::snapshot::{Snapshot, write_snapshot};
use crate::domain::{ChirpId, UserId};
use crate::error::{ChirpyError, Result};

/// Create the file with an empty snapshot if it does not exist yet.
///
/// Returns `true` when the file was created. An existing file is left
/// untouched, so calling this again is harmless.
pub fn ensure_db(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(false),
        Ok(_) => Err(ChirpyError::Storage(format!("{} exists but is not a file", path.display()))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    ChirpyError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
            write_snapshot(path, &Snapshot::default())?;
            info!("Created empty chirp database at {}", path.display());
            Ok(true)
        }
        Err(e) => Err(ChirpyError::Storage(format!("Failed to stat {}: {}", path.display(), e))),
    }
}

/// First id to hand out given what is already on disk.
pub fn recover_next_id(snapshot: &Snapshot) -> ChirpId {
    snapshot.max_id().map_or(1, |max| max + 1)
}

/// First user id to hand out given what is already on disk.
pub fn recover_next_user_id(snapshot: &Snapshot) -> UserId {
    snapshot.max_user_id().map_or(1, |max| max + 1)
}
