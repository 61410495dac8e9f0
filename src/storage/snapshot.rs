//! On-disk snapshot of every chirp and user, and whole-file persistence.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Chirp, ChirpId, User, UserId};
use crate::error::{ChirpyError, Result};

/// The complete set of records at a point in time.
///
/// Serialized as `{"chirps": {"<id>": {"id": <id>, "body": "..."}}}`, plus a
/// `"users"` map once any user exists. Each write replaces the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub chirps: BTreeMap<ChirpId, Chirp>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<UserId, User>,
}

impl Snapshot {
    /// Highest chirp id present, if any.
    pub fn max_id(&self) -> Option<ChirpId> {
        self.chirps.keys().next_back().copied()
    }

    /// Highest user id present, if any.
    pub fn max_user_id(&self) -> Option<UserId> {
        self.users.keys().next_back().copied()
    }

    /// Number of chirps.
    pub fn len(&self) -> usize {
        self.chirps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chirps.is_empty()
    }

    /// Consume the snapshot, yielding chirps in ascending id order.
    pub fn into_chirps(self) -> Vec<Chirp> {
        self.chirps.into_values().collect()
    }

    /// Reject documents whose keys disagree with the records they hold.
    fn check(&self, path: &Path) -> Result<()> {
        check_ids(path, "chirp", self.chirps.iter().map(|(key, c)| (*key, c.id)))?;
        check_ids(path, "user", self.users.iter().map(|(key, u)| (*key, u.id)))
    }
}

fn check_ids(path: &Path, kind: &str, entries: impl Iterator<Item = (u64, u64)>) -> Result<()> {
    for (key, id) in entries {
        if key != id {
            return Err(ChirpyError::Storage(format!(
                "Malformed data in {}: key {} holds {} {}",
                path.display(),
                key,
                kind,
                id
            )));
        }
        if id == 0 || id == u64::MAX {
            return Err(ChirpyError::Storage(format!(
                "Malformed data in {}: {} id {} out of range",
                path.display(),
                kind,
                id
            )));
        }
    }
    Ok(())
}

/// Read and parse the whole snapshot file.
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = fs::read(path)
        .map_err(|e| ChirpyError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes)
        .map_err(|e| ChirpyError::Storage(format!("Malformed data in {}: {}", path.display(), e)))?;
    snapshot.check(path)?;
    Ok(snapshot)
}

/// Serialize the whole snapshot and atomically replace the file.
///
/// Bytes go to a sibling `.tmp` file which is synced and renamed over the
/// target, so readers see either the old or the new document.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp_path = tmp_path_for(path)?;

    let write = || -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        {
            let mut writer = BufWriter::new(&mut file);
            writer.write_all(&json)?;
            writer.flush()?;
        }
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    };

    write().map_err(|e| ChirpyError::Storage(format!("Failed to write {}: {}", path.display(), e)))
}

pub(crate) fn tmp_path_for(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| ChirpyError::Storage(format!("Not a file path: {}", path.display())))?;
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
