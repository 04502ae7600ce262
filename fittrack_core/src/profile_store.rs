//! Profile persistence with file locking.
//!
//! The profile is replaced wholesale on every edit, so the stored record is
//! written atomically through a temp file and rename.

use crate::{Error, Objective, Result, UserProfile};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The stored profile snapshot and its selected objective
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub profile: UserProfile,
    pub objective: Objective,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn new(profile: UserProfile, objective: Objective) -> Self {
        Self {
            profile,
            objective,
            updated_at: Utc::now(),
        }
    }

    /// Load a profile record with shared locking
    ///
    /// Returns `None` if the file doesn't exist. A corrupt or unreadable file
    /// is logged and also treated as absent.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!("No profile file found at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open profile file {:?}: {}. Ignoring it.", path, e);
                return Ok(None);
            }
        };

        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        if let Err(e) = read {
            tracing::warn!("Failed to read profile file {:?}: {}. Ignoring it.", path, e);
            return Ok(None);
        }

        match serde_json::from_str::<ProfileRecord>(&contents) {
            Ok(record) => match record.profile.validate() {
                Ok(()) => {
                    tracing::debug!("Loaded profile from {:?}", path);
                    Ok(Some(record))
                }
                Err(e) => {
                    tracing::warn!("Stored profile {:?} is invalid: {}. Ignoring it.", path, e);
                    Ok(None)
                }
            },
            Err(e) => {
                tracing::warn!("Failed to parse profile file {:?}: {}. Ignoring it.", path, e);
                Ok(None)
            }
        }
    }

    /// Load a profile record, failing if none has been stored
    pub fn load_required(path: &Path) -> Result<Self> {
        Self::load(path)?.ok_or(Error::MissingProfile)
    }

    /// Save the record with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        self.profile.validate()?;

        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("profile path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }
}
