//! Snapshot persistence
//!
//! The whole post-filter [`EntityStore`] is written as one bincode blob so
//! that tools built against this crate can translate generated ids back to
//! descriptive labels. Writes go to a sibling temporary file which is then
//! renamed over the target, so a snapshot is either complete or absent.

use crate::store::EntityStore;
use crate::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default snapshot file name inside the export directory
pub const SNAPSHOT_FILE_NAME: &str = "data.snapshot";

/// Serialize the store to `path`
pub fn save(store: &EntityStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temporary_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        bincode::serialize_into(&mut writer, store)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    info!("Saved snapshot: {}", path.display());
    Ok(())
}

/// Deserialize a store previously written by [`save`]
pub fn load(path: &Path) -> Result<EntityStore> {
    let reader = BufReader::new(File::open(path)?);
    let store: EntityStore = bincode::deserialize_from(reader)?;
    debug!(
        "Loaded snapshot {}: {} subjects, {} students, {} professors, {} classrooms",
        path.display(),
        store.subjects.len(),
        store.students.len(),
        store.professors.len(),
        store.classrooms.len()
    );
    Ok(store)
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_path_is_sibling() {
        let tmp = temporary_path(Path::new("/out/gen/data.snapshot"));
        assert_eq!(tmp, PathBuf::from("/out/gen/data.snapshot.tmp"));
    }
}
