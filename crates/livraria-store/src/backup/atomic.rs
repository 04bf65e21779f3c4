//! Atomic copy primitive
//!
//! Bytes land in a temp file next to the target and are renamed into place,
//! so a snapshot name never points at a partial copy.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Temp path used while copying into `target`
///
/// The `.tmp` extension keeps it out of snapshot listings.
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Copy everything from `source` into `target` atomically; returns bytes copied
pub fn atomic_copy(source: &mut impl Read, target: &Path) -> Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_backup_dir", e))?;
    }

    let temp_path = temp_path_for(target);

    let copied = write_temp(source, &temp_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("write_backup_temp", e)
    })?;

    fs::rename(&temp_path, target).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("rename_backup_temp", e)
    })?;

    Ok(copied)
}

fn write_temp(source: &mut impl Read, temp_path: &Path) -> io::Result<u64> {
    let mut file = File::create(temp_path)?;
    let copied = io::copy(source, &mut file)?;
    file.flush()?;
    file.sync_all()?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_copy() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("copy.db");

        let copied = atomic_copy(&mut &b"hello"[..], &target).unwrap();

        assert_eq!(copied, 5);
        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_atomic_copy_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("nested").join("copy.db");

        atomic_copy(&mut &b"nested"[..], &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"nested");
    }

    #[test]
    fn test_no_tmp_files_after_copy() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("copy.db");

        atomic_copy(&mut &b"clean"[..], &target).unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn test_temp_path_keeps_full_name() {
        let temp = temp_path_for(Path::new("/b/backup_livraria_2024-01-01_00-00-00.db"));
        assert_eq!(
            temp,
            PathBuf::from("/b/backup_livraria_2024-01-01_00-00-00.db.tmp")
        );
    }
}
