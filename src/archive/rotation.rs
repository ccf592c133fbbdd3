//! Preservation of superseded archives.
//!
//! Rebuilding an addon without bumping its version produces an archive with
//! the same name as the previous build. The previous file is renamed with a
//! timestamp suffix instead of being overwritten.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeZone};
use std::fs;
use std::io;

/// Format a backup suffix as `YYYYMMDDHHMMSS`, which sorts chronologically.
#[must_use]
pub fn backup_suffix<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d%H%M%S").to_string()
}

/// Rename `archive` to `<archive>.<suffix>` if it exists.
///
/// When that name is taken too (two builds within the same second), a
/// counter is appended: `<archive>.<suffix>.1`, `.2`, and so on. Returns the
/// backup path, or `None` when there was nothing to preserve.
///
/// # Errors
///
/// Returns an error if the rename fails.
pub fn preserve_existing(archive: &Utf8Path, suffix: &str) -> io::Result<Option<Utf8PathBuf>> {
    if !archive.exists() {
        return Ok(None);
    }

    let backup = free_backup_path(archive, suffix);
    fs::rename(archive, &backup)?;
    log::info!("Kept previous archive as {backup}");
    Ok(Some(backup))
}

fn free_backup_path(archive: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    let base = format!("{archive}.{suffix}");
    let mut candidate = Utf8PathBuf::from(&base);
    let mut counter = 1_u32;
    while candidate.exists() {
        candidate = Utf8PathBuf::from(format!("{base}.{counter}"));
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn temp_root(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
    }

    #[test]
    fn suffix_is_full_numeric_timestamp() {
        let when = Utc
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 2)
            .single()
            .expect("valid timestamp");
        assert_eq!(backup_suffix(&when), "20240307090502");
    }

    #[test]
    fn absent_archive_needs_no_backup() {
        let dir = TempDir::new().expect("temp dir");
        let archive = temp_root(&dir).join("A-1.0.0.zip");

        let backup = preserve_existing(&archive, "20240101000000").expect("no-op succeeds");

        assert!(backup.is_none());
    }

    #[test]
    fn existing_archive_is_renamed_with_suffix() {
        let dir = TempDir::new().expect("temp dir");
        let archive = temp_root(&dir).join("A-1.0.0.zip");
        fs::write(&archive, b"first build").expect("write archive");

        let backup = preserve_existing(&archive, "20240101000000")
            .expect("rename succeeds")
            .expect("backup created");

        assert_eq!(backup.file_name(), Some("A-1.0.0.zip.20240101000000"));
        assert!(!archive.exists());
        assert_eq!(fs::read(&backup).expect("read backup"), b"first build");
    }

    #[test]
    fn colliding_backups_get_a_counter() {
        let dir = TempDir::new().expect("temp dir");
        let archive = temp_root(&dir).join("A-1.0.0.zip");
        let suffix = "20240101000000";

        fs::write(&archive, b"one").expect("write first");
        preserve_existing(&archive, suffix).expect("first rename");
        fs::write(&archive, b"two").expect("write second");
        let second = preserve_existing(&archive, suffix)
            .expect("second rename")
            .expect("backup created");

        assert_eq!(second.file_name(), Some("A-1.0.0.zip.20240101000000.1"));
        assert_eq!(fs::read(&second).expect("read second"), b"two");
    }
}
