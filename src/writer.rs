//! Scoped file writer shared by every stage that produces output.

use crate::error::{GeneratorError, Result};
use camino::Utf8Path;
use std::fs::File;
use std::io::{self, Write};

/// Write `data` to `path`, replacing any existing file.
///
/// The handle is dropped on every exit path. Failures carry the destination
/// so the caller can record them in the run report and move on; nothing here
/// aborts a run.
///
/// # Errors
///
/// Returns [`GeneratorError::Write`] naming `path` if the file cannot be
/// created, written or flushed.
pub fn save_file(path: &Utf8Path, data: impl AsRef<[u8]>) -> Result<()> {
    write_all(path, data.as_ref()).map_err(|source| GeneratorError::Write {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("Saved {path}");
    Ok(())
}

fn write_all(path: &Utf8Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn temp_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf-8 temp path")
    }

    #[test]
    fn writes_and_truncates() {
        let dir = TempDir::new().expect("temp dir");
        let path = temp_path(&dir, "addons.xml");

        save_file(&path, "a much longer first version").expect("first write");
        save_file(&path, b"short").expect("second write");

        assert_eq!(fs::read_to_string(&path).expect("read back"), "short");
    }

    #[test]
    fn failure_names_destination() {
        let dir = TempDir::new().expect("temp dir");
        let path = temp_path(&dir, "missing/addons.xml");

        let err = save_file(&path, "data").expect_err("parent does not exist");

        match err {
            GeneratorError::Write { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Write error, got {other:?}"),
        }
    }
}
