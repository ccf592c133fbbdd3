//! Shared test utilities for the generator crate.

use crate::config::Config;
use crate::layout::RepoLayout;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;
use zip::ZipArchive;

/// A complete configuration with every required key.
pub const SAMPLE_CONFIG: &str = r#"[addon]
id = "repository.test"
name = "Test Repository"
version = "1.0.0"
author = "Tester"
summary = "Test addons"
description = "Addons used by the test suite"
excludes = ".pyc,.pyo"

[locations]
output_path = "zips/"
url = "https://example.com/repo/"
"#;

/// Parses [`SAMPLE_CONFIG`].
pub fn sample_config() -> Config {
    Config::from_toml(SAMPLE_CONFIG).expect("sample config parses")
}

/// A temporary repository checkout with a `_tools` directory.
pub struct TestRepo {
    _dir: TempDir,
    root: Utf8PathBuf,
    tools_dir: Utf8PathBuf,
}

impl TestRepo {
    /// Creates an empty checkout.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir creation succeeds");
        let canonical = fs::canonicalize(dir.path()).expect("temp dir resolves");
        let root = Utf8PathBuf::from_path_buf(canonical).expect("utf-8 temp path");
        let tools_dir = root.join("_tools");
        fs::create_dir(&tools_dir).expect("create tools dir");
        Self {
            _dir: dir,
            root,
            tools_dir,
        }
    }

    /// Repository root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The `_tools` directory.
    pub fn tools_dir(&self) -> &Utf8Path {
        &self.tools_dir
    }

    /// Layout for this checkout under `config`.
    pub fn layout(&self, config: &Config) -> RepoLayout {
        RepoLayout::new(self.root.clone(), self.tools_dir.clone(), config)
    }

    /// Writes a minimal manifest to `<dir>/addon.xml`.
    pub fn add_addon(&self, dir: &str, id: &str, version: &str) {
        self.write_file(
            &format!("{dir}/addon.xml"),
            &format!(r#"<addon id="{id}" version="{version}" name="{id}"/>"#),
        );
    }

    /// Writes `contents` to `relative` below the root, creating parents.
    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write file");
    }
}

/// Lists the entry names of the zip at `path`.
pub fn zip_entries(path: &Utf8Path) -> Vec<String> {
    let file = fs::File::open(path).expect("open archive");
    let archive = ZipArchive::new(file).expect("valid zip");
    archive.file_names().map(str::to_owned).collect()
}
