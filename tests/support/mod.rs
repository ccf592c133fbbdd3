//! Test support utilities for generator behavioural tests.
//!
//! Provides a throwaway repository checkout laid out the way the generator
//! expects it: addon directories at the root and a `_tools` directory holding
//! `config.toml` and `template.xml`.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Configuration written to every new checkout.
pub const DEFAULT_CONFIG: &str = r#"[addon]
id = "repository.test"
name = "Test Repository"
version = "1.0.0"
author = "Tester"
summary = "Test addons"
description = "Addons used by the behaviour tests"
excludes = ".pyc,.pyo"

[locations]
output_path = "zips"
url = "https://example.com/repo/"
"#;

/// Repository addon template written to every new checkout.
pub const DEFAULT_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<addon id="{addonid}" name="{name}" version="{version}" provider-name="{author}">
    <extension point="xbmc.addon.repository" name="{name}">
        <dir>
            <info compressed="false">{url}{output_path}addons.xml</info>
            <checksum>{url}{output_path}addons.xml.md5</checksum>
            <datadir zip="true">{url}{output_path}</datadir>
        </dir>
    </extension>
    <extension point="xbmc.addon.metadata">
        <summary>{summary}</summary>
        <description>{description}</description>
        <platform>all</platform>
    </extension>
</addon>
"#;

/// A temporary repository checkout.
pub struct Checkout {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Checkout {
    /// Creates a checkout with the default configuration and template.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir creation succeeds");
        let canonical = fs::canonicalize(dir.path()).expect("temp dir resolves");
        let root = Utf8PathBuf::from_path_buf(canonical).expect("utf-8 temp path");
        let checkout = Self { _dir: dir, root };
        checkout.write_file("_tools/config.toml", DEFAULT_CONFIG);
        checkout.write_file("_tools/template.xml", DEFAULT_TEMPLATE);
        checkout
    }

    /// Repository root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The `_tools` directory.
    pub fn tools_dir(&self) -> Utf8PathBuf {
        self.root.join("_tools")
    }

    /// The generated output root.
    pub fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("_zips")
    }

    /// Writes a manifest for addon `id` at `version` into `<dir>/addon.xml`.
    pub fn add_addon(&self, dir: &str, id: &str, version: &str) {
        self.write_file(
            &format!("{dir}/addon.xml"),
            &format!(
                concat!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                    "<addon id=\"{id}\" name=\"{id}\" version=\"{version}\">\n",
                    "    <extension point=\"xbmc.python.pluginsource\" library=\"default.py\"/>\n",
                    "</addon>\n",
                ),
                id = id,
                version = version,
            ),
        );
    }

    /// Removes the `key = ...` line from the configuration.
    pub fn drop_config_key(&self, key: &str) {
        let path = self.tools_dir().join("config.toml");
        let source = fs::read_to_string(&path).expect("read config");
        let prefix = format!("{key} = ");
        let kept: Vec<&str> = source
            .lines()
            .filter(|line| !line.starts_with(&prefix))
            .collect();
        fs::write(&path, kept.join("\n") + "\n").expect("write config");
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
    let archive = zip::ZipArchive::new(file).expect("valid zip");
    archive.file_names().map(str::to_owned).collect()
}
