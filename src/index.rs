//! Aggregation of addon manifests into `addons.xml`.

use crate::error::GeneratorError;
use crate::layout::RepoLayout;
use crate::manifest::ensure_well_formed;
use crate::report::{RunReport, Stage};
use crate::scanner::scan_addons;
use crate::writer::save_file;
use camino::Utf8PathBuf;
use log::info;
use std::fs;

/// Filename of the aggregated index inside the output root.
pub const INDEX_FILE: &str = "addons.xml";

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<addons>\n";
const FOOTER: &str = "\n</addons>\n";

/// Concatenate manifests into a single `<addons>` document.
///
/// Each manifest loses its BOM and XML declaration so the result carries a
/// single declaration. Manifests are separated by a blank line.
#[must_use]
pub fn build_index<'a>(manifests: impl IntoIterator<Item = &'a str>) -> String {
    let mut document = HEADER.to_owned();
    for manifest in manifests {
        document.push_str(strip_prolog(manifest));
        document.push_str("\n\n");
    }
    let trimmed = document.trim_end().len();
    document.truncate(trimmed);
    document.push_str(FOOTER);
    document
}

/// Drop a leading byte order mark and `<?xml ...?>` declaration.
///
/// Other processing instructions such as `<?xml-stylesheet ...?>` are kept.
fn strip_prolog(manifest: &str) -> &str {
    let body = manifest.trim_start_matches('\u{feff}').trim_start();
    body.strip_prefix("<?xml")
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_whitespace()))
        .and_then(|rest| rest.split_once("?>"))
        .map_or(body, |(_, content)| content)
        .trim()
}

/// Read every addon manifest and write the aggregated index.
///
/// Unreadable and malformed manifests are left out of the index and recorded
/// against [`Stage::Index`], so the written index is always well-formed.
/// Returns the index path when it was written.
pub fn generate_index(layout: &RepoLayout, report: &mut RunReport) -> Option<Utf8PathBuf> {
    let addons = match scan_addons(layout) {
        Ok(addons) => addons,
        Err(err) => {
            report.error(Stage::Index, layout.root().as_str(), err);
            return None;
        }
    };

    let mut manifests = Vec::with_capacity(addons.len());
    for addon in &addons {
        let path = addon.manifest_path();
        let checked = fs::read_to_string(&path)
            .map_err(|source| GeneratorError::Read {
                path: path.clone(),
                source,
            })
            .and_then(|contents| {
                ensure_well_formed(&contents)?;
                Ok(contents)
            });
        match checked {
            Ok(contents) => manifests.push(contents),
            Err(err) => {
                info!("Excluding {path} for {}", addon.name());
                report.error(Stage::Index, path.as_str(), err);
            }
        }
    }

    let document = build_index(manifests.iter().map(String::as_str));
    let index_path = layout.index_path();
    match save_file(&index_path, document) {
        Ok(()) => {
            info!("Wrote {index_path} with {} addon(s)", manifests.len());
            Some(index_path)
        }
        Err(err) => {
            report.error(Stage::Index, index_path.as_str(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestError;
    use crate::test_utils::{TestRepo, sample_config};
    use rstest::rstest;

    const A: &str = r#"<addon id="A" version="1.0.0" name="Alpha"/>"#;
    const B: &str = r#"<addon id="B" version="2.1.0" name="Bravo"/>"#;

    #[test]
    fn empty_index_is_well_formed() {
        let manifests: [&str; 0] = [];
        let index = build_index(manifests);

        assert_eq!(
            index,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<addons>\n</addons>\n"
        );
        ensure_well_formed(&index).expect("well-formed");
    }

    #[test]
    fn manifests_are_separated_by_blank_lines() {
        let index = build_index([A, B]);

        assert_eq!(
            index,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<addons>\n{A}\n\n{B}\n</addons>\n"
            )
        );
    }

    #[rstest]
    #[case::declaration("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")]
    #[case::standalone("<?xml version='1.0' standalone='yes' ?>\r\n")]
    #[case::bom_and_declaration("\u{feff}<?xml version=\"1.0\"?>")]
    #[case::bom_only("\u{feff}")]
    fn prolog_is_stripped(#[case] prolog: &str) {
        let manifest = format!("{prolog}{A}\n");

        let index = build_index([manifest.as_str(), B]);

        assert_eq!(index.matches("<?xml").count(), 1);
        assert!(!index.contains('\u{feff}'));
        ensure_well_formed(&index).expect("well-formed");
    }

    #[test]
    fn stylesheet_instruction_is_kept() {
        let manifest = format!("<?xml-stylesheet href=\"addon.xsl\"?>\n{A}");

        let index = build_index([manifest.as_str()]);

        assert!(index.contains("<?xml-stylesheet href=\"addon.xsl\"?>"));
        assert_eq!(index.matches("<?xml ").count(), 1);
        ensure_well_formed(&index).expect("well-formed");
    }

    #[test]
    fn writes_every_manifest_exactly_once() {
        let repo = TestRepo::new();
        repo.add_addon("A", "A", "1.0.0");
        repo.add_addon("B", "B", "2.1.0");
        let layout = repo.layout(&sample_config());
        layout.prepare().expect("output root");

        let mut report = RunReport::default();
        let path = generate_index(&layout, &mut report).expect("index written");

        let index = fs::read_to_string(path).expect("read index");
        assert_eq!(index.matches(r#"id="A""#).count(), 1);
        assert_eq!(index.matches(r#"id="B""#).count(), 1);
        ensure_well_formed(&index).expect("well-formed");
        assert!(report.issues().is_empty());
    }

    #[test]
    fn missing_output_root_is_recorded() {
        let repo = TestRepo::new();
        repo.add_addon("A", "A", "1.0.0");
        let layout = repo.layout(&sample_config());

        let mut report = RunReport::default();
        let written = generate_index(&layout, &mut report);

        assert!(written.is_none());
        assert_eq!(report.errors().count(), 1);
        assert!(report.errors().all(|issue| issue.stage == Stage::Index));
    }

    #[test]
    fn malformed_manifest_is_left_out() {
        let repo = TestRepo::new();
        repo.add_addon("plugin.a", "plugin.a", "1.0.0");
        repo.write_file(
            "plugin.b/addon.xml",
            r#"<addon id="plugin.b" version="1.0"><broken></addon>"#,
        );
        let layout = repo.layout(&sample_config());
        layout.prepare().expect("output root");

        let mut report = RunReport::default();
        let path = generate_index(&layout, &mut report).expect("index written");

        let index = fs::read_to_string(path).expect("read index");
        ensure_well_formed(&index).expect("well-formed");
        assert!(index.contains(r#"id="plugin.a""#));
        assert!(!index.contains("plugin.b"));
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        let issue = errors.first().expect("one error");
        assert_eq!(issue.stage, Stage::Index);
        assert!(issue.subject.ends_with("plugin.b/addon.xml"));
        assert!(matches!(
            issue.error,
            GeneratorError::Manifest(ManifestError::Malformed { .. })
        ));
    }
}
