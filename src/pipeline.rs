//! End-to-end repository generation.
//!
//! The stages run in a fixed order: bootstrap, archive, index, stamp. Only
//! setup failures abort the run; everything else lands in the
//! [`RunReport`].

use crate::archive::package_all;
use crate::bootstrap::bootstrap_repository_addon;
use crate::config::Config;
use crate::error::Result;
use crate::index::generate_index;
use crate::layout::RepoLayout;
use crate::report::RunReport;
use crate::stamp::generate_stamp;

/// Run every stage against `layout`.
///
/// # Errors
///
/// Returns an error if the output root cannot be created, or the repository
/// addon manifest has to be rendered and its template is unusable.
pub fn run(config: &Config, layout: &RepoLayout) -> Result<RunReport> {
    let mut report = RunReport::default();
    layout.prepare()?;
    bootstrap_repository_addon(config, layout, &mut report)?;

    let packaged = package_all(config.excludes(), layout, &mut report);
    report.set_packaged(packaged);

    let index = generate_index(layout, &mut report);
    let wrote_index = index.is_some();
    report.set_index(index);

    let checksum = if wrote_index {
        generate_stamp(config.checksum(), layout, &mut report)
    } else {
        None
    };
    report.set_checksum(checksum);

    Ok(report)
}
