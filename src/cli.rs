//! CLI argument definitions for the repository generator.

use camino::Utf8PathBuf;
use clap::Parser;

/// Generate a Kodi addon repository.
#[derive(Parser, Debug, Default)]
#[command(name = "kodi-repo-generator")]
#[command(version, about)]
#[command(long_about = concat!(
    "Generate a Kodi addon repository.\n\n",
    "Zips every addon directory under the repository root into ",
    "_<output_path>/<id>/<dir>-<version>.zip, aggregates their manifests into ",
    "addons.xml and writes an addons.xml.md5 stamp. On first run the ",
    "repository addon itself is created from template.xml.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Run from the tools directory of a checkout:\n",
    "    $ cd _tools && kodi-repo-generator\n\n",
    "  Point at the directories explicitly:\n",
    "    $ kodi-repo-generator --tools-dir repo/_tools --repo-root repo",
))]
pub struct Cli {
    /// Directory holding config.toml and template.xml [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub tools_dir: Option<Utf8PathBuf>,

    /// Directory holding the addon directories [default: parent of the tools directory].
    #[arg(long, value_name = "DIR")]
    pub repo_root: Option<Utf8PathBuf>,
}
