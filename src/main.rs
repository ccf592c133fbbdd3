//! Kodi repository generator CLI entrypoint.
//!
//! Resolves the tools directory and repository root, loads `config.toml`, and
//! runs the pipeline. Per-addon problems are summarised at the end without
//! failing the process; setup errors exit with status 1.

use clap::Parser;
use env_logger::Env;
use kodi_repo_generator::cli::Cli;
use kodi_repo_generator::config::Config;
use kodi_repo_generator::error::Result;
use kodi_repo_generator::layout::{
    RepoLayout, config_path, resolve_repo_root, resolve_tools_dir,
};
use kodi_repo_generator::pipeline;
use kodi_repo_generator::report::{RunReport, describe};
use std::io::Write;

const CHECKSUM_REMINDER: &str = concat!(
    "If clients do not pick up new versions, check that the published ",
    "addons.xml.md5 matches the published addons.xml.",
);

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    let tools_dir = resolve_tools_dir(cli.tools_dir.as_deref())?;
    let root = resolve_repo_root(&tools_dir, cli.repo_root.as_deref())?;
    let config = Config::load(&config_path(&tools_dir))?;
    let layout = RepoLayout::new(root, tools_dir, &config);
    pipeline::run(&config, &layout)
}

fn exit_code_for_run_result(result: Result<RunReport>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(report) => {
            for line in report.summary_lines() {
                write_stderr_line(stderr, line);
            }
            write_stderr_line(stderr, CHECKSUM_REMINDER);
            0
        }
        Err(err) => {
            write_stderr_line(stderr, describe(&err));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}
