//! Boost vendoring CLI entrypoint.
//!
//! Runs the fetch, verify, extract, copy, and cleanup pipeline against the
//! current directory and exits non-zero with a single diagnostic line if any
//! stage fails.

use boost_vendor::cli::Cli;
use boost_vendor::config::{VendorConfig, Workspace};
use boost_vendor::error::Result;
use boost_vendor::output::{error_line, success_message, write_stderr_line};
use boost_vendor::pipeline::{VendorReport, vendor};
use clap::Parser;
use std::io::Write;

fn main() {
    let _cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut stderr = std::io::stderr();
    let config = VendorConfig::boost();
    let run_result = run(&config, &mut stderr);
    let exit_code = exit_code_for_run_result(&config, run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(config: &VendorConfig, stderr: &mut dyn Write) -> Result<VendorReport> {
    let workspace = Workspace::current()?;
    vendor(config, &workspace, stderr)
}

fn exit_code_for_run_result(
    config: &VendorConfig,
    result: Result<VendorReport>,
    stderr: &mut dyn Write,
) -> i32 {
    match result {
        Ok(report) => {
            write_stderr_line(stderr, success_message(&report, &config.target_dir));
            0
        }
        Err(err) => {
            write_stderr_line(stderr, error_line(err));
            1
        }
    }
}
