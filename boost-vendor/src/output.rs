//! User-facing output for the vendoring CLI.
//!
//! Progress and diagnostics go to an injected writer rather than straight
//! to the process streams, so tests can capture exactly what a user sees.

use crate::pipeline::VendorReport;
use camino::Utf8Path;
use std::fmt::Display;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the single diagnostic line printed when a run fails.
///
/// # Examples
///
/// ```
/// use boost_vendor::output::error_line;
///
/// assert_eq!(error_line("boom"), "Error: boom");
/// ```
#[must_use]
pub fn error_line(err: impl Display) -> String {
    format!("Error: {err}")
}

/// Format the completion message after a successful run.
#[must_use]
pub fn success_message(report: &VendorReport, target_dir: &Utf8Path) -> String {
    let plural = if report.files_copied == 1 { "file" } else { "files" };
    format!(
        "Boost headers vendored successfully: {} {plural} from {} selections into {target_dir}",
        report.files_copied, report.entries_applied
    )
}
