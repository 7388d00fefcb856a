//! CLI argument definitions for the Boost vendoring tool.
//!
//! The tool takes no options: the release, checksum, and target tree are
//! pinned in [`crate::config`]. Parsing still goes through clap so that
//! `--help` and `--version` behave like every other binary in the project,
//! and stray arguments are rejected instead of silently ignored.

use crate::config::{BOOST_ARCHIVE, TARGET_DIR};
use clap::Parser;

/// Vendor the pinned Boost headers into the project tree.
#[derive(Parser, Debug, Clone, Copy, PartialEq, Eq)]
#[command(name = "boost-vendor")]
#[command(version, about)]
#[command(long_about = long_about())]
pub struct Cli {}

/// Help text naming the pinned archive and target tree.
fn long_about() -> String {
    format!(
        "Vendor the pinned Boost headers into the project tree.\n\n\
         Downloads {BOOST_ARCHIVE} into the current directory, verifies its \
         SHA-256 checksum, extracts it, and copies the Signals2 dependency \
         closure into {TARGET_DIR}. The archive and extracted tree are \
         removed afterwards.\n\n\
         Run from the project root. Progress is written to stderr; set \
         RUST_LOG to adjust log verbosity."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use rstest::rstest;

    #[test]
    fn cli_parses_without_arguments() {
        assert_eq!(Cli::try_parse_from(["boost-vendor"]).ok(), Some(Cli {}));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn long_help_names_the_pinned_archive_and_target() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains(BOOST_ARCHIVE), "{help}");
        assert!(help.contains(TARGET_DIR), "{help}");
    }

    #[rstest]
    #[case::positional(&["boost-vendor", "signals2"])]
    #[case::unknown_flag(&["boost-vendor", "--target-dir", "/tmp"])]
    fn cli_rejects_arguments(#[case] args: &[&str]) {
        let err = Cli::try_parse_from(args).expect_err("arguments are not accepted");
        assert!(matches!(
            err.kind(),
            ErrorKind::UnknownArgument | ErrorKind::InvalidValue
        ));
    }

    #[rstest]
    #[case::help("--help", ErrorKind::DisplayHelp)]
    #[case::version("--version", ErrorKind::DisplayVersion)]
    fn cli_supports_builtin_flags(#[case] flag: &str, #[case] kind: ErrorKind) {
        let err = Cli::try_parse_from(["boost-vendor", flag]).expect_err("flag short-circuits");
        assert_eq!(err.kind(), kind);
    }
}
