//! Boost header vendoring library.
//!
//! Fetches a pinned Boost release archive, verifies its SHA-256 digest,
//! extracts it, and copies a fixed selection of modules and headers into the
//! host project's include tree. The `boost-vendor` binary is a thin wrapper
//! around [`pipeline::vendor`].
//!
//! # Modules
//!
//! - [`artefact`] - Archive download, digest verification, and extraction
//! - [`cleanup`] - Removal of the downloaded archive and extracted tree
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Pinned release constants and run directories
//! - [`copier`] - Merge-copying of selected modules and headers
//! - [`error`] - Pipeline-level error type
//! - [`output`] - User-facing progress and result lines
//! - [`pipeline`] - Stage orchestration
//! - [`selection`] - The Signals2 dependency closure

pub mod artefact;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod copier;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod selection;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
