//! Unit tests for pipeline orchestration.

use super::*;
use crate::artefact::download::{DownloadError, MockArchiveDownloader};
use crate::artefact::extraction::{ExtractedTree, ExtractionError, MockArchiveExtractor};
use crate::artefact::verification::VerificationError;
use crate::test_utils::{
    FixtureDownloader, FixtureEntry, fixture_config, mini_boost_entries, snapshot_tree,
    tar_gz_bytes, utf8_temp_path,
};
use rstest::{fixture, rstest};
use std::fs;

struct Scene {
    _dir: tempfile::TempDir,
    workspace: Workspace,
    archive: Vec<u8>,
}

#[fixture]
fn scene() -> Scene {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = utf8_temp_path(&dir);
    Scene {
        workspace: Workspace::at(&root),
        archive: tar_gz_bytes(&mini_boost_entries()).expect("build fixture archive"),
        _dir: dir,
    }
}

fn stderr_text(stderr: Vec<u8>) -> String {
    String::from_utf8(stderr).expect("stderr was not UTF-8")
}

#[rstest]
fn happy_path_vendors_and_cleans_up(scene: Scene) {
    let config = fixture_config(&scene.archive);
    let downloader = FixtureDownloader::new(scene.archive.clone());

    let mut stderr = Vec::new();
    let report = run_pipeline(
        &config,
        &scene.workspace,
        &downloader,
        &GzipTarExtractor,
        &mut stderr,
    )
    .expect("pipeline should succeed");

    assert_eq!(
        report,
        VendorReport {
            entries_applied: 3,
            files_copied: 5,
            cleaned_up: true,
        }
    );
    assert_eq!(downloader.calls(), 1);
    assert!(!config.archive_path(&scene.workspace).exists());
    assert!(!config.source_path(&scene.workspace).exists());

    let text = stderr_text(stderr);
    for stage in ["Downloading", "Verifying", "Extracting", "Copying", "Cleaning up"] {
        assert!(text.contains(stage), "missing {stage} in {text}");
    }
}

#[rstest]
fn malformed_configured_digest_fails_before_download(scene: Scene) {
    let config = VendorConfig {
        expected_sha256: "not-a-digest".to_owned(),
        ..fixture_config(&scene.archive)
    };
    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().never();
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let result = run_pipeline(
        &config,
        &scene.workspace,
        &downloader,
        &extractor,
        &mut Vec::new(),
    );
    assert!(matches!(result, Err(VendorError::InvalidDigest(_))), "{result:?}");
}

#[rstest]
fn download_failure_stops_before_verification(scene: Scene) {
    let config = fixture_config(&scene.archive);
    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().times(1).returning(|url, _dest| {
        Err(DownloadError::HttpError {
            url: url.to_owned(),
            reason: "connection reset".to_owned(),
        })
    });
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let result = run_pipeline(
        &config,
        &scene.workspace,
        &downloader,
        &extractor,
        &mut Vec::new(),
    );
    let err = result.expect_err("download failed");
    assert!(matches!(err, VendorError::Network(_)), "{err:?}");
    assert!(err.to_string().contains("connection reset"));
    assert!(!config.target_path(&scene.workspace).exists());
}

#[rstest]
fn tampered_archive_is_never_extracted(scene: Scene) {
    let config = fixture_config(&scene.archive);
    let mut tampered = scene.archive.clone();
    if let Some(last) = tampered.last_mut() {
        *last ^= 0xFF;
    }
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let result = run_pipeline(
        &config,
        &scene.workspace,
        &FixtureDownloader::new(tampered),
        &extractor,
        &mut Vec::new(),
    );

    assert!(
        matches!(
            result,
            Err(VendorError::Integrity(VerificationError::Mismatch { .. }))
        ),
        "{result:?}"
    );
    assert!(!config.source_path(&scene.workspace).exists());
    assert!(!config.target_path(&scene.workspace).exists());
}

#[rstest]
fn missing_download_is_an_io_error_not_an_integrity_error(scene: Scene) {
    let config = fixture_config(&scene.archive);
    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().returning(|_url, _dest| Ok(()));
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();

    let result = run_pipeline(
        &config,
        &scene.workspace,
        &downloader,
        &extractor,
        &mut Vec::new(),
    );
    assert!(matches!(result, Err(VendorError::Io(_))), "{result:?}");
}

#[rstest]
fn extraction_failure_skips_copy_and_cleanup(scene: Scene) {
    let config = fixture_config(&scene.archive);
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .times(1)
        .returning(|_archive, _dest| Err(ExtractionError::EmptyArchive));

    let result = run_pipeline(
        &config,
        &scene.workspace,
        &FixtureDownloader::new(scene.archive.clone()),
        &extractor,
        &mut Vec::new(),
    );

    assert!(matches!(result, Err(VendorError::Extraction(_))), "{result:?}");
    assert!(config.archive_path(&scene.workspace).exists());
    assert!(!config.target_path(&scene.workspace).exists());
}

#[rstest]
fn archive_without_expected_top_level_dir_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let workspace = Workspace::at(&utf8_temp_path(&dir));
    let archive = tar_gz_bytes(&[FixtureEntry::File(
        "boost_1_85_0/boost/version.hpp",
        b"#define BOOST_VERSION 108500\n",
    )])
    .expect("build archive");
    let config = fixture_config(&archive);

    let result = run_pipeline(
        &config,
        &workspace,
        &FixtureDownloader::new(archive),
        &GzipTarExtractor,
        &mut Vec::new(),
    );
    assert!(
        matches!(
            result,
            Err(VendorError::Extraction(ExtractionError::MissingSourceDir { .. }))
        ),
        "{result:?}"
    );
}

#[rstest]
fn missing_selected_module_fails_and_keeps_artefacts(scene: Scene) {
    let archive = tar_gz_bytes(&[
        FixtureEntry::Dir("boost_1_86_0/"),
        FixtureEntry::File("boost_1_86_0/boost/version.hpp", b"// v\n"),
    ])
    .expect("build archive");
    let config = fixture_config(&archive);

    let result = run_pipeline(
        &config,
        &scene.workspace,
        &FixtureDownloader::new(archive),
        &GzipTarExtractor,
        &mut Vec::new(),
    );

    assert!(matches!(result, Err(VendorError::Filesystem(_))), "{result:?}");
    assert!(config.archive_path(&scene.workspace).exists());
    assert!(config.source_path(&scene.workspace).exists());
}

/// Extracts for real, then swaps the archive file for a directory so the
/// cleanup stage cannot `remove_file` it.
struct ArchiveBlockingExtractor;

impl ArchiveExtractor for ArchiveBlockingExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> std::result::Result<ExtractedTree, ExtractionError> {
        let tree = GzipTarExtractor.extract(archive_path, dest_dir)?;
        fs::remove_file(archive_path)?;
        fs::create_dir(archive_path)?;
        Ok(tree)
    }
}

#[rstest]
fn cleanup_failure_is_a_warning_not_an_error(scene: Scene) {
    let config = fixture_config(&scene.archive);
    let mut stderr = Vec::new();

    let report = run_pipeline(
        &config,
        &scene.workspace,
        &FixtureDownloader::new(scene.archive.clone()),
        &ArchiveBlockingExtractor,
        &mut stderr,
    )
    .expect("cleanup failure must not fail the run");

    assert!(!report.cleaned_up);
    assert!(stderr_text(stderr).contains("Warning: cleanup failed"));
    assert!(!config.source_path(&scene.workspace).exists());
    let files = snapshot_tree(&config.target_path(&scene.workspace)).expect("snapshot");
    assert_eq!(files.len(), 5);
}
