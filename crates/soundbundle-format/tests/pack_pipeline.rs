//! End-to-end packing tests over real directories.

mod common;

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use soundbundle_format::pipeline::{self, PackConfig, ProgressEvent, SkipReason};
use soundbundle_format::{wav, Archive, ArchiveError, Manifest, PackError};
use tempfile::TempDir;

use common::{create_test_wav, create_wav_with, write_file};

struct Fixture {
    _tmp: TempDir,
    src: PathBuf,
    config: PackConfig,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    let config = PackConfig::new(&src)
        .archive_path(tmp.path().join("sounds.bin"))
        .manifest_path(tmp.path().join("map.csv"));
    Fixture {
        _tmp: tmp,
        src,
        config,
    }
}

#[test]
fn test_single_canonical_file() {
    let fx = fixture();
    let path = write_file(
        &fx.src,
        "beep.wav",
        &create_test_wav(None, &[1, 2, 3, 4, 5, 6, 7, 8]),
    );

    assert!(wav::validate(&path));
    let location = wav::locate(&path).unwrap();
    assert_eq!((location.offset, location.length), (44, 8));

    let summary = pipeline::run(&fx.config).unwrap();
    assert_eq!(summary.discovered, 1);
    assert!(summary.skipped.is_empty());

    let bytes = fs::read(&fx.config.archive_path).unwrap();
    let mut expected = Vec::new();
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(&12u32.to_le_bytes());
    expected.extend_from_slice(&8u32.to_le_bytes());
    expected.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(bytes, expected);
    assert_eq!(summary.archive_bytes, 20);
    assert_eq!(summary.archive_hash, blake3::hash(&expected).to_hex().to_string());

    let map = fs::read_to_string(&fx.config.manifest_path).unwrap();
    assert_eq!(map, format!("0000,{}\n", path.display()));
}

#[test]
fn test_invalid_files_are_skipped_without_failing() {
    let fx = fixture();
    let mut no_wave = create_test_wav(None, &[1; 4]);
    no_wave[8..12].copy_from_slice(b"WAVX");
    write_file(&fx.src, "a_broken.wav", &no_wave);
    write_file(&fx.src, "b_stereo.wav", &create_wav_with(2, 22050, 16, None, &[0; 4]));
    write_file(&fx.src, "c_notes.txt", b"just some text");
    let good = write_file(&fx.src, "d_good.wav", &create_test_wav(None, &[9; 6]));

    let summary = pipeline::run(&fx.config).unwrap();
    assert_eq!(summary.discovered, 4);
    assert_eq!(summary.skipped.len(), 3);
    assert!(summary
        .skipped
        .iter()
        .all(|s| matches!(s.reason, SkipReason::Invalid(_))));

    assert_eq!(summary.packed.len(), 1);
    assert_eq!(summary.packed[0].path, good);

    let archive = Archive::open(&fx.config.archive_path).unwrap();
    assert_eq!(archive.entry_count(), 1);
    assert_eq!(archive.clip(0), Some(&[9u8; 6][..]));
}

#[test]
fn test_unsupported_chunk_layout_is_skipped() {
    let fx = fixture();
    let mut fact = create_test_wav(None, &[1; 4]);
    fact[36..40].copy_from_slice(b"fact");
    write_file(&fx.src, "fact.wav", &fact);

    let summary = pipeline::run(&fx.config).unwrap();
    assert!(summary.packed.is_empty());
    assert_eq!(summary.skipped.len(), 1);
    assert!(matches!(summary.skipped[0].reason, SkipReason::Format(_)));

    // An empty archive is just the zero count.
    assert_eq!(fs::read(&fx.config.archive_path).unwrap(), vec![0, 0, 0, 0]);
    assert_eq!(fs::read_to_string(&fx.config.manifest_path).unwrap(), "");
}

#[test]
fn test_short_payload_aborts_run() {
    let fx = fixture();
    write_file(&fx.src, "a.wav", &create_test_wav(None, &[1; 8]));
    let mut truncated = create_test_wav(None, &[2; 16]);
    truncated.truncate(50);
    let short = write_file(&fx.src, "b.wav", &truncated);

    match pipeline::run(&fx.config) {
        Err(PackError::Archive(ArchiveError::PayloadRead { path, .. })) => {
            assert_eq!(path, short);
        }
        other => panic!("expected payload read failure, got {:?}", other),
    }
    assert!(!fx.config.archive_path.exists());
    assert!(!fx.config.manifest_path.exists());
}

#[test]
fn test_list_chunk_and_uneven_lengths_round_trip() {
    let fx = fixture();
    let list_a = [0x55u8; 10];
    let clips: [(&str, Option<&[u8]>, Vec<u8>); 5] = [
        ("01.wav", None, (0u8..10).collect()),
        ("02.wav", Some(&list_a[..]), (100u8..103).collect()),
        ("03.wav", Some(&b"INFOISFT"[..]), (200u8..240).collect()),
        ("04.wav", None, Vec::new()),
        ("nested/05.bin", None, vec![7u8; 5]),
    ];
    let paths: Vec<PathBuf> = clips
        .iter()
        .map(|(name, list, data)| write_file(&fx.src, name, &create_test_wav(*list, data)))
        .collect();

    let summary = pipeline::run(&fx.config).unwrap();
    assert!(summary.skipped.is_empty());

    let archive = Archive::open(&fx.config.archive_path).unwrap();
    let entries = archive.entries();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].offset, 4 + 5 * 8);
    for pair in entries.windows(2) {
        assert_eq!(pair[0].end(), u64::from(pair[1].offset));
    }

    // Walk order is lexical: 01..04, then nested/05.bin.
    let packed_paths: Vec<PathBuf> = summary.packed.iter().map(|p| p.path.clone()).collect();
    assert_eq!(packed_paths, paths);

    let bytes = fs::read(&fx.config.archive_path).unwrap();
    assert_eq!(summary.archive_bytes, bytes.len() as u64);
    assert_eq!(summary.archive_hash, blake3::hash(&bytes).to_hex().to_string());
    for (i, path) in paths.iter().enumerate() {
        let location = wav::locate(path).unwrap();
        let direct = soundbundle_format::archive::read_payload(path, location).unwrap();
        let entry = entries[i];
        assert_eq!(&bytes[entry.offset as usize..entry.end() as usize], &direct[..]);
        assert_eq!(direct, clips[i].2);
    }

    let manifest = Manifest::load(&fx.config.manifest_path).unwrap();
    assert_eq!(manifest.len(), archive.entry_count() as usize);
    for (i, entry) in manifest.entries().iter().enumerate() {
        assert_eq!(entry.index as usize, i);
        assert_eq!(PathBuf::from(&entry.path), paths[i]);
    }
}

#[cfg(unix)]
#[test]
fn test_non_utf8_path_is_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fx = fixture();
    let good = write_file(&fx.src, "a.wav", &create_test_wav(None, &[1; 2]));
    let bad = fx.src.join(OsStr::from_bytes(b"b\xff.wav"));
    fs::write(&bad, create_test_wav(None, &[2; 2])).unwrap();

    let summary = pipeline::run(&fx.config).unwrap();
    assert_eq!(summary.packed.len(), 1);
    assert_eq!(summary.packed[0].path, good);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, bad);
    assert!(matches!(summary.skipped[0].reason, SkipReason::NonUtf8Path));

    let map = fs::read_to_string(&fx.config.manifest_path).unwrap();
    assert_eq!(map, format!("0000,{}\n", good.display()));
}

#[test]
fn test_list_chunk_offset() {
    let fx = fixture();
    let path = write_file(
        &fx.src,
        "tagged.wav",
        &create_test_wav(Some(&[0u8; 10][..]), &[4, 3, 2, 1]),
    );
    let location = wav::locate(&path).unwrap();
    assert_eq!((location.offset, location.length), (62, 4));
}

#[test]
fn test_input_manifest_orders_listed_files_first() {
    let fx = fixture();
    let a = write_file(&fx.src, "a.wav", &create_test_wav(None, &[1; 2]));
    let b = write_file(&fx.src, "b.wav", &create_test_wav(None, &[2; 4]));
    let c = write_file(&fx.src, "c.wav", &create_test_wav(None, &[3; 6]));
    let ghost = fx.src.join("ghost.wav");

    let order_path = fx.src.parent().unwrap().join("order.csv");
    Manifest::from_paths([&c, &ghost, &a]).save(&order_path).unwrap();

    let config = fx.config.clone().input_manifest(Some(order_path));
    let mut missing = Vec::new();
    let summary = pipeline::run_with_progress(&config, |event| {
        if let ProgressEvent::OrderingMissing { path } = event {
            missing.push(path.to_path_buf());
        }
    })
    .unwrap();

    let order: Vec<PathBuf> = summary.packed.iter().map(|p| p.path.clone()).collect();
    assert_eq!(order, vec![c, a, b]);
    assert_eq!(missing, vec![ghost]);

    let archive = Archive::open(&config.archive_path).unwrap();
    assert_eq!(archive.clip(0), Some(&[3u8; 6][..]));
    assert_eq!(archive.clip(2), Some(&[2u8; 4][..]));
}

#[test]
fn test_progress_events_follow_phase_order() {
    let fx = fixture();
    write_file(&fx.src, "a.wav", &create_test_wav(None, &[1; 2]));
    write_file(&fx.src, "b.txt", b"nope");
    write_file(&fx.src, "c.wav", &create_test_wav(None, &[1; 2]));

    let mut events = Vec::new();
    pipeline::run_with_progress(&fx.config, |event| {
        let tag = match event {
            ProgressEvent::Discovered { count } => format!("discovered {}", count),
            ProgressEvent::Validating { index, total, .. } => {
                format!("validate {}/{}", index + 1, total)
            }
            ProgressEvent::Skipped(_) => "skip".to_string(),
            ProgressEvent::Collecting { index, total, .. } => {
                format!("collect {}/{}", index + 1, total)
            }
            ProgressEvent::OrderingMissing { .. } => "missing".to_string(),
            ProgressEvent::ArchiveWritten { bytes, .. } => format!("archive {}", bytes),
            ProgressEvent::ManifestWritten { entries, .. } => format!("manifest {}", entries),
        };
        events.push(tag);
    })
    .unwrap();

    assert_eq!(
        events,
        vec![
            "discovered 3",
            "validate 1/3",
            "validate 2/3",
            "skip",
            "validate 3/3",
            "collect 1/2",
            "collect 2/2",
            "archive 24",
            "manifest 2",
        ]
    );
}

#[test]
fn test_missing_source_dir_is_fatal() {
    let fx = fixture();
    let config = PackConfig::new(fx.src.join("does-not-exist"))
        .archive_path(fx.config.archive_path.clone())
        .manifest_path(fx.config.manifest_path.clone());
    assert!(matches!(
        pipeline::run(&config),
        Err(PackError::SourceNotDirectory(_))
    ));
    assert!(!config.archive_path.exists());
}

#[test]
fn test_missing_input_manifest_is_fatal() {
    let fx = fixture();
    write_file(&fx.src, "a.wav", &create_test_wav(None, &[1; 2]));
    let config = fx
        .config
        .clone()
        .input_manifest(Some(fx.src.join("no-such-map.csv")));
    assert!(matches!(
        pipeline::run(&config),
        Err(PackError::InputManifest { .. })
    ));
}

#[test]
fn test_unwritable_archive_is_fatal() {
    let fx = fixture();
    write_file(&fx.src, "a.wav", &create_test_wav(None, &[1; 2]));
    let config = fx
        .config
        .clone()
        .archive_path(fx.src.join("missing-dir").join("sounds.bin"));
    assert!(matches!(
        pipeline::run(&config),
        Err(PackError::WriteArchive { .. })
    ));
}
