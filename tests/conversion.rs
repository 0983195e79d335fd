//! End-to-end conversion tests against real archive fixtures.

use rezip::{
    BatchEvent, BatchRunner, Config, Converter, RezipError, TempWorkspace, ToolPaths,
    ToolsConfig,
};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const ALPHA: &[u8] = b"alpha contents\n";
const BRAVO: &[u8] = b"bravo contents, a little longer\n";

fn converter() -> Converter {
    let tools = ToolPaths::resolve_with(
        &ToolsConfig {
            unrar_path: Some(PathBuf::from("definitely-missing-unrar")),
        },
        None,
    );
    Converter::new(&Config::default(), &tools)
}

fn runner() -> BatchRunner {
    BatchRunner::new(Arc::new(converter()), "_converted")
}

/// Writes `a.txt` and `sub/b.txt` under `root`.
fn write_sample_tree(root: &Path) {
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), ALPHA).unwrap();
    fs::write(root.join("sub").join("b.txt"), BRAVO).unwrap();
}

fn write_zip_fixture(path: &Path) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("a.txt", options).unwrap();
    writer.write_all(ALPHA).unwrap();
    writer.add_directory("sub/", options).unwrap();
    writer.start_file("sub/b.txt", options).unwrap();
    writer.write_all(BRAVO).unwrap();
    writer.finish().unwrap();
}

fn write_tar_fixture(path: &Path) {
    let mut builder = tar::Builder::new(File::create(path).unwrap());
    for (name, data) in [("a.txt", ALPHA), ("sub/b.txt", BRAVO)] {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
    builder.finish().unwrap();
}

fn write_7z_fixture(path: &Path, scratch: &Path) {
    write_7z_with_names(path, scratch, &["a.txt", "sub/b.txt"], &["a.txt", "sub/b.txt"]);
}

/// Stores each file of the sample tree under the matching entry name.
fn write_7z_with_names(path: &Path, scratch: &Path, files: &[&str], names: &[&str]) {
    let source = scratch.join("7z-source");
    write_sample_tree(&source);

    let mut writer = sevenz_rust::SevenZWriter::create(path).unwrap();
    for (file, name) in files.iter().zip(names) {
        let file_path = source.join(file);
        writer
            .push_archive_entry(
                sevenz_rust::SevenZArchiveEntry::from_path(&file_path, name.to_string()),
                Some(File::open(&file_path).unwrap()),
            )
            .unwrap();
    }
    writer.finish().unwrap();
}

fn read_zip_entries(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        entries.insert(file.name().to_string(), data);
    }
    entries
}

fn expected_entries() -> BTreeMap<String, Vec<u8>> {
    BTreeMap::from([
        ("a.txt".to_string(), ALPHA.to_vec()),
        ("sub/b.txt".to_string(), BRAVO.to_vec()),
    ])
}

fn assert_converts_faithfully(input: &Path) {
    let output = input.with_file_name("out_converted.zip");

    let summary = converter().convert(input, &output).unwrap();

    assert_eq!(summary.entries, 2);
    assert_eq!(read_zip_entries(&output), expected_entries());
    assert!(!TempWorkspace::path_for(input, "temp_").exists());
}

#[test]
fn test_zip_to_zip_preserves_contents() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sample.zip");
    write_zip_fixture(&input);

    assert_converts_faithfully(&input);
}

#[test]
fn test_tar_to_zip_preserves_contents() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sample.tar");
    write_tar_fixture(&input);

    assert_converts_faithfully(&input);
}

#[test]
fn test_7z_to_zip_preserves_contents() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sample.7z");
    write_7z_fixture(&input, temp_dir.path());

    assert_converts_faithfully(&input);
}

#[test]
fn test_compressed_tar_streams_are_unwrapped() {
    let temp_dir = TempDir::new().unwrap();
    let plain = temp_dir.path().join("plain.tar");
    write_tar_fixture(&plain);
    let tar_bytes = fs::read(&plain).unwrap();

    let gz = temp_dir.path().join("gz.tar");
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    fs::write(&gz, encoder.finish().unwrap()).unwrap();

    let bz = temp_dir.path().join("bz.tar");
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    fs::write(&bz, encoder.finish().unwrap()).unwrap();

    let xz = temp_dir.path().join("xz.tar");
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(&tar_bytes).unwrap();
    fs::write(&xz, encoder.finish().unwrap()).unwrap();

    for input in [&gz, &bz, &xz] {
        let output = input.with_extension("zip");
        let summary = converter().convert(input, &output).unwrap();
        assert_eq!(summary.entries, 2);
        assert_eq!(read_zip_entries(&output), expected_entries());
    }
}

#[test]
fn test_7z_entry_outside_workspace_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let inner = temp_dir.path().join("inner");
    fs::create_dir(&inner).unwrap();
    let input = inner.join("bad.7z");
    write_7z_with_names(&input, temp_dir.path(), &["a.txt"], &["../escaped.txt"]);
    let output = inner.join("bad_converted.zip");

    let err = converter().convert(&input, &output).unwrap_err();

    assert!(matches!(err, RezipError::Extraction { .. }));
    assert!(!inner.join("escaped.txt").exists());
    assert!(!output.exists());
    assert!(!TempWorkspace::path_for(&input, "temp_").exists());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_entry_name_fails_without_output() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("latin1.tar");
    let mut builder = tar::Builder::new(File::create(&input).unwrap());
    let mut header = tar::Header::new_gnu();
    header.set_size(ALPHA.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, Path::new(OsStr::from_bytes(b"caf\xe9.txt")), ALPHA)
        .unwrap();
    builder.finish().unwrap();
    drop(builder);
    let output = temp_dir.path().join("latin1_converted.zip");

    let err = converter().convert(&input, &output).unwrap_err();

    assert!(matches!(err, RezipError::Write { .. }));
    assert!(!output.exists());
    assert!(!TempWorkspace::path_for(&input, "temp_").exists());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_input_name_is_found() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join(OsStr::from_bytes(b"caf\xe9.tar"));
    write_tar_fixture(&input);
    let selection = rezip::Selection::from_paths([&input]);

    let summary = runner().run(selection.entries(), |_| {});

    assert!(summary.all_succeeded(), "{}", summary.items[0].message());
    let output = summary.items[0].output.clone().unwrap();
    assert_eq!(read_zip_entries(&output), expected_entries());
}

#[test]
fn test_uppercase_extension_is_recognised() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("SAMPLE.TAR");
    write_tar_fixture(&input);

    assert_converts_faithfully(&input);
}

#[test]
fn test_rar_without_tool_fails_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("old.rar");
    fs::write(&input, b"Rar!\x1a\x07\x00").unwrap();
    let output = temp_dir.path().join("old_converted.zip");

    let err = converter().convert(&input, &output).unwrap_err();

    assert!(matches!(err, RezipError::ToolNotFound { .. }));
    assert!(!output.exists());
    assert!(!TempWorkspace::path_for(&input, "temp_").exists());
}

#[test]
fn test_unsupported_extension_produces_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("logs.gz");
    fs::write(&input, b"\x1f\x8b").unwrap();

    let summary = runner().run(&[input], |_| {});

    assert_eq!(summary.failed, 1);
    assert!(summary.items[0].message().contains("Unsupported format"));
    assert!(!temp_dir.path().join("logs_converted.zip").exists());
}

#[test]
fn test_leftover_workspace_is_replaced() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("sample.zip");
    write_zip_fixture(&input);

    let stale = TempWorkspace::path_for(&input, "temp_");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("stale.txt"), "left behind").unwrap();

    assert_converts_faithfully(&input);
}

#[test]
fn test_repeated_conversion_picks_numbered_names() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("photos.zip");
    write_zip_fixture(&input);
    let first = temp_dir.path().join("photos_converted.zip");
    fs::write(&first, "existing output").unwrap();

    let runner = runner();
    let paths = vec![input.clone()];
    runner.run(&paths, |_| {});
    runner.run(&paths, |_| {});

    assert_eq!(fs::read(&first).unwrap(), b"existing output");
    assert_eq!(
        read_zip_entries(&temp_dir.path().join("photos_converted_1.zip")),
        expected_entries()
    );
    assert!(temp_dir.path().join("photos_converted_2.zip").is_file());
}

#[test]
fn test_mixed_batch_reports_every_input() {
    let temp_dir = TempDir::new().unwrap();
    let zip_input = temp_dir.path().join("one.zip");
    let tar_input = temp_dir.path().join("two.tar");
    let broken = temp_dir.path().join("three.7z");
    write_zip_fixture(&zip_input);
    write_tar_fixture(&tar_input);
    fs::write(&broken, "not really 7z").unwrap();

    let paths = vec![
        zip_input.clone(),
        temp_dir.path().join("missing.rar"),
        tar_input.clone(),
        broken.clone(),
        temp_dir.path().join("readme.txt"),
    ];

    let mut events = Vec::new();
    let summary = runner().run(&paths, |event| events.push(event));

    assert_eq!(summary.total(), paths.len());
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 3);

    let item_events = events
        .iter()
        .filter(|e| matches!(e, BatchEvent::ItemFinished(_)))
        .count();
    assert_eq!(item_events, paths.len());
    assert!(matches!(events.last(), Some(BatchEvent::Finished(_))));

    assert!(summary.items[1].message().contains("does not exist"));
    for input in [&zip_input, &tar_input, &broken] {
        assert!(!TempWorkspace::path_for(input, "temp_").exists());
    }
}

#[tokio::test]
async fn test_background_batch_streams_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = (0..3)
        .map(|i| temp_dir.path().join(format!("part{}.zip", i)))
        .collect();
    for input in &inputs {
        write_zip_fixture(input);
    }

    let gate = rezip::TriggerGate::new();
    let guard = gate.try_acquire().unwrap();
    let mut handle = runner().spawn(inputs.clone(), guard);

    let mut indices = Vec::new();
    let mut finished = 0;
    while let Some(event) = handle.next_event().await {
        match event {
            BatchEvent::ItemFinished(outcome) => indices.push(outcome.index),
            BatchEvent::Finished(summary) => {
                finished += 1;
                assert!(summary.all_succeeded());
            }
        }
    }
    handle.join().await.unwrap();

    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(finished, 1);
    assert!(gate.is_enabled());
}
