use pretty_assertions::assert_eq;
use proptest::prelude::*;
use solpack_archive::{
    build_archive, build_archive_with, ArchiveBuilder, ArchiveError, Compression, InclusionPolicy,
    Overrides,
};
use solpack_test_utils::{json_manifest, SolutionFixture};
use std::io::Read;
use std::path::{Path, PathBuf};

fn entry_names(archive: &Path) -> Vec<String> {
    let file = std::fs::File::open(archive).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

fn read_entry(archive: &Path, name: &str) -> Vec<u8> {
    let file = std::fs::File::open(archive).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn fleet() -> solpack_test_utils::BuiltFixture {
    SolutionFixture::new("fleet")
        .manifest_json(&json_manifest("fleet"))
        .file("data.json", r#"{"id": "fleet"}"#)
        .file(".git/config", "[core]\n")
        .file(".DS_Store", "junk")
        .file(".tag", "v1")
        .file("sub/nested/x.yaml", "a: 1\n")
        .file("sub/.DS_Store", "junk")
        .dir("empty")
        .build()
}

#[test]
fn excludes_vcs_and_denylisted_names() {
    let fixture = fleet();
    let handle = build_archive(fixture.root(), Some(fixture.parent())).unwrap();

    assert_eq!(handle.path, fixture.parent().join("fleet.zip"));
    assert_eq!(
        entry_names(&handle.path),
        vec![
            "fleet/",
            "fleet/data.json",
            "fleet/empty/",
            "fleet/manifest.json",
            "fleet/sub/",
            "fleet/sub/nested/",
            "fleet/sub/nested/x.yaml",
        ]
    );
    assert_eq!(handle.entries, 7);
    assert_eq!(read_entry(&handle.path, "fleet/data.json"), br#"{"id": "fleet"}"#);
}

#[test]
fn handle_describes_the_file() {
    let fixture = fleet();
    let handle = build_archive(fixture.root(), Some(fixture.parent())).unwrap();

    let bytes = std::fs::read(&handle.path).unwrap();
    assert_eq!(handle.size, bytes.len() as u64);
    assert_eq!(handle.fingerprint, solpack_model::Fingerprint::compute(&bytes));
}

#[test]
fn explicit_file_destination_is_used_verbatim() {
    let fixture = fleet();
    let out = fixture.parent().join("custom.zip");
    std::fs::write(&out, "stale").unwrap();

    let handle = build_archive(fixture.root(), Some(&out)).unwrap();

    assert_eq!(handle.path, out);
    assert_eq!(entry_names(&out)[0], "fleet/");
    assert_eq!(dir_listing(fixture.parent()), vec!["custom.zip", "fleet"]);
}

#[test]
fn no_destination_creates_temp_file() {
    let fixture = fleet();
    let handle = build_archive(fixture.root(), None).unwrap();

    let file_name = handle.path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(file_name.starts_with("fleet-"));
    assert!(file_name.ends_with(".zip"));
    assert!(handle.path.exists());
    assert!(entry_names(&handle.path).contains(&"fleet/manifest.json".to_string()));

    std::fs::remove_file(&handle.path).unwrap();
}

#[test]
fn archive_inside_solution_is_not_self_included() {
    let fixture = fleet();
    let first = build_archive(fixture.root(), Some(fixture.root())).unwrap();
    assert_eq!(first.path, fixture.root().join("fleet.zip"));

    let second = build_archive(fixture.root(), Some(fixture.root())).unwrap();
    let names = entry_names(&second.path);
    assert!(!names.iter().any(|n| n.ends_with(".zip") || n.contains(".partial")));
    assert_eq!(second.entries, 7);
}

#[test]
fn overrides_replace_disk_bytes() {
    let fixture = fleet();
    let mut overrides = Overrides::new();
    overrides.insert(PathBuf::from("data.json"), br#"{"id": "${sys.solutionId}"}"#.to_vec());
    overrides.insert(PathBuf::from("sub/nested/x.yaml"), b"a: 2\n".to_vec());

    let handle = build_archive_with(fixture.root(), Some(fixture.parent()), &overrides).unwrap();

    assert_eq!(
        read_entry(&handle.path, "fleet/data.json"),
        br#"{"id": "${sys.solutionId}"}"#
    );
    assert_eq!(read_entry(&handle.path, "fleet/sub/nested/x.yaml"), b"a: 2\n");
    assert_eq!(fixture.read("data.json"), br#"{"id": "fleet"}"#);
}

#[test]
fn stored_compression_and_custom_policy() {
    let fixture = fleet();
    let builder = ArchiveBuilder::new()
        .with_compression(Compression::Stored)
        .with_policy(InclusionPolicy::new().with_exclude_names(["data.json"]));

    let handle = builder.build(fixture.root(), Some(fixture.parent())).unwrap();
    let names = entry_names(&handle.path);

    assert!(!names.contains(&"fleet/data.json".to_string()));
    assert!(names.contains(&"fleet/.tag".to_string()));
    assert!(!names.iter().any(|n| n.contains(".git/")));

    let file = std::fs::File::open(&handle.path).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let entry = zip.by_name("fleet/manifest.json").unwrap();
    assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
}

#[test]
fn missing_destination_directory_fails_without_leftovers() {
    let fixture = fleet();
    let dest = fixture.parent().join("missing").join("fleet.zip");

    let err = build_archive(fixture.root(), Some(&dest)).unwrap_err();

    assert!(matches!(err, ArchiveError::Io { .. }));
    assert!(!dest.exists());
}

#[cfg(unix)]
#[test]
fn finished_archives_are_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = fleet();
    let explicit = build_archive(fixture.root(), Some(fixture.parent())).unwrap();
    let temporary = build_archive(fixture.root(), None).unwrap();

    for path in [&explicit.path, &temporary.path] {
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644, "{}", path.display());
    }

    std::fs::remove_file(&temporary.path).unwrap();
}

#[cfg(unix)]
#[test]
fn failure_mid_walk_removes_partial_archive() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = fleet();
    std::fs::create_dir(fixture.root().join(OsStr::from_bytes(b"bad\xff"))).unwrap();
    let out = fixture.parent().join("out");
    std::fs::create_dir(&out).unwrap();

    let err = build_archive(fixture.root(), Some(&out)).unwrap_err();

    assert!(matches!(err, ArchiveError::NonUtf8Path { .. }));
    assert!(dir_listing(&out).is_empty());
}

const SEGMENTS: &[&str] = &["a", "b", ".git", ".tag", ".DS_Store", "data.json"];

fn excluded(policy: &InclusionPolicy, rel: &str) -> bool {
    Path::new(rel)
        .components()
        .any(|c| policy.excludes_name(c.as_os_str()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Every archived entry avoids excluded components, and every file whose
    // path avoids them is archived.
    #[test]
    fn archive_matches_policy(paths in proptest::collection::vec(
        proptest::collection::vec(0..SEGMENTS.len(), 1..4), 1..8
    )) {
        let policy = InclusionPolicy::new();
        let mut builder = SolutionFixture::new("fleet").manifest_json(&json_manifest("fleet"));
        let mut expected_files = Vec::new();

        for segments in &paths {
            let rel: Vec<&str> = segments.iter().map(|i| SEGMENTS[*i]).collect();
            // Keep a file and a directory from sharing a path: files get a
            // dedicated leaf name.
            let rel = format!("{}/leaf.txt", rel.join("/"));
            if !excluded(&policy, &rel) {
                expected_files.push(format!("fleet/{rel}"));
            }
            builder = builder.file(&rel, "x");
        }
        let fixture = builder.build();
        let out = fixture.parent().join("out");
        std::fs::create_dir(&out).unwrap();

        let handle = build_archive(fixture.root(), Some(&out)).unwrap();
        let names = entry_names(&handle.path);

        for name in &names {
            let rel = name.trim_start_matches("fleet/").trim_end_matches('/');
            prop_assert!(!excluded(&policy, rel), "{name}");
        }
        for file in &expected_files {
            prop_assert!(names.contains(file), "missing {file}");
        }
    }
}
