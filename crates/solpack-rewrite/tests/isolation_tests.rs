use pretty_assertions::assert_eq;
use proptest::prelude::*;
use solpack_codec::{Codec, Encoding, GenericValue};
use solpack_model::SolutionDirectoryContents;
use solpack_rewrite::{convert, IsolationDirection, IsolationError, NATIVE_PLACEHOLDER};
use solpack_test_utils::{json_manifest, SolutionFixture};

const FLEET_MANIFEST: &str = r#"{
  "name": "fleet${$TAG}",
  "solutionVersion": "1.0.0",
  "objects": [
    {"type": "fleet:ship", "objectsFile": "ships.json"},
    {"type": "fleet:config", "objectsDir": "config"}
  ]
}"#;

const SHIPS: &str = r#"[
  {
    "id": "fleet",
    "owner": "${$SOLUTION_NAME}",
    "note": "my fleet is ready",
    "team": "spacefleet-ops"
  }
]"#;

fn fleet_fixture() -> solpack_test_utils::BuiltFixture {
    SolutionFixture::new("fleet")
        .manifest_json(FLEET_MANIFEST)
        .file("ships.json", SHIPS)
        .file("config/settings.yaml", "solution: fleet\nreplicas: 3\n")
        .file("notes.txt", "fleet")
        .file(".env.json", r#"{"x": "fleet"}"#)
        .build()
}

fn decode(contents: &SolutionDirectoryContents, name: &str) -> GenericValue {
    let file = contents.file(name).unwrap();
    Codec::new().decode(file.contents(), file.encoding()).unwrap()
}

#[test]
fn native_conversion_end_to_end() {
    let fixture = fleet_fixture();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

    let report = convert(&mut contents, IsolationDirection::Native).unwrap();

    assert_eq!(report.manifest_replacements, 3);
    assert_eq!(report.file_replacements, 3);
    assert_eq!(report.total(), 6);
    assert_eq!(report.skipped, vec!["notes.txt".to_string()]);

    assert_eq!(contents.manifest().name, "fleet");
    assert_eq!(contents.manifest().objects[0].object_type, "${sys.solutionId}:ship");
    assert_eq!(contents.manifest().objects[1].object_type, "${sys.solutionId}:config");

    assert_eq!(contents.file("ships.json").unwrap().object_type(), "${sys.solutionId}:ship");
    assert_eq!(
        contents.file("config/settings.yaml").unwrap().object_type(),
        "${sys.solutionId}:config"
    );

    let ships = decode(&contents, "ships.json");
    let ship = &ships[0];
    assert_eq!(ship["id"].as_str(), Some(NATIVE_PLACEHOLDER));
    assert_eq!(ship["owner"].as_str(), Some(NATIVE_PLACEHOLDER));
    assert_eq!(ship["note"].as_str(), Some("my fleet is ready"));
    assert_eq!(ship["team"].as_str(), Some("spacefleet-ops"));

    let settings = decode(&contents, "config/settings.yaml");
    assert_eq!(settings["solution"].as_str(), Some(NATIVE_PLACEHOLDER));
    assert_eq!(settings["replicas"].as_u64(), Some(3));

    assert_eq!(contents.file("notes.txt").unwrap().contents(), b"fleet");
    assert!(!contents.file("notes.txt").unwrap().is_modified());
    assert_eq!(contents.file(".env.json").unwrap().contents(), br#"{"x": "fleet"}"#);
}

#[test]
fn changes_carry_paths() {
    let fixture = fleet_fixture();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

    let report = convert(&mut contents, IsolationDirection::Native).unwrap();
    let ships: Vec<String> = report
        .changes
        .iter()
        .filter(|c| c.file == "ships.json")
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        ships,
        vec![
            "[0].id: fleet -> ${sys.solutionId}".to_string(),
            "[0].owner: ${$SOLUTION_NAME} -> ${sys.solutionId}".to_string(),
        ]
    );
}

#[test]
fn conversion_is_idempotent() {
    let fixture = fleet_fixture();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();
    convert(&mut contents, IsolationDirection::Native).unwrap();

    let snapshot: Vec<Vec<u8>> = contents.files().map(|f| f.contents().to_vec()).collect();
    let manifest = contents.manifest_file().contents().to_vec();

    let again = convert(&mut contents, IsolationDirection::Native).unwrap();

    assert_eq!(again.total(), 0);
    assert!(again.changes.is_empty());
    let after: Vec<Vec<u8>> = contents.files().map(|f| f.contents().to_vec()).collect();
    assert_eq!(after, snapshot);
    assert_eq!(contents.manifest_file().contents(), manifest.as_slice());
}

#[test]
fn solution_named_like_the_placeholder_converts_once() {
    let manifest = r#"{
  "name": "sys${$TAG}",
  "solutionVersion": "1.0.0",
  "objects": [{"type": "sys:ship", "objectsFile": "ships.json"}]
}"#;
    let fixture = SolutionFixture::new("sys")
        .manifest_json(manifest)
        .file("ships.json", r#"[{"id": "sys"}]"#)
        .build();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

    let first = convert(&mut contents, IsolationDirection::Native).unwrap();
    assert_eq!(first.manifest_replacements, 2);
    assert_eq!(first.file_replacements, 1);
    assert_eq!(contents.manifest().objects[0].object_type, "${sys.solutionId}:ship");
    contents.write_back().unwrap();

    let mut reloaded = SolutionDirectoryContents::load(fixture.root()).unwrap();
    let manifest_bytes = reloaded.manifest_file().contents().to_vec();

    let second = convert(&mut reloaded, IsolationDirection::Native).unwrap();
    assert_eq!(second.total(), 0);
    assert!(second.changes.is_empty());
    assert_eq!(reloaded.manifest().objects[0].object_type, "${sys.solutionId}:ship");
    assert_eq!(reloaded.manifest_file().contents(), manifest_bytes.as_slice());
    assert!(!reloaded.manifest_file().is_modified());
    assert!(reloaded.files().all(|f| !f.is_modified()));
}

#[test]
fn duplicate_json_keys_convert_with_last_value() {
    let fixture = SolutionFixture::new("fleet")
        .manifest_json(&json_manifest("fleet"))
        .file("ships.json", r#"{"id": "x", "id": "fleet"}"#)
        .build();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

    let report = convert(&mut contents, IsolationDirection::Native).unwrap();

    assert_eq!(report.file_replacements, 1);
    let ships = decode(&contents, "ships.json");
    assert_eq!(ships["id"].as_str(), Some(NATIVE_PLACEHOLDER));
}

#[test]
fn write_back_persists_rewritten_files_only() {
    let fixture = fleet_fixture();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();
    convert(&mut contents, IsolationDirection::Native).unwrap();

    let written = contents.write_back().unwrap();
    // manifest, ships.json, config/settings.yaml
    assert_eq!(written, 3);

    let reloaded = SolutionDirectoryContents::load(fixture.root()).unwrap();
    assert_eq!(reloaded.manifest().name, "fleet");
    let ships = decode(&reloaded, "ships.json");
    assert_eq!(ships[0]["id"].as_str(), Some(NATIVE_PLACEHOLDER));
    assert_eq!(fixture.read("notes.txt"), b"fleet");
}

#[test]
fn malformed_file_aborts_conversion() {
    let fixture = SolutionFixture::new("fleet")
        .manifest_json(&json_manifest("fleet"))
        .file("broken.json", "{\"id\": \"fleet\"")
        .build();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

    let err = convert(&mut contents, IsolationDirection::Native).unwrap_err();
    match err {
        IsolationError::Rewrite(inner) => assert!(inner.is_decode()),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!contents.file("broken.json").unwrap().is_modified());
}

#[test]
fn invalid_manifest_name_is_rejected() {
    let fixture = SolutionFixture::new("fleet")
        .manifest_json(&json_manifest("Fleet-Ops"))
        .file("ships.json", SHIPS)
        .build();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

    let err = convert(&mut contents, IsolationDirection::Native).unwrap_err();
    assert!(matches!(err, IsolationError::InvalidName { .. }));
    assert!(contents.files().all(|f| !f.is_modified()));
}

#[test]
fn yaml_file_keeps_yaml_encoding() {
    let fixture = SolutionFixture::new("fleet")
        .manifest_json(&json_manifest("fleet"))
        .file("ships.yaml", "- id: fleet\n  size: 2\n")
        .build();
    let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();
    convert(&mut contents, IsolationDirection::Native).unwrap();

    let file = contents.file("ships.yaml").unwrap();
    assert_eq!(file.encoding(), Encoding::Yaml);
    let tree = decode(&contents, "ships.yaml");
    assert_eq!(tree[0]["id"].as_str(), Some(NATIVE_PLACEHOLDER));
    assert_eq!(tree[0]["size"].as_u64(), Some(2));
}

fn value_for(choice: u8) -> &'static str {
    match choice {
        0 => "fleet",
        1 => "${$SOLUTION_NAME}",
        2 => "the fleet",
        3 => "fleet-ops",
        4 => "spacefleet",
        _ => "unrelated",
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Only exact occurrences are replaced; values merely containing the
    // name are reported to the rule but kept.
    #[test]
    fn replacement_count_matches_exact_values(
        choices in proptest::collection::vec(0u8..6, 0..24),
    ) {
        let items: Vec<String> =
            choices.iter().map(|c| format!("\"{}\"", value_for(*c))).collect();
        let fixture = SolutionFixture::new("fleet")
            .manifest_json(&json_manifest("fleet"))
            .file("items.json", format!("[{}]", items.join(", ")))
            .build();
        let mut contents = SolutionDirectoryContents::load(fixture.root()).unwrap();

        let report = convert(&mut contents, IsolationDirection::Native).unwrap();

        let exact = choices.iter().filter(|c| **c < 2).count();
        prop_assert_eq!(report.file_replacements, exact);
        prop_assert_eq!(contents.file("items.json").unwrap().is_modified(), exact > 0);
    }
}
