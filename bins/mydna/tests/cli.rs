use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BOOK: &str = r#"{
  "profiles": [
    {
      "name": "Rex",
      "intolerances": [
        {"item": "Corn", "category": "Grain", "level": 3},
        {"item": "Soy", "category": "Legume", "level": 1}
      ]
    },
    {
      "name": "Max",
      "intolerances": [
        {"item": "soy", "category": "Legume", "level": 2},
        {"item": "Rice", "category": "Grain", "level": 2}
      ]
    }
  ]
}"#;

fn mydna(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mydna").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("MYDNA_CONFIG")
        .env_remove("MYDNA_PROFILES");
    cmd
}

fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let book = dir.path().join("book.json");
    fs::write(&book, BOOK).unwrap();
    (dir, book)
}

#[test]
fn test_clean_argument() {
    let dir = tempfile::tempdir().unwrap();
    mydna(dir.path())
        .args(["clean", "WHEAT\n\nCORN syrup, (SOY) lecithin!!"])
        .assert()
        .success()
        .stdout("wheat, corn syrup, (soy) lecithin\n");
}

#[test]
fn test_clean_steps() {
    let dir = tempfile::tempdir().unwrap();
    mydna(dir.path())
        .args(["clean", "--steps", "SALT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. lowercase: salt"))
        .stdout(predicate::str::contains("8. final_trim: salt"));
}

#[test]
fn test_tokenize_stdin() {
    let dir = tempfile::tempdir().unwrap();
    mydna(dir.path())
        .arg("tokenize")
        .write_stdin("wheat, corn syrup, (soy) lecithin")
        .assert()
        .success()
        .stdout("wheat\ncorn syrup\nsoy\nlecithin\n");
}

#[test]
fn test_tokenize_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = mydna(dir.path())
        .args(["--format", "json", "tokenize", "Corn syrup, salt"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tokens: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tokens, vec!["corn syrup", "salt"]);
}

#[test]
fn test_parse_drops_stop_words() {
    let dir = tempfile::tempdir().unwrap();
    mydna(dir.path())
        .args(["parse", "Sugar, the, salt; corn syrup (GMO)"])
        .assert()
        .success()
        .stdout("sugar\nsalt\ncorn syrup\ngmo\n");
}

#[test]
fn test_parse_uses_configured_stop_words() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".mydna.toml"),
        "[normalizer]\nstop_words = [\"salt\"]\n",
    )
    .unwrap();

    mydna(dir.path())
        .args(["parse", "Sugar, the, salt"])
        .assert()
        .success()
        .stdout("sugar\nthe\n");
}

#[test]
fn test_extract_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("doc.txt");
    fs::write(&doc, "Wheat Flour and SALT").unwrap();

    mydna(dir.path())
        .args(["extract", "--file"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wheat Flour"))
        .stdout(predicate::str::contains("SALT"));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    mydna(dir.path())
        .args(["clean", "--file", "nope.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_scan_flags_with_levels() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["scan", "--profile", "Rex", "--profiles"])
        .arg(&book)
        .arg("Corn, salt, soy")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 2 intolerances (3 scanned)"))
        .stdout(predicate::str::contains("corn (Level 3)"))
        .stdout(predicate::str::contains("soy (Level 1)"));
}

#[test]
fn test_scan_clear() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["scan", "--profile", "Max", "--profiles"])
        .arg(&book)
        .arg("wheat, salt")
        .assert()
        .success()
        .stdout(predicate::str::contains("No intolerances found (2 scanned)"));
}

#[test]
fn test_scan_every_profile() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["scan", "--profiles"])
        .arg(&book)
        .arg("Corn, salt")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Rex: 1 match (corn)"))
        .stdout(predicate::str::contains("Max: clear"))
        .stdout(predicate::str::contains("1 profile flagged: Rex"));
}

#[test]
fn test_scan_overflow_message() {
    let (dir, book) = workspace();
    let letters: Vec<char> = ('a'..='z').collect();
    let text: Vec<String> = (0..60)
        .map(|i| format!("item{}{}", letters[i / 26], letters[i % 26]))
        .collect();

    mydna(dir.path())
        .args(["scan", "--profile", "Rex", "--profiles"])
        .arg(&book)
        .arg(text.join(", "))
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing first 50 results (60 total found)"));
}

#[test]
fn test_scan_unknown_profile() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["scan", "--profile", "Ghost", "--profiles"])
        .arg(&book)
        .arg("corn")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown profile: Ghost"));
}

#[test]
fn test_containment_test() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["test", "--profile", "Rex", "--profiles"])
        .arg(&book)
        .arg("Organic Corn Syrup, salt")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Flagged 1 of 2 ingredients"))
        .stdout(predicate::str::contains("organic corn syrup (contains corn)"));
}

#[test]
fn test_containment_requires_profile() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["test", "--profiles"])
        .arg(&book)
        .arg("corn")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No profile selected"));
}

#[test]
fn test_diet_json() {
    let (dir, book) = workspace();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, r#"{"diet": {"ingredients": ["Chicken", "Soy Sauce"]}}"#).unwrap();

    mydna(dir.path())
        .args(["diet", "--profile", "Max", "--profiles"])
        .arg(&book)
        .arg("--file")
        .arg(&plan)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("soy sauce (contains soy)"));
}

#[test]
fn test_diet_json_without_ingredients() {
    let (dir, book) = workspace();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, r#"{"calories": 2000}"#).unwrap();

    mydna(dir.path())
        .args(["diet", "--profile", "Max", "--profiles"])
        .arg(&book)
        .arg("--file")
        .arg(&plan)
        .assert()
        .code(2);
}

#[test]
fn test_compare_profiles() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["compare", "--profiles"])
        .arg(&book)
        .assert()
        .success()
        .stdout(
            "Shared by all profiles (1):\n  - Soy\nUnique to Rex (1):\n  - Corn\nUnique to Max (1):\n  - Rice\n",
        );
}

#[test]
fn test_compare_json() {
    let (dir, book) = workspace();
    let output = mydna(dir.path())
        .args(["--format", "json", "compare", "--profile", "Max", "--profiles"])
        .arg(&book)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["shared"], serde_json::json!(["Soy"]));
    assert_eq!(value["unique"], serde_json::json!(["Rice"]));
}

#[test]
fn test_compare_uses_default_profile() {
    let (dir, _book) = workspace();
    fs::write(
        dir.path().join(".mydna.toml"),
        "[general]\nprofiles_path = \"book.json\"\ndefault_profile = \"Max\"\n",
    )
    .unwrap();

    mydna(dir.path())
        .arg("compare")
        .assert()
        .success()
        .stdout("Shared by all profiles (1):\n  - Soy\nUnique to Max (1):\n  - Rice\n");
}

#[test]
fn test_profile_import_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("upload.json");
    fs::write(
        &upload,
        r#"{"intolerances": [
            {"item": "Lamb", "category": "Protein", "level": 2},
            {"item": "Beef", "category": "Protein", "level": 9}
        ]}"#,
    )
    .unwrap();

    mydna(dir.path())
        .args(["profile", "import", "--name", "Bella"])
        .arg(&upload)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported 1 intolerance into Bella, skipped 1 invalid",
        ));

    assert!(dir.path().join("profiles.json").exists());

    mydna(dir.path())
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bella (1 intolerance)"));

    mydna(dir.path())
        .args(["profile", "import", "--name", "Bella"])
        .arg(&upload)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Profile already exists: Bella"));
}

#[test]
fn test_profile_import_rejects_bad_upload() {
    let dir = tempfile::tempdir().unwrap();
    let upload = dir.path().join("upload.json");
    fs::write(&upload, r#"{"items": ["corn"]}"#).unwrap();

    mydna(dir.path())
        .args(["profile", "import", "--name", "Bella"])
        .arg(&upload)
        .assert()
        .code(2);
    assert!(!dir.path().join("profiles.json").exists());
}

#[test]
fn test_profile_merge() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["profile", "--profiles"])
        .arg(&book)
        .args(["merge", "Max", "Rex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged Max into Rex (1 intolerance added)"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&book).unwrap()).unwrap();
    let profiles = saved["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["merged_from"], "Max");
    assert_eq!(profiles[0]["intolerances"].as_array().unwrap().len(), 3);
}

#[test]
fn test_profile_merge_into_itself() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["profile", "--profiles"])
        .arg(&book)
        .args(["merge", "Rex", "Rex"])
        .assert()
        .code(4);
}

#[test]
fn test_profile_stats_and_search() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["profile", "--profiles"])
        .arg(&book)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profiles: 2"))
        .stdout(predicate::str::contains("Intolerances: 4"));

    mydna(dir.path())
        .args(["profile", "--profiles"])
        .arg(&book)
        .args(["search", "rice"])
        .assert()
        .success()
        .stdout("Max (contains Rice)\n");
}

#[test]
fn test_profile_rename_and_validate() {
    let (dir, book) = workspace();
    mydna(dir.path())
        .args(["profile", "--profiles"])
        .arg(&book)
        .args(["rename", "Rex", "Rexy"])
        .assert()
        .success();

    mydna(dir.path())
        .args(["--format", "json", "profile", "--profiles"])
        .arg(&book)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"));
}

#[test]
fn test_config_defaults_profile() {
    let (dir, _book) = workspace();
    fs::write(
        dir.path().join(".mydna.toml"),
        "[general]\nprofiles_path = \"book.json\"\ndefault_profile = \"Rex\"\n",
    )
    .unwrap();

    mydna(dir.path())
        .args(["scan", "corn"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("corn (Level 3)"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    mydna(dir.path())
        .args(["--config", "missing.toml", "clean", "salt"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}
