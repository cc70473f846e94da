//! End-to-end tests for `labelsheet check`.

mod fixtures;
use fixtures::*;

#[test]
fn test_check_valid_sheet() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", VALID_SHEET_TOML);

    let output = env.run(&["check", sheet.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Sheet is valid"));
    assert!(out.contains("Cells used: 6"));
}

#[test]
fn test_check_reports_conflict_and_range() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", CONFLICTING_SHEET_TOML);

    let output = env.run(&["check", sheet.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("entry #2"));
    assert!(out.contains("cells already taken by another entry: 5"));
    assert!(out.contains("entry #3"));
    assert!(out.contains("cell 66 is outside the sheet"));
}

#[test]
fn test_check_json() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", CONFLICTING_SHEET_TOML);

    let output = env.run(&["check", sheet.to_str().unwrap(), "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let result: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Should parse JSON output");
    assert_eq!(result["valid"], false);
    assert_eq!(result["layout"], "40L");
    assert_eq!(result["total_cells"], 65);
    assert_eq!(result["stats"]["entries"], 3);

    let problems = result["problems"].as_array().unwrap();
    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0]["ordinal"], 2);
    assert_eq!(problems[0]["cells"], serde_json::json!([5]));
    assert_eq!(problems[1]["cells"], serde_json::json!([66]));
}

#[test]
fn test_check_layout_override() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", VALID_SHEET_TOML);

    let output = env.run(&["check", sheet.to_str().unwrap(), "--layout", "65l", "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["layout"], "65L");
}

#[test]
fn test_check_unknown_layout() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", "layout = \"24L\"\n");

    let output = env.run(&["check", sheet.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown layout"));
}

#[test]
fn test_check_malformed_files() {
    let env = TestEnv::new();

    let bad_toml = env.write("bad.toml", "[[entry]\ntext = ");
    assert_eq!(env.run(&["check", bad_toml.to_str().unwrap()]).status.code(), Some(1));

    let bad_cells = env.write("cells.toml", "[[entry]]\ntext = \"A\"\ncells = \"3-1\"\n");
    let output = env.run(&["check", bad_cells.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid cell list"));

    let wrong_ext = env.write("sheet.yaml", "layout: 40L\n");
    assert_eq!(env.run(&["check", wrong_ext.to_str().unwrap()]).status.code(), Some(1));
}

#[test]
fn test_check_missing_file() {
    let env = TestEnv::new();
    let output = env.run(&["check", "nope.json"]);
    assert_eq!(output.status.code(), Some(2));
}
