//! End-to-end tests for `labelsheet preview`.

mod fixtures;
use fixtures::*;

#[test]
fn test_preview_draws_sheet() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", VALID_SHEET_TOML);

    let output = env.run(&["preview", sheet.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("#1"));
    assert!(out.contains("12345678"));
    assert!(out.contains("#2"));
    assert!(out.contains("ABC-42"));
    assert!(out.contains("40L - 6 of 65 cells used"));
}

#[test]
fn test_preview_json_matches_geometry() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", VALID_SHEET_TOML);

    let output = env.run(&["preview", sheet.to_str().unwrap(), "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let preview: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Should parse JSON output");
    let cells = preview["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 65);

    let cell6 = &cells[5];
    assert_eq!(cell6["cell"], 6);
    assert_eq!(cell6["rect_mm"]["y"], 31.0);
    assert!(cell6["occupant"].is_null());

    // Projected rect is the mm rect times 0.8 * 3.78
    let scale = 0.8 * 3.78;
    let projected = cell6["rect"]["y"].as_f64().unwrap();
    assert!((projected - 31.0 * scale).abs() < 1e-9);

    let cell10 = &cells[9];
    assert_eq!(cell10["occupant"]["ordinal"], 2);
    assert_eq!(cell10["occupant"]["text"], "ABC-42");
}

#[test]
fn test_preview_honors_configured_zoom() {
    let env = TestEnv::new();
    env.write_config("[preview]\nzoom = 1.0\n");
    let sheet = env.write("sheet.toml", VALID_SHEET_TOML);

    let output = env.run(&["preview", sheet.to_str().unwrap(), "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let preview: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let width = preview["page"]["width"].as_f64().unwrap();
    assert!((width - 210.0 * 3.78).abs() < 1e-9);
}

#[test]
fn test_preview_warns_about_rejected_cells() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", CONFLICTING_SHEET_TOML);

    let output = env.run(&["preview", sheet.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("entry #2"));
}

/// Symbol wide enough to be scaled down by any padding.
const WIDE_SHEET_TOML: &str = r#"
[[entry]]
text = "ABCDEFGHIJKL"
cells = [1]
"#;

fn glyph_width_mm(env: &TestEnv, extra: &[&str]) -> f64 {
    let sheet = env.write("wide.toml", WIDE_SHEET_TOML);
    let mut args = vec!["preview", sheet.to_str().unwrap(), "--json"];
    args.extend_from_slice(extra);

    let output = env.run(&args);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let preview: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let glyph = &preview["cells"][0]["glyph"];
    glyph["width"].as_f64().expect("cell 1 should have a glyph") / (0.8 * 3.78)
}

#[test]
fn test_preview_uses_configured_padding() {
    let env = TestEnv::new();
    let default_width = glyph_width_mm(&env, &[]);
    assert!((default_width - (37.0 - 4.0)).abs() < 1e-6);

    env.write_config("[export]\npadding_mm = 6.0\n");
    let padded_width = glyph_width_mm(&env, &[]);
    assert!((padded_width - (37.0 - 12.0)).abs() < 1e-6);

    let flag_width = glyph_width_mm(&env, &["--padding", "3"]);
    assert!((flag_width - (37.0 - 6.0)).abs() < 1e-6);
}

#[test]
fn test_preview_rejects_bad_padding() {
    let env = TestEnv::new();
    let sheet = env.write("sheet.toml", VALID_SHEET_TOML);

    let output = env.run(&["preview", sheet.to_str().unwrap(), "--padding", "15"]);
    assert_eq!(output.status.code(), Some(1));
}
