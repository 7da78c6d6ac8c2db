use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

const GRID_CSV: &str = "\
id,Name,Headshot,Country,Field of Study,Interests,Impact
1,Amara Okafor,amara.png (https://img.example.org/amara.png),Nigeria,Physics,Astronomy and hiking,Clean water access
2,Luis Ferreira,,Brazil,Biology,Rainforest ecology,Reforestation
3,Mei Tanaka,mei.jpg (https://img.example.org/mei.jpg),Japan,Physics,Robotics,Disaster early warning
4,Priya Nair,,India,Computer Science,Open source,Digital literacy
";

fn embedscape() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_embedscape"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_ok(cwd: &Path, args: &[&str]) -> Output {
    let out = embedscape()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run embedscape");
    assert!(
        out.status.success(),
        "expected success\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_err(cwd: &Path, args: &[&str]) -> Output {
    let out = embedscape()
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run embedscape");
    assert!(
        !out.status.success(),
        "expected failure\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_ok_json(cwd: &Path, args: &[&str]) -> Value {
    let out = run_ok(cwd, args);
    serde_json::from_slice(&out.stdout).expect("stdout is valid JSON")
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("grid.csv"), GRID_CSV).expect("write grid.csv");
    dir
}

#[test]
fn help_lists_subcommands() {
    let dir = workspace();
    let out = run_ok(dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    for sub in ["serve", "embed", "layout", "criteria"] {
        assert!(stdout.contains(sub), "missing {sub} in help:\n{stdout}");
    }
}

#[test]
fn criteria_json_lists_all_names() {
    let dir = workspace();
    let v = run_ok_json(dir.path(), &["criteria", "--json"]);
    assert_eq!(
        v,
        serde_json::json!(["Country", "Field of Study", "Interests", "Impact"])
    );
}

#[test]
fn embed_json_keeps_record_fields_and_order() {
    let dir = workspace();
    let v = run_ok_json(
        dir.path(),
        &[
            "embed",
            "--data",
            "grid.csv",
            "--criteria",
            "Field of Study",
            "--backend",
            "hash",
            "--dim",
            "8",
            "--json",
        ],
    );
    let rows = v.as_array().expect("array");
    assert_eq!(rows.len(), 4);
    let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
    assert_eq!(rows[1]["Name"], "Luis Ferreira");
    assert_eq!(rows[1]["Field of Study"], "Biology");
    for r in rows {
        assert_eq!(r["embedding"].as_array().unwrap().len(), 8);
    }
    // Same attribute text, same vector.
    assert_eq!(rows[0]["embedding"], rows[2]["embedding"]);
}

#[test]
fn layout_json_positions_stay_within_the_scale() {
    let dir = workspace();
    let v = run_ok_json(
        dir.path(),
        &[
            "layout",
            "--data",
            "grid.csv",
            "--scale",
            "20",
            "--backend",
            "hash",
            "--dim",
            "8",
            "--json",
        ],
    );
    let rows = v.as_array().expect("array");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["image_url"], "https://img.example.org/amara.png");
    assert!(rows[1]["image_url"].is_null());
    for axis in 0..3 {
        let values: Vec<f64> = rows
            .iter()
            .map(|r| r["position"][axis].as_f64().unwrap())
            .collect();
        for x in &values {
            assert!((-10.0 - 1e-4..=10.0 + 1e-4).contains(x), "{x} out of range");
        }
    }
}

#[test]
fn layout_human_output_has_a_row_per_record() {
    let dir = workspace();
    let out = run_ok(
        dir.path(),
        &["layout", "--data", "grid.csv", "--backend", "hash"],
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 5, "{stdout}");
    assert!(stdout.contains("Mei Tanaka"));
}

#[test]
fn unknown_criteria_lists_valid_names() {
    let dir = workspace();
    let out = run_err(
        dir.path(),
        &[
            "embed",
            "--data",
            "grid.csv",
            "--criteria",
            "Hobbies",
            "--backend",
            "hash",
        ],
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid criteria \"Hobbies\""), "{stderr}");
    assert!(stderr.contains("Available criteria"), "{stderr}");
    assert!(stderr.contains("Field of Study"), "{stderr}");
}

#[test]
fn empty_dataset_reports_no_users() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("empty.csv"),
        "id,Name,Headshot,Country,Field of Study,Interests,Impact\n",
    )
    .expect("write empty.csv");
    let out = run_err(
        dir.path(),
        &["layout", "--data", "empty.csv", "--backend", "hash"],
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No users found in CSV."), "{stderr}");
}

#[test]
fn invalid_scale_is_rejected() {
    let dir = workspace();
    let out = run_err(
        dir.path(),
        &[
            "layout", "--data", "grid.csv", "--scale", "0", "--backend", "hash",
        ],
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("scale"), "{stderr}");
}

#[test]
fn missing_api_key_names_the_env_var() {
    let dir = workspace();
    let out = run_err(
        dir.path(),
        &[
            "embed",
            "--data",
            "grid.csv",
            "--backend",
            "openai",
            "--api-key-env",
            "EMBEDSCAPE_E2E_UNSET_KEY",
        ],
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("EMBEDSCAPE_E2E_UNSET_KEY"), "{stderr}");
}

#[test]
fn config_file_sets_backend_and_flags_override_it() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("embedscape.json"),
        r#"{"backend":"hash","dim":4}"#,
    )
    .expect("write config");

    let v = run_ok_json(
        dir.path(),
        &[
            "embed",
            "--data",
            "grid.csv",
            "--config",
            "embedscape.json",
            "--json",
        ],
    );
    assert_eq!(v[0]["embedding"].as_array().unwrap().len(), 4);

    let v = run_ok_json(
        dir.path(),
        &[
            "embed",
            "--data",
            "grid.csv",
            "--config",
            "embedscape.json",
            "--dim",
            "6",
            "--json",
        ],
    );
    assert_eq!(v[0]["embedding"].as_array().unwrap().len(), 6);
}

#[test]
fn serve_rejects_json_flag() {
    let dir = workspace();
    let out = run_err(dir.path(), &["serve", "--backend", "hash", "--json"]);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--json is not supported"), "{stderr}");
}
