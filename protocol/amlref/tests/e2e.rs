use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn amlref(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_amlref"))
        .args(args)
        .current_dir(dir)
        .env_remove("AMLREF_CONFIG")
        .env_remove("AMLREF_WT1_ZERO_POLICY")
        .env_remove("AMLREF_WT1_FLOOR")
        .env_remove("AMLREF_OUTPUT")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn amlref")
}

fn stdout(o: &Output) -> String {
    String::from_utf8_lossy(&o.stdout).into_owned()
}

#[test]
fn e2e_risk_initial_high_wbc() {
    let dir = tempfile::tempdir().unwrap();
    let out = amlref(
        dir.path(),
        &["risk", "--stage", "initial", "--gene", "1", "--wbc", "150"],
    );
    assert!(out.status.success(), "risk failed: {out:?}");
    let text = stdout(&out);
    assert!(text.contains("风险分层: 中危"), "unexpected output: {text}");
}

#[test]
fn e2e_risk_json_reports_finding() {
    let dir = tempfile::tempdir().unwrap();
    let out = amlref(
        dir.path(),
        &[
            "--json",
            "risk",
            "--stage",
            "induction",
            "--gene",
            "NPM1",
            "--mrd",
            "0.2",
        ],
    );
    assert!(out.status.success(), "risk --json failed: {out:?}");
    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(v["level"], "high");
    assert_eq!(v["finding"]["kind"], "inadequate_response");
    assert_eq!(v["finding"]["mrd_breached"], true);
}

#[test]
fn e2e_unknown_gene_exits_with_2() {
    let dir = tempfile::tempdir().unwrap();
    let out = amlref(dir.path(), &["risk", "--gene", "no-such-gene"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error:"));
}

#[test]
fn e2e_wt1_zero_reading_follows_config() {
    let dir = tempfile::tempdir().unwrap();

    let floored = amlref(dir.path(), &["--json", "wt1", "--prev", "10", "--curr", "0"]);
    assert!(floored.status.success());
    let v: serde_json::Value = serde_json::from_str(&stdout(&floored)).unwrap();
    let delta = v["log_reduction"].as_f64().unwrap();
    assert!((delta - 6.0).abs() < 1e-9, "got {delta}");

    fs::write(
        dir.path().join("amlref.toml"),
        "[wt1]\nzero_policy = \"reject\"\n",
    )
    .unwrap();
    let rejected = amlref(dir.path(), &["--json", "wt1", "--prev", "10", "--curr", "0"]);
    assert!(rejected.status.success());
    let v: serde_json::Value = serde_json::from_str(&stdout(&rejected)).unwrap();
    assert!(v["log_reduction"].is_null());
    assert_eq!(v["targets"][0]["verdict"], "pending");
}

#[test]
fn e2e_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let init = amlref(dir.path(), &["config", "init"]);
    assert!(init.status.success(), "config init failed: {init:?}");
    assert!(dir.path().join("amlref.toml").exists());

    let again = amlref(dir.path(), &["config", "init"]);
    assert_eq!(again.status.code(), Some(2));

    let show = amlref(dir.path(), &["config", "show"]);
    assert!(show.status.success());
    assert!(stdout(&show).contains("zero_policy = \"floor\""));
}

#[test]
fn e2e_invalid_config_exits_with_2() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[wt1]\nfloor_percent = -1.0\n").unwrap();
    let out = amlref(dir.path(), &["--config", "bad.toml", "it"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("floor_percent"));
}

#[test]
fn e2e_reference_tables_print() {
    let dir = tempfile::tempdir().unwrap();

    let drugs = amlref(dir.path(), &["drugs", "--search", "gilteritinib"]);
    assert!(drugs.status.success());
    let text = stdout(&drugs);
    assert!(text.contains("吉瑞替尼"));
    assert!(!text.contains("维奈克拉 (Venetoclax)"));

    let it = amlref(dir.path(), &["--json", "it"]);
    assert!(it.status.success());
    let v: serde_json::Value = serde_json::from_str(&stdout(&it)).unwrap();
    assert_eq!(v["dosages"].as_array().map(Vec::len), Some(4));
    assert_eq!(v["cns2_criteria"].as_array().map(Vec::len), Some(3));

    let genetics = amlref(dir.path(), &["genetics", "--manual"]);
    assert!(genetics.status.success());
    assert!(stdout(&genetics).contains("复杂核型 / TP53突变"));
}
