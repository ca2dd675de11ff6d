#![cfg(unix)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;

use assert_cmd::cargo;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

use common::{Sandbox, COMPASS_OK, COMPASS_SYNTAX_ERROR};

fn cli(sandbox: &Sandbox) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("compass-invoke"));
    cmd.env("PATH", &sandbox.bin).current_dir(&sandbox.project);
    cmd
}

#[test]
fn schema_when_run_then_prints_option_fields() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    cli(&sandbox)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"import_path\"").and(predicate::str::contains("\"bundle_exec\"")));
    Ok(())
}

#[test]
fn args_when_flags_given_then_prints_command_line() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    let compass = sandbox.install("compass", COMPASS_OK);

    let output = cli(&sandbox)
        .args(["args", "sass/app.scss", "--style", "compact", "-I", "a", "-I", "b", "--json"])
        .output()?;
    assert!(output.status.success());

    let line: Vec<String> = serde_json::from_slice(&output.stdout)?;
    let project = sandbox.project_str();
    assert_eq!(line.first().map(String::as_str), Some(&*compass.to_string_lossy()));
    assert_eq!(line.get(1..4).unwrap(), ["compile", project.as_str(), "sass/app.scss"]);
    assert!(line.windows(2).any(|w| w == ["--output-style", "compact"]));
    let imports: Vec<&str> = line
        .windows(2)
        .filter(|w| w.first().map(String::as_str) == Some("-I"))
        .filter_map(|w| w.get(1).map(String::as_str))
        .collect();
    assert_eq!(imports, vec!["a", "b"]);
    Ok(())
}

#[test]
fn args_when_options_file_present_then_uses_it() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox.install("compass", COMPASS_OK);
    std::fs::write(
        sandbox.project.join("compass-options.json"),
        r#"{ "config_file": "config/compass.rb" }"#,
    )?;

    cli(&sandbox)
        .args(["args", "sass/app.scss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-c config/compass.rb"))
        .stdout(predicate::str::contains("--css-dir").not());
    Ok(())
}

#[test]
fn compile_when_compass_missing_then_exits_127() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    cli(&sandbox)
        .args(["compile", "sass/app.scss"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("not found: compass"));
    Ok(())
}

#[test]
fn compile_when_json_then_prints_result() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox.install("compass", COMPASS_OK);

    let output = cli(&sandbox)
        .args(["compile", "sass/app.scss", "--quiet", "--json"])
        .output()?;
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result["exit_code"], 0);
    assert_eq!(result["stdout"], "");
    let expected = sandbox.project.join("css/app.scss");
    assert_eq!(result["output_path"], &*expected.to_string_lossy());
    Ok(())
}

#[test]
fn compile_when_json_with_logging_then_stdout_is_only_json() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox.install("compass", COMPASS_OK);

    let output = cli(&sandbox).args(["compile", "sass/app.scss", "--json"]).output()?;
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(result["exit_code"], 0);
    let captured = result["stdout"].as_str().unwrap();
    assert!(captured.contains("overwrite css/app.css"));
    Ok(())
}

#[test]
fn compile_when_compass_fails_then_exit_code_is_forwarded() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    sandbox.install("compass", COMPASS_SYNTAX_ERROR);
    cli(&sandbox)
        .args(["compile", "sass/app.scss"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid CSS"));
    Ok(())
}

#[test]
fn compile_when_style_unknown_then_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let sandbox = Sandbox::new();
    cli(&sandbox)
        .args(["compile", "sass/app.scss", "--style", "minified"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output style"));
    Ok(())
}
