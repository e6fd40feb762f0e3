use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn data_lake(cwd: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_data_lake"))
        .args(args)
        .current_dir(cwd)
        .env_remove("DATA_LAKE_ROOT")
        .output()?)
}

#[test]
fn unreadable_config_is_reported_as_a_pipeline_error() -> Result<()> {
    let tmp = TempDir::new()?;
    let missing = tmp.path().join("absent.toml");

    let out = data_lake(tmp.path(), &["--config", missing.to_str().unwrap(), "run"])?;
    assert!(!out.status.success());
    let stdout = String::from_utf8(out.stdout)?;
    assert!(
        stdout.contains("Error in pipeline: Configuration error: Failed to read config file"),
        "stdout was: {stdout}"
    );
    Ok(())
}

#[test]
fn malformed_default_config_is_reported_as_a_pipeline_error() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(tmp.path().join("config.toml"), "[paths\nproject_root = 1")?;

    let out = data_lake(tmp.path(), &["run"])?;
    assert!(!out.status.success());
    let stdout = String::from_utf8(out.stdout)?;
    assert!(
        stdout.contains("Error in pipeline: TOML deserialization failed"),
        "stdout was: {stdout}"
    );
    Ok(())
}

#[test]
fn run_command_processes_the_data_directory() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::create_dir_all(tmp.path().join("data"))?;
    fs::write(
        tmp.path().join("data/sample.csv"),
        "PassengerId,Survived,Pclass,Sex,Age,SibSp,Parch,Fare,Embarked\n1,0,3,male,22,1,0,7.25,S\n2,1,1,female,38,1,0,71.2833,C\n",
    )?;

    let out = data_lake(tmp.path(), &["--root", tmp.path().to_str().unwrap(), "run"])?;
    let stdout = String::from_utf8(out.stdout)?;
    assert!(out.status.success(), "stdout was: {stdout}");
    assert!(stdout.contains("Data processing pipeline complete."));
    assert!(tmp.path().join("data_lake/transformed/sample.csv").exists());
    Ok(())
}
