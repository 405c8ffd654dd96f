//! Configuration loading tests against the process environment.

mod test_helpers;

use projectflow::config::{
    BoardConfig, ConfigError, ENV_ACCESS_TOKEN, ENV_API_URL, ENV_LOG, ENV_PROJECT_ID,
};
use rstest::rstest;
use std::path::PathBuf;
use test_helpers::EnvVarGuard;

fn cleared() -> EnvVarGuard {
    EnvVarGuard::set_many(&[
        (ENV_API_URL, None),
        (ENV_ACCESS_TOKEN, None),
        (ENV_PROJECT_ID, None),
        (ENV_LOG, None),
    ])
}

fn write_config(name: &str, body: &str) -> eyre::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("projectflow-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, body)?;
    Ok(path)
}

#[rstest]
fn explicit_file_is_loaded_and_overridden() -> eyre::Result<()> {
    let path = write_config(
        "explicit",
        "project_id = 3\n[api]\nbase_url = \"https://file.test\"\n",
    )?;
    let _env = EnvVarGuard::set_many(&[
        (ENV_API_URL, Some("https://env.test")),
        (ENV_ACCESS_TOKEN, Some("env-token")),
        (ENV_PROJECT_ID, None),
        (ENV_LOG, Some("warn")),
    ]);

    let config = BoardConfig::load(Some(&path))?;
    std::fs::remove_file(&path)?;

    assert_eq!(config.project_id, Some(3));
    assert_eq!(config.api.base_url, "https://env.test");
    assert_eq!(config.api.access_token.as_deref(), Some("env-token"));
    assert_eq!(config.logging.level, "warn");
    let context = config.context()?;
    assert_eq!(context.access_token(), Some("env-token"));
    Ok(())
}

#[rstest]
fn missing_explicit_file_is_an_error() {
    let _env = cleared();
    let result = BoardConfig::load(Some(&PathBuf::from("/nonexistent/projectflow.toml")));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[rstest]
fn invalid_project_override_is_reported() -> eyre::Result<()> {
    let path = write_config("invalid-env", "project_id = 3\n")?;
    let _env = EnvVarGuard::set_many(&[(ENV_PROJECT_ID, Some("zero"))]);

    let result = BoardConfig::load(Some(&path));
    std::fs::remove_file(&path)?;

    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnv { name, ref value }) if name == ENV_PROJECT_ID && value == "zero"
    ));
    Ok(())
}

#[rstest]
fn environment_supplies_project_without_file() -> eyre::Result<()> {
    let _env = EnvVarGuard::set_many(&[
        (ENV_API_URL, None),
        (ENV_ACCESS_TOKEN, None),
        (ENV_PROJECT_ID, Some("12")),
        (ENV_LOG, None),
    ]);
    let path = write_config("empty", "")?;

    let config = BoardConfig::load(Some(&path))?;
    std::fs::remove_file(&path)?;

    assert_eq!(config.context()?.project_id().value(), 12);
    assert_eq!(config.api.base_url, "http://localhost:9090");
    Ok(())
}
