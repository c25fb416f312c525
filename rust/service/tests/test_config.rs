use std::fs;

use pokerroom_engine::rules::BlindLevel;
use pokerroom_service::config::{
    ANALYTICS_VAR, BOT_DELAY_VAR, BOT_STRATEGY_VAR, CONFIG_PATH_VAR, STARTING_STACK_VAR, load_with_sources,
};
use pokerroom_service::{ConfigError, ServiceConfig, ValueSource};
use serial_test::serial;

fn clear_env() {
    for var in [CONFIG_PATH_VAR, STARTING_STACK_VAR, BOT_DELAY_VAR, BOT_STRATEGY_VAR, ANALYTICS_VAR] {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

fn set(var: &str, value: impl AsRef<std::ffi::OsStr>) {
    unsafe {
        std::env::set_var(var, value);
    }
}

#[test]
#[serial]
fn defaults_when_nothing_is_set() {
    clear_env();
    let resolved = load_with_sources().unwrap();
    assert_eq!(resolved.config, ServiceConfig::default());
    assert_eq!(resolved.sources.starting_stack, ValueSource::Default);
    assert_eq!(resolved.sources.blind_schedule, ValueSource::Default);
}

#[test]
#[serial]
fn environment_overrides_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pokerroom.toml");
    fs::write(
        &path,
        r#"
starting_stack = 2000
bot_delay_ms = 100
analytics = false

[[blind_schedule]]
small = 10
big = 20

[[blind_schedule]]
small = 20
big = 40
"#,
    )
    .unwrap();
    set(CONFIG_PATH_VAR, &path);
    set(BOT_DELAY_VAR, "5");

    let resolved = load_with_sources().unwrap();
    clear_env();

    assert_eq!(resolved.config.starting_stack, 2000);
    assert_eq!(resolved.sources.starting_stack, ValueSource::File);
    assert_eq!(resolved.config.bot_delay_ms, 5);
    assert_eq!(resolved.sources.bot_delay_ms, ValueSource::Env);
    assert!(!resolved.config.analytics);
    assert_eq!(
        resolved.config.blind_schedule,
        vec![BlindLevel::new(10, 20), BlindLevel::new(20, 40)]
    );
    assert_eq!(resolved.sources.bot_strategy, ValueSource::Default);
}

#[test]
#[serial]
fn bad_values_are_rejected() {
    clear_env();
    set(STARTING_STACK_VAR, "lots");
    assert!(matches!(load_with_sources(), Err(ConfigError::Invalid(_))));

    clear_env();
    set(BOT_STRATEGY_VAR, "gto");
    assert!(matches!(load_with_sources(), Err(ConfigError::Invalid(_))));

    clear_env();
    set(ANALYTICS_VAR, "maybe");
    assert!(matches!(load_with_sources(), Err(ConfigError::Invalid(_))));
    clear_env();
}

#[test]
#[serial]
fn unreadable_or_malformed_files_are_rejected() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();

    set(CONFIG_PATH_VAR, dir.path().join("missing.toml"));
    assert!(matches!(load_with_sources(), Err(ConfigError::Io(_))));

    let path = dir.path().join("broken.toml");
    fs::write(&path, "starting_stack = \"many\"").unwrap();
    set(CONFIG_PATH_VAR, &path);
    assert!(matches!(load_with_sources(), Err(ConfigError::Parse(_))));

    let path = dir.path().join("descending.toml");
    fs::write(
        &path,
        "[[blind_schedule]]\nsmall = 100\nbig = 200\n[[blind_schedule]]\nsmall = 50\nbig = 100\n",
    )
    .unwrap();
    set(CONFIG_PATH_VAR, &path);
    assert!(matches!(load_with_sources(), Err(ConfigError::Invalid(_))));
    clear_env();
}
