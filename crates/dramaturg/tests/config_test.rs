//! Tests for layered configuration loading.

use dramaturg::{DramaturgConfig, GenerationDefaults};
use std::io::Write;

fn write_config(contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_bundled_defaults_match_code_defaults() -> anyhow::Result<()> {
    let config = DramaturgConfig::bundled()?;

    assert_eq!(config, DramaturgConfig::default());
    assert_eq!(config.model().model(), "gpt-4o-mini");
    assert_eq!(*config.generation(), GenerationDefaults::default());
    assert_eq!(*config.cache().ttl_secs(), 1800);
    Ok(())
}

#[test]
fn test_file_overrides_only_named_keys() -> anyhow::Result<()> {
    let file = write_config(
        r#"
[generation]
story_type = "revenge"
episode_count = 8

[segmentation]
soft_ceiling = 1.25
"#,
    )?;

    let config = DramaturgConfig::from_file(file.path())?;

    assert_eq!(config.generation().story_type(), "revenge");
    assert_eq!(*config.generation().episode_count(), Some(8));
    assert_eq!(*config.generation().duration_per_episode(), 60);
    assert_eq!(*config.segmentation().soft_ceiling(), 1.25);
    assert_eq!(*config.segmentation().soft_floor(), 0.8);
    assert_eq!(config.model().endpoint(), DramaturgConfig::default().model().endpoint());
    Ok(())
}

#[test]
fn test_inverted_band_is_rejected() -> anyhow::Result<()> {
    let file = write_config(
        r#"
[segmentation]
hard_floor = 1.5
hard_ceiling = 1.1
"#,
    )?;

    let err = DramaturgConfig::from_file(file.path()).expect_err("inverted band");
    assert!(err.to_string().contains("[segmentation]"));
    Ok(())
}

#[test]
fn test_zero_episode_duration_is_rejected() -> anyhow::Result<()> {
    let file = write_config("[generation]\nduration_per_episode = 0\n")?;

    let err = DramaturgConfig::from_file(file.path()).expect_err("zero duration");
    assert!(err.to_string().contains("duration_per_episode"));
    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(DramaturgConfig::from_file("/nonexistent/dramaturg.toml").is_err());
}

#[test]
fn test_adapter_settings_follow_config() -> anyhow::Result<()> {
    let file = write_config(
        r#"
[model]
temperature = 0.3
max_tokens = 2048

[duration]
chars_per_second = 5.0
"#,
    )?;

    let config = DramaturgConfig::from_file(file.path())?;
    let settings = config.adapter_settings();

    assert_eq!(*settings.temperature(), Some(0.3));
    assert_eq!(*settings.max_tokens(), Some(2048));
    assert_eq!(*settings.duration().chars_per_second(), 5.0);
    assert_eq!(settings.segmentation(), config.segmentation());
    assert_eq!(*settings.api_key(), None);
    Ok(())
}
