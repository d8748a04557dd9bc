//! Tests for file-based configuration loading.

use bulle_core::{BulleConfig, PromptDialect};
use std::io::Write;

#[test]
fn test_from_file_overrides_bundled_values() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("bulle-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("bulle.toml");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "[gemini]\nmodel = \"gemini-1.5-flash\"\n")?;
    writeln!(file, "[pipeline]\nprompt_dialect = \"single-index\"")?;
    drop(file);

    let config = BulleConfig::from_file(&path)?;
    assert_eq!(config.gemini().model(), "gemini-1.5-flash");
    assert_eq!(config.gemini().api_key_env(), "GOOGLE_API_KEY");
    assert_eq!(*config.pipeline().prompt_dialect(), PromptDialect::SingleIndex);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_from_file_reports_missing_file() {
    let result = BulleConfig::from_file("/nonexistent/bulle/config.toml");
    assert!(result.is_err());
}

#[test]
fn test_defaults_serialize_to_toml() -> anyhow::Result<()> {
    let rendered = toml::to_string(&BulleConfig::default())?;
    let reparsed = BulleConfig::from_toml_str(&rendered)?;
    assert_eq!(reparsed, BulleConfig::default());
    Ok(())
}
