use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use incomelens_finance::EngineConfig;

use crate::state::{ensure_incomelens_home, incomelens_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportSection,
    pub logging: LoggingSection,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// IANA zone used to resolve "today" when `--as-of` is omitted
    pub timezone: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub fn config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(incomelens_home()?.join("config.toml")),
    }
}

pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let p = config_path(override_path)?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(override_path: Option<&Path>) -> Result<()> {
    let p = match override_path {
        Some(p) => p.to_path_buf(),
        None => ensure_incomelens_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote default config: {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("[report]"));
        assert!(text.contains("[engine.rules]"));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.engine, cfg.engine);
        assert_eq!(parsed.report.timezone, "America/Chicago");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[logging]
level = "debug"

[engine.grouping]
key_prefix_len = 24
"#,
        )
        .unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.engine.grouping.key_prefix_len, 24);
        assert!(cfg.engine.grouping.strip_reference_numbers);
        assert_eq!(cfg.engine.windows.projected_months, 3);
        assert_eq!(cfg.report.timezone, "America/Chicago");
    }

    #[test]
    fn test_missing_override_file_gives_defaults() {
        let path = std::env::temp_dir().join("incomelens-missing-config-test.toml");
        let _ = std::fs::remove_file(&path);
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.logging.level, "warn");
    }
}
