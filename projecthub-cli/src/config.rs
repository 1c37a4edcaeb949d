use anyhow::{Context, Result};
use projecthub_core::time::parse_timezone;
use projecthub_core::{DEFAULT_DEADLINE_WINDOW_DAYS, DEFAULT_TOP_LIMIT, ReminderOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_projecthub_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub reminders: RemindersSection,
    #[serde(default)]
    pub log: LogSection,
}

/// Remote ProjectHub API used as the task store when `base_url` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    /// Sent as `x-auth-token`. `PROJECTHUB_API_TOKEN` overrides it.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Directory of `<project>.json` files (default: ~/.projecthub/projects)
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemindersSection {
    /// IANA zone for due dates in messages
    pub timezone: String,
    pub top_limit: usize,
    pub deadline_window_days: i64,
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            top_limit: DEFAULT_TOP_LIMIT,
            deadline_window_days: DEFAULT_DEADLINE_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn reminder_options(&self) -> Result<ReminderOptions> {
        Ok(ReminderOptions {
            timezone: parse_timezone(&self.reminders.timezone)?,
            top_limit: self.reminders.top_limit,
        })
    }

    pub fn api_token(&self) -> Option<String> {
        std::env::var("PROJECTHUB_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api.token.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_projecthub_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}\n", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);

    if cfg.api.base_url.is_none() {
        println!("\n# No [api].base_url set: --project reads <data_dir>/<project>.json");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[reminders]
timezone = "America/Chicago"
"#,
        )
        .unwrap();
        assert_eq!(cfg.reminders.timezone, "America/Chicago");
        assert_eq!(cfg.reminders.top_limit, DEFAULT_TOP_LIMIT);
        assert_eq!(cfg.log.level, "info");
        assert!(cfg.api.base_url.is_none());
        assert!(cfg.reminder_options().is_ok());
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let mut cfg = Config::default();
        cfg.reminders.timezone = "Mars/Olympus".to_string();
        assert!(cfg.reminder_options().is_err());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.reminders.deadline_window_days, DEFAULT_DEADLINE_WINDOW_DAYS);
    }
}
