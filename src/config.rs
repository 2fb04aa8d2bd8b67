use crate::auth::DEFAULT_LOGIN_DELAY;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub db_path: PathBuf,
    pub login_delay: Duration,
}

impl Config {
    /// Reads `NOVA_WEBHOOK_URL` (required), `NOVA_DB_PATH` and
    /// `NOVA_LOGIN_DELAY_MS` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let webhook_url = lookup("NOVA_WEBHOOK_URL")
            .filter(|s| !s.trim().is_empty())
            .context("NOVA_WEBHOOK_URL not set")?;

        // We use ~/.nova/nova_chat.db unless told otherwise
        let db_path = match lookup("NOVA_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => {
                let home_dir = lookup("HOME").unwrap_or_else(|| ".".into());
                PathBuf::from(home_dir).join(".nova").join("nova_chat.db")
            }
        };

        let login_delay = match lookup("NOVA_LOGIN_DELAY_MS") {
            Some(ms) => Duration::from_millis(
                ms.trim()
                    .parse()
                    .with_context(|| format!("Invalid NOVA_LOGIN_DELAY_MS: {}", ms))?,
            ),
            None => DEFAULT_LOGIN_DELAY,
        };

        Ok(Self {
            webhook_url,
            db_path,
            login_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn webhook_url_is_required() {
        assert!(Config::from_lookup(lookup(&[("HOME", "/tmp")])).is_err());
        assert!(Config::from_lookup(lookup(&[("NOVA_WEBHOOK_URL", " ")])).is_err());
    }

    #[test]
    fn defaults_under_home() {
        let config = Config::from_lookup(lookup(&[
            ("NOVA_WEBHOOK_URL", "http://localhost:5678/webhook/chat"),
            ("HOME", "/home/nova"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/home/nova/.nova/nova_chat.db"));
        assert_eq!(config.login_delay, DEFAULT_LOGIN_DELAY);
    }

    #[test]
    fn overrides_are_honoured() {
        let config = Config::from_lookup(lookup(&[
            ("NOVA_WEBHOOK_URL", "http://hook"),
            ("NOVA_DB_PATH", "/data/chat.db"),
            ("NOVA_LOGIN_DELAY_MS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/chat.db"));
        assert_eq!(config.login_delay, Duration::ZERO);

        assert!(Config::from_lookup(lookup(&[
            ("NOVA_WEBHOOK_URL", "http://hook"),
            ("NOVA_LOGIN_DELAY_MS", "soon"),
        ]))
        .is_err());
    }
}
