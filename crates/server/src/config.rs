use std::fs;

use chrono::Duration;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub trivia_api_base_url: String,
    pub token_ttl_hours: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            trivia_api_base_url: "https://opentdb.com".into(),
            token_ttl_hours: 3,
        }
    }
}

impl Settings {
    /// Upstream session token lifetime; the default when `token_ttl_hours`
    /// is out of range.
    pub fn token_ttl(&self) -> Duration {
        ttl_from_hours(self.token_ttl_hours)
            .or_else(|| ttl_from_hours(Settings::default().token_ttl_hours))
            .unwrap_or_else(Duration::zero)
    }
}

fn ttl_from_hours(hours: i64) -> Option<Duration> {
    if hours <= 0 {
        return None;
    }
    Duration::try_hours(hours)
}

fn set_token_ttl_hours(settings: &mut Settings, hours: i64, source: &str) {
    if ttl_from_hours(hours).is_some() {
        settings.token_ttl_hours = hours;
    } else {
        warn!(hours, source, "ignoring out-of-range token ttl");
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<toml::Table>(raw) {
        Ok(table) => table,
        Err(error) => {
            warn!(%error, "ignoring unparsable server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("trivia_api_base_url")
        .and_then(toml::Value::as_str)
    {
        settings.trivia_api_base_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("token_ttl_hours")
        .and_then(toml::Value::as_integer)
    {
        set_token_ttl_hours(settings, v, "server.toml");
    }
}

fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = var("TRIVIA_API_BASE_URL") {
        settings.trivia_api_base_url = v;
    }
    if let Some(v) = var("APP__TRIVIA_API_BASE_URL") {
        settings.trivia_api_base_url = v;
    }

    if let Some(v) = var("APP__TOKEN_TTL_HOURS") {
        match v.parse::<i64>() {
            Ok(parsed) => set_token_ttl_hours(settings, parsed, "APP__TOKEN_TTL_HOURS"),
            Err(error) => warn!(%error, value = %v, "ignoring invalid APP__TOKEN_TTL_HOURS"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
