use std::{fs, io, path::Path};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::{MAX_QUESTION_AMOUNT, QUESTION_BATCH_SIZE};

const DEFAULT_CONFIG_FILE: &str = "trivia.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub batch_size: u32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            batch_size: QUESTION_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    batch_size: Option<u32>,
}

/// Loads settings from `explicit` (which must exist) or from `trivia.toml`
/// in the working directory when present, then applies the environment.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => apply_file_overrides(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_overrides(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.batch_size {
        anyhow::ensure!(
            (1..=MAX_QUESTION_AMOUNT).contains(&v),
            "batch_size must be between 1 and {MAX_QUESTION_AMOUNT}, got {v}"
        );
        settings.batch_size = v;
    }
    Ok(())
}

fn apply_env_overrides(settings: &mut ClientSettings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("TRIVIA_SERVER_URL").filter(|v| !v.trim().is_empty()) {
        settings.server_url = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
