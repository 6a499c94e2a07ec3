use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "admin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Defaults, then the config file (if readable), then environment.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Keys a config file may set. Absent keys keep the current value.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed config file");
            return;
        }
    };

    if let Some(api_base_url) = file_cfg.api_base_url {
        settings.api_base_url = api_base_url;
    }
    if let Some(secs) = file_cfg.request_timeout_secs.filter(|secs| *secs > 0) {
        settings.request_timeout_secs = secs;
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

pub fn normalize_base_url(raw_base_url: &str) -> anyhow::Result<String> {
    let raw_base_url = raw_base_url.trim();
    if raw_base_url.is_empty() {
        return Ok(Settings::default().api_base_url);
    }

    let candidate = if raw_base_url.contains("://") {
        raw_base_url.to_string()
    } else {
        format!("http://{raw_base_url}")
    };

    let parsed =
        Url::parse(&candidate).with_context(|| format!("invalid api base url '{raw_base_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("unsupported scheme '{}' in api base url", parsed.scheme());
    }

    Ok(candidate.trim_end_matches('/').to_string())
}
