use anyhow::{Context, Result};
use ntrip_duo_core::Configuration;
use reqwest::Url;
use std::{env, path::PathBuf, sync::OnceLock};

/// Console shell configuration, read from the environment at startup
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Where the device serves its control API
    pub device_url: Url,

    /// JSON map of field edits applied and submitted once the configuration is loaded
    pub apply: Option<PathBuf>,

    /// Run one WiFi scan once the configuration is loaded
    pub scan: bool,
}

impl ShellConfig {
    /// Get or load the shell configuration
    ///
    /// # Panics
    /// Panics if the environment holds invalid values. The shell cannot talk
    /// to the device without a usable base URL.
    pub fn get() -> &'static Self {
        static SHELL_CONFIG: OnceLock<ShellConfig> = OnceLock::new();
        SHELL_CONFIG
            .get_or_init(|| Self::from_env().expect("failed to load shell configuration"))
    }

    pub fn from_env() -> Result<Self> {
        let device_url = env::var("NTRIP_DUO_URL")
            .unwrap_or_else(|_| "http://192.168.4.1".to_string());
        let device_url = Url::parse(&device_url)
            .with_context(|| format!("failed to parse NTRIP_DUO_URL: {device_url}"))?;
        anyhow::ensure!(
            !device_url.cannot_be_a_base(),
            "failed since NTRIP_DUO_URL is not a base url: {device_url}"
        );

        let apply = env::var_os("NTRIP_DUO_APPLY").map(PathBuf::from);

        let scan = match env::var("NTRIP_DUO_SCAN") {
            Ok(value) => parse_flag(&value)
                .with_context(|| format!("failed to parse NTRIP_DUO_SCAN: {value}"))?,
            Err(_) => false,
        };

        Ok(Self {
            device_url,
            apply,
            scan,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Read the field edits to apply from `path`.
pub async fn load_edits(path: &std::path::Path) -> Result<Configuration> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&content)
        .with_context(|| format!("failed to parse field edits in {}", path.display()))
}
