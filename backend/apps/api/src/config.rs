//! Server Configuration
//!
//! Everything the binary reads from the environment (after `.env`).

use activation::ActivationConfig;
use anyhow::Context;
use comic::ComicConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_STORE_FLUSH_SECS: u64 = 2;
const DEFAULT_SWEEP_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    /// Persist activations to this JSON file; in-memory when unset
    pub activation_store_path: Option<PathBuf>,
    /// How often pending store writes reach disk
    pub store_flush_interval: Duration,
    /// How often expired device state is purged
    pub sweep_interval: Duration,
    pub activation: ActivationConfig,
    pub comic: ComicConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut activation = if cfg!(debug_assertions) {
            ActivationConfig::development()
        } else {
            ActivationConfig::default()
        };
        if let Some(hours) = var("ACTIVATION_VALIDITY_HOURS") {
            let hours: u64 = hours
                .trim()
                .parse()
                .context("ACTIVATION_VALIDITY_HOURS must be a whole number of hours")?;
            anyhow::ensure!(hours > 0, "ACTIVATION_VALIDITY_HOURS must be positive");
            let secs = hours
                .checked_mul(3600)
                .context("ACTIVATION_VALIDITY_HOURS is too large")?;
            activation.validity_window = Duration::from_secs(secs);
        }
        if let Some(salt) = var("ACTIVATION_CHECKSUM_SALT") {
            activation.checksum_salt = salt;
        }

        let mut comic = ComicConfig::default();
        if let Some(url) = var("SCRIPT_API_URL") {
            comic.script_api_url = url;
        }
        comic.script_api_key = var("SCRIPT_API_KEY");
        if let Some(url) = var("IMAGE_API_URL") {
            comic.image_api_url = url;
        }
        // One key for both APIs is the common case
        comic.image_api_key = var("IMAGE_API_KEY").or_else(|| comic.script_api_key.clone());
        if let Some(model) = var("IMAGE_MODEL") {
            comic.image_model = model;
        }
        if let Some(secs) = var("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?;
            comic.upstream_timeout = Duration::from_secs(secs);
        }

        let store_flush_interval = positive_secs(
            var("ACTIVATION_FLUSH_SECS"),
            DEFAULT_STORE_FLUSH_SECS,
            "ACTIVATION_FLUSH_SECS",
        )?;
        let sweep_interval =
            positive_secs(var("ACTIVATION_SWEEP_SECS"), DEFAULT_SWEEP_SECS, "ACTIVATION_SWEEP_SECS")?;

        Ok(Self {
            bind_addr,
            frontend_origins,
            activation_store_path: var("ACTIVATION_STORE_PATH").map(PathBuf::from),
            store_flush_interval,
            sweep_interval,
            activation,
            comic,
        })
    }
}

fn positive_secs(value: Option<String>, default: u64, name: &str) -> anyhow::Result<Duration> {
    let secs = match value {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a whole number of seconds"))?,
        None => default,
    };
    anyhow::ensure!(secs > 0, "{name} must be positive");
    Ok(Duration::from_secs(secs))
}
