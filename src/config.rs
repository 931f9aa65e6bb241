// src/config.rs

//! Manages server configuration: loading, defaults, and validation.

use crate::core::adapter::VideoFormat;
use crate::core::catalog::ClipSpec;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;
use std::time::Duration;

/// Identity reported by `device info` and the connection banner.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeviceConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_unique_id")]
    pub unique_id: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    /// The video format label, e.g. `720p50` or `1080i5994`.
    #[serde(default = "default_video_format")]
    pub video_format: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            unique_id: default_unique_id(),
            protocol_version: default_protocol_version(),
            video_format: default_video_format(),
        }
    }
}

fn default_model() -> String {
    "CasparCG".to_string()
}
fn default_unique_id() -> String {
    "1234".to_string()
}
fn default_protocol_version() -> String {
    "1.8".to_string()
}
fn default_video_format() -> String {
    "720p50".to_string()
}

/// Where the catalog is read from on every refresh cycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogSourceKind {
    /// The `clips` list of this file.
    #[default]
    Static,
    /// A JSON manifest file, re-read on every refresh.
    Manifest,
}

/// Settings for the catalog and its periodic refresh.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_refresh_interval", with = "humantime_serde")]
    pub refresh_interval: Duration,
    #[serde(default)]
    pub source: CatalogSourceKind,
    #[serde(default)]
    pub manifest_path: Option<String>,
    #[serde(default)]
    pub clips: Vec<ClipSpec>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            source: CatalogSourceKind::default(),
            manifest_path: None,
            clips: vec![],
        }
    }
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(30)
}

/// Settings for the built-in simulated playout engine.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EngineConfig {
    /// When false, navigation is accepted but nothing is loaded into the engine.
    #[serde(default = "default_load_enabled")]
    pub load_enabled: bool,
    /// Channel frame rate reported through telemetry at startup.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// How often the simulated engine reports its playback position.
    #[serde(default = "default_tick_interval", with = "humantime_serde")]
    pub tick_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            load_enabled: default_load_enabled(),
            frame_rate: default_frame_rate(),
            tick_interval: default_tick_interval(),
        }
    }
}

fn default_load_enabled() -> bool {
    true
}
fn default_frame_rate() -> f64 {
    50.0
}
fn default_tick_interval() -> Duration {
    Duration::from_millis(200)
}

/// The resolved server configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9993
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_clients() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: default_max_clients(),
            device: DeviceConfig::default(),
            catalog: CatalogConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid configuration in '{path}'"))
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// The configured video format, parsed.
    pub fn video_format(&self) -> Result<VideoFormat> {
        VideoFormat::from_str(&self.device.video_format)
            .map_err(|_| anyhow!("unknown video format '{}'", self.device.video_format))
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.max_clients == 0 {
            return Err(anyhow!("max_clients cannot be 0"));
        }
        self.video_format()?;

        if self.catalog.refresh_interval.is_zero() {
            return Err(anyhow!("catalog.refresh_interval cannot be 0"));
        }
        if self.catalog.source == CatalogSourceKind::Manifest
            && self
                .catalog
                .manifest_path
                .as_deref()
                .is_none_or(|p| p.trim().is_empty())
        {
            return Err(anyhow!(
                "catalog.manifest_path is required when catalog.source is 'manifest'"
            ));
        }
        for (i, clip) in self.catalog.clips.iter().enumerate() {
            if clip.name.trim().is_empty() {
                return Err(anyhow!("catalog clip #{} has an empty name", i + 1));
            }
        }

        if !(self.engine.frame_rate.is_finite() && self.engine.frame_rate > 0.0) {
            return Err(anyhow!("engine.frame_rate must be a positive number"));
        }
        if self.engine.tick_interval.is_zero() {
            return Err(anyhow!("engine.tick_interval cannot be 0"));
        }
        Ok(())
    }
}
