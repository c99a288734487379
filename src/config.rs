// File: ./src/config.rs
// Handles configuration loading and defaults.
use crate::context::AppContext;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_near_distance_km() -> f64 {
    5.0
}
fn default_near_count() -> usize {
    3
}
fn default_sibling_grace_days() -> i64 {
    7
}

fn default_per_domain_limit() -> usize {
    2
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_max_redirects() -> usize {
    5
}
fn default_user_agent() -> String {
    format!("runcal-linkcheck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_parkrun_results_url() -> String {
    "https://www.parkrun.com.de/bahnstadtpromenade/results/".to_string()
}

fn default_result_sites() -> Vec<String> {
    ["raceresult.com", "sporkrono.fr", "racepedia.de", "xivado.com"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CityConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            name: "Heidelberg".to_string(),
            lat: 49.3988,
            lon: 8.6724,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct WebsiteConfig {
    pub name: String,
    pub base_url: String,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            name: "heidelberg.run".to_string(),
            base_url: "https://heidelberg.run".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LinkCheckConfig {
    #[serde(default = "default_per_domain_limit")]
    pub per_domain_limit: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self {
            per_domain_limit: default_per_domain_limit(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

/// Maps the free-text STATUS column to flags.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StatusTable {
    /// Substrings marking a cancelled/closed entry.
    pub cancelled_markers: Vec<String>,
    /// Exact values that mark cancellation and are hidden afterwards.
    pub cancelled_hidden: Vec<String>,
    pub special: String,
    pub obsolete: String,
    /// Rows with this status are skipped entirely.
    pub temp: String,
}

impl Default for StatusTable {
    fn default() -> Self {
        Self {
            cancelled_markers: vec!["abgesagt".to_string(), "geschlossen".to_string()],
            cancelled_hidden: vec!["abgesagt".to_string()],
            special: "spezial".to_string(),
            obsolete: "obsolete".to_string(),
            temp: "temp".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub status: String,
    pub cancelled: bool,
    pub special: bool,
    pub obsolete: bool,
    pub temp: bool,
}

impl StatusTable {
    pub fn decode(&self, raw: &str) -> StatusFlags {
        let mut status = raw.trim().to_string();
        let cancelled = self.cancelled_markers.iter().any(|m| status.contains(m.as_str()));
        if cancelled && self.cancelled_hidden.contains(&status) {
            status.clear();
        }
        let special = status == self.special;
        let obsolete = status == self.obsolete;
        if special || obsolete {
            status.clear();
        }
        let temp = status == self.temp;
        StatusFlags {
            status,
            cancelled,
            special,
            obsolete,
            temp,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub city: CityConfig,
    #[serde(default)]
    pub website: WebsiteConfig,

    #[serde(default = "default_near_distance_km")]
    pub near_distance_km: f64,
    #[serde(default = "default_near_count")]
    pub near_count: usize,
    #[serde(default = "default_sibling_grace_days")]
    pub sibling_grace_days: i64,

    #[serde(default)]
    pub link_check: LinkCheckConfig,

    #[serde(default = "default_parkrun_results_url")]
    pub parkrun_results_url: String,
    #[serde(default = "default_result_sites")]
    pub registration_result_sites: Vec<String>,

    #[serde(default)]
    pub status: StatusTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city: CityConfig::default(),
            website: WebsiteConfig::default(),
            // Match the serde defaults
            near_distance_km: default_near_distance_km(),
            near_count: default_near_count(),
            sibling_grace_days: default_sibling_grace_days(),
            link_check: LinkCheckConfig::default(),
            parkrun_results_url: default_parkrun_results_url(),
            registration_result_sites: default_result_sites(),
            status: StatusTable::default(),
        }
    }
}

impl Config {
    /// Load the configuration from the context's config directory.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }
        Self::load_from(&path)
    }

    /// Load an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Whether `err` means that the config file does not exist.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        // Walk the error chain and look for an underlying IO NotFound.
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)?;
        Ok(())
    }
}
