use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_timeout() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { theme: default_theme() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_bins")]
    pub histogram_bins: usize,
}

fn default_bins() -> usize {
    20
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { histogram_bins: default_bins() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_format() -> String {
    "json".into()
}
fn default_output_dir() -> String {
    ".".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String, // trace|debug|info|warn|error
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pricing-lens")
            .join("config.toml")
    }

    /// the file `load` reads and `save` writes
    pub fn resolved_path() -> PathBuf {
        match std::env::var("PRICING_LENS_CONFIG") {
            Ok(env_path) => PathBuf::from(env_path), // $PRICING_LENS_CONFIG overrides default config path
            Err(_) => Self::config_path(),
        }
    }

    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::resolved_path())
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let cfg: Self =
            toml::from_str(&content).map_err(|e| crate::PricingLensError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(crate::PricingLensError::Config("service.base_url is empty".into()));
        }
        if self.service.timeout_secs == 0 {
            return Err(crate::PricingLensError::Config("service.timeout_secs must be > 0".into()));
        }
        if self.charts.histogram_bins == 0 {
            return Err(crate::PricingLensError::Config("charts.histogram_bins must be > 0".into()));
        }
        Ok(())
    }

    pub fn save(&self) -> crate::Result<PathBuf> {
        let path = Self::resolved_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::PricingLensError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
