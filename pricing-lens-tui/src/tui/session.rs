use crate::run::SimRequest;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// last submitted request, replayed by `pricing-lens last`
#[derive(Debug, Serialize, Deserialize)]
pub struct Session {
    pub request: SimRequest,
    #[serde(default)]
    pub theme: Option<String>, // overrides config theme when cycled with 't'
}

impl Session {
    pub fn cache_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pricing-lens")
            .join("session.json")
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::cache_path();
        if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)?; }
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
    pub fn load() -> Option<Self> {
        let path = Self::cache_path();
        serde_json::from_str(&std::fs::read_to_string(&path).ok()?).ok()
    }
}
