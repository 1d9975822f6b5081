//! VendorReach configuration system.
//!
//! Operator-level config (`~/.vendorreach/config.toml`). Campaign settings such as
//! daily targets live in the settings store instead, see [`crate::settings`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReachError, Result};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachConfig {
    /// Operator's local offset from UTC, in minutes. Drives day boundaries.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            agent: AgentConfig::default(),
            store: StoreConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

impl ReachConfig {
    /// Load config from the default path (~/.vendorreach/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReachError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ReachError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.agent.total_agents > 0 && self.agent.index >= self.agent.total_agents {
            return Err(ReachError::Config(format!(
                "agent.index {} is out of range for {} agents",
                self.agent.index, self.agent.total_agents
            )));
        }
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the VendorReach home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vendorreach")
    }
}

/// Which slice of the roster this operator works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent id; also the prefix for per-agent settings keys.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_total_agents")]
    pub total_agents: usize,
    #[serde(default)]
    pub index: usize,
}

fn default_total_agents() -> usize { 1 }

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: None,
            total_agents: default_total_agents(),
            index: 0,
        }
    }
}

/// SQLite store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String { "~/.vendorreach/outreach.db".into() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// What happens to a sequence cursor when a task is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Leave the cursor alone; the step is only hidden for the rest of the day.
    #[default]
    SuppressToday,
    /// Move the cursor past the skipped step.
    Advance,
}

/// Planner and workflow knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_hot_leads_limit")]
    pub hot_leads_limit: usize,
    #[serde(default)]
    pub skip_policy: SkipPolicy,
}

fn default_hot_leads_limit() -> usize { 5 }

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            hot_leads_limit: default_hot_leads_limit(),
            skip_policy: SkipPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReachConfig::default();
        assert_eq!(config.utc_offset_minutes, 0);
        assert_eq!(config.agent.total_agents, 1);
        assert_eq!(config.planner.hot_leads_limit, 5);
        assert_eq!(config.planner.skip_policy, SkipPolicy::SuppressToday);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            utc_offset_minutes = 330

            [agent]
            id = "priya"
            total_agents = 3
            index = 2

            [planner]
            skip_policy = "advance"
        "#;

        let config = ReachConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.utc_offset_minutes, 330);
        assert_eq!(config.agent.id.as_deref(), Some("priya"));
        assert_eq!(config.agent.index, 2);
        assert_eq!(config.planner.skip_policy, SkipPolicy::Advance);
        assert_eq!(config.planner.hot_leads_limit, 5);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config = ReachConfig::from_toml("").unwrap();
        assert_eq!(config.store.db_path, "~/.vendorreach/outreach.db");
        assert!(config.agent.id.is_none());
    }

    #[test]
    fn test_agent_index_out_of_range() {
        let err = ReachConfig::from_toml("[agent]\ntotal_agents = 2\nindex = 2\n").unwrap_err();
        assert!(matches!(err, ReachError::Config(_)));
    }

    #[test]
    fn test_home_dir() {
        let home = ReachConfig::home_dir();
        assert!(home.to_string_lossy().contains("vendorreach"));
    }
}
