use crate::{PageIndex, PagerError, PagerResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Next page loading starts once no more than this many items remain below the viewport.
pub const DEFAULT_ZONE_SIZE: usize = 3;

/// Extra rows the list must hold beyond the visible ones before it counts as overflowing.
pub const DEFAULT_FILL_SLACK: usize = 1;

pub const DEFAULT_INITIAL_PAGE: PageIndex = 1;

/// What happens to already loaded pages when the first page of the source arrives again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Clear only when the first page is already loaded (a refresh).
    #[default]
    ClearIfPresent,
    /// Clear every time the first page arrives, loaded before or not.
    AlwaysClear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    #[serde(default = "default_zone_size")]
    pub zone_size: usize,
    #[serde(default = "default_fill_slack")]
    pub fill_slack: usize,
    #[serde(default = "default_initial_page")]
    pub initial_page: PageIndex,
    #[serde(default)]
    pub reload_policy: ReloadPolicy,
}

fn default_zone_size() -> usize {
    DEFAULT_ZONE_SIZE
}

fn default_fill_slack() -> usize {
    DEFAULT_FILL_SLACK
}

fn default_initial_page() -> PageIndex {
    DEFAULT_INITIAL_PAGE
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            zone_size: DEFAULT_ZONE_SIZE,
            fill_slack: DEFAULT_FILL_SLACK,
            initial_page: DEFAULT_INITIAL_PAGE,
            reload_policy: ReloadPolicy::default(),
        }
    }
}

impl PagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/autopager/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("autopager/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("autopager\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::load_from(&config_path) {
                    return config;
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> PagerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| PagerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PagerResult<()> {
        if self.zone_size == 0 {
            return Err(PagerError::Validation(
                "zone_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_zone_size(mut self, zone_size: usize) -> Self {
        self.zone_size = zone_size;
        self
    }

    pub fn with_fill_slack(mut self, fill_slack: usize) -> Self {
        self.fill_slack = fill_slack;
        self
    }

    pub fn with_initial_page(mut self, initial_page: PageIndex) -> Self {
        self.initial_page = initial_page;
        self
    }

    pub fn with_reload_policy(mut self, reload_policy: ReloadPolicy) -> Self {
        self.reload_policy = reload_policy;
        self
    }
}
