use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;
use crate::view::{SortDirection, SortKey, Window};

/// Metric aggregated across all scenarios under one synthetic key.
pub const LAUNCH_METRIC: &str = "app.launch";

/// Default length of the flaky-test and error-cluster tables.
pub const DEFAULT_TABLE_LIMIT: usize = 12;

/// Board configuration, read from `trendline.yaml`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    /// Metrics whose samples form one series regardless of scenario.
    pub merged_metrics: Vec<String>,

    /// Rows kept in the flaky-test table.
    pub flaky_limit: usize,

    /// Rows kept in the error-cluster table.
    pub cluster_limit: usize,

    /// Most recent samples shown per chart. `None` shows all.
    pub chart_window: Option<usize>,

    /// Initial sort of the metric table.
    pub default_sort: SortKey,

    /// Overrides the key's own default direction when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_direction: Option<SortDirection>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            merged_metrics: vec![LAUNCH_METRIC.to_string()],
            flaky_limit: DEFAULT_TABLE_LIMIT,
            cluster_limit: DEFAULT_TABLE_LIMIT,
            chart_window: None,
            default_sort: SortKey::Last,
            default_direction: None,
        }
    }
}

impl BoardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&raw).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.display().to_string()),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    pub fn window(&self) -> Window {
        match self.chart_window {
            Some(n) => Window::Last(n),
            None => Window::All,
        }
    }
}
