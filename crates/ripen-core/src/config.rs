use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::window::DEFAULT_ROLLOVER_HOUR;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "ripen.toml";

/// Bucket width used on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    #[serde(rename = "d", alias = "day")]
    Day,
    #[default]
    #[serde(rename = "w", alias = "week")]
    Week,
}

/// Which derived metric, if any, is drawn against a second value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryGraph {
    #[default]
    None,
    /// Mean retrievability as a percentage.
    RetentionRelative,
    /// Mean interval-derived stability in days.
    StabilityAverage,
}

/// Options that shape a chart report. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub hide_learning: bool,
    pub hide_young: bool,
    pub hide_mature: bool,
    pub hide_retained: bool,
    pub hide_total_knowledge_graph: bool,
    pub exclude_deleted_cards: bool,
    pub exclude_suspended_cards: bool,
    pub main_screen_aggregation: Aggregation,
    pub secondary_graph: SecondaryGraph,
    pub secondary_axis_dynamic_max: bool,
    pub secondary_axis_maximum_value: f64,
    pub use_absolute_dates: bool,
    pub rollover_hour: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            hide_learning: false,
            hide_young: false,
            hide_mature: false,
            hide_retained: false,
            hide_total_knowledge_graph: false,
            exclude_deleted_cards: true,
            exclude_suspended_cards: false,
            main_screen_aggregation: Aggregation::default(),
            secondary_graph: SecondaryGraph::default(),
            secondary_axis_dynamic_max: true,
            secondary_axis_maximum_value: default_secondary_axis_max(),
            use_absolute_dates: false,
            rollover_hour: DEFAULT_ROLLOVER_HOUR,
        }
    }
}

impl ChartConfig {
    /// Fixed maximum for the secondary axis, `None` when it scales to data.
    #[must_use]
    pub fn secondary_axis_max(&self) -> Option<f64> {
        if self.secondary_axis_dynamic_max {
            None
        } else {
            Some(self.secondary_axis_maximum_value)
        }
    }
}

/// A loaded configuration and the file it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub chart: ChartConfig,
    /// `None` when built-in defaults were used.
    pub source: Option<PathBuf>,
}

/// Load a chart configuration from `path`. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ChartConfig> {
    if !path.exists() {
        return Ok(ChartConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ChartConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Location of the per-user configuration file, if the platform has one.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ripen/config.toml"))
}

/// Pick the configuration file to load.
///
/// Precedence: explicit path, then `ripen.toml` in `working_dir`, then the
/// user config file. Only the explicit path is returned when it is missing;
/// the implicit locations must exist.
#[must_use]
pub fn discover_config_path(explicit: Option<&Path>, working_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let project = working_dir.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        return Some(project);
    }

    user_config_path().filter(|path| path.exists())
}

/// Resolve and load the effective configuration.
///
/// # Errors
///
/// Returns an error if an explicit path does not exist, or if the chosen
/// file cannot be read or parsed.
pub fn resolve_config(explicit: Option<&Path>, working_dir: &Path) -> Result<EffectiveConfig> {
    if let Some(path) = explicit.filter(|path| !path.exists()) {
        anyhow::bail!("Config file {} does not exist", path.display());
    }

    let Some(path) = discover_config_path(explicit, working_dir) else {
        return Ok(EffectiveConfig {
            chart: ChartConfig::default(),
            source: None,
        });
    };

    let chart = load_config(&path)?;
    Ok(EffectiveConfig {
        chart,
        source: Some(path),
    })
}

const fn default_secondary_axis_max() -> f64 {
    100.0
}
