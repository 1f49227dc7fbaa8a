//! TOML settings for the planner and the agent.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use pellet_maze_system_agent::Strategy;
use pellet_maze_system_pellet_planner::PlannerConfig;
use serde::Deserialize;

/// Strategy names accepted on the command line and in settings files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StrategyName {
    /// Walk to the closest pellet, then replan.
    Nearest,
    /// Follow the cheapest complete collection order.
    #[default]
    Order,
}

impl From<StrategyName> for Strategy {
    fn from(name: StrategyName) -> Self {
        match name {
            StrategyName::Nearest => Strategy::NearestPellet,
            StrategyName::Order => Strategy::PelletOrder,
        }
    }
}

/// Settings loaded from an optional TOML file.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) planner: PlannerSettings,
    pub(crate) agent: AgentSettings,
}

/// `[planner]` table.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PlannerSettings {
    /// Maximum number of expanded states; zero removes the limit.
    pub(crate) expansion_limit: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            expansion_limit: PlannerConfig::default().expansion_limit().unwrap_or(0),
        }
    }
}

/// `[agent]` table.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AgentSettings {
    pub(crate) strategy: StrategyName,
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when no file is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        parse_settings(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    /// Planner configuration with an optional command-line override.
    pub(crate) fn planner_config(&self, expansion_limit: Option<usize>) -> PlannerConfig {
        let limit = expansion_limit.unwrap_or(self.planner.expansion_limit);
        PlannerConfig::new((limit > 0).then_some(limit))
    }
}

fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).context("failed to parse settings toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = parse_settings("").expect("empty settings parse");

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.agent.strategy, StrategyName::Order);
        assert_eq!(
            settings.planner_config(None).expansion_limit(),
            PlannerConfig::default().expansion_limit()
        );
    }

    #[test]
    fn tables_override_defaults() {
        let settings = parse_settings(
            r#"
[planner]
expansion_limit = 0

[agent]
strategy = "nearest"
"#,
        )
        .expect("settings parse");

        assert_eq!(settings.agent.strategy, StrategyName::Nearest);
        assert_eq!(settings.planner_config(None).expansion_limit(), None);
        assert_eq!(settings.planner_config(Some(12)).expansion_limit(), Some(12));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_settings("[planner]\nbudget = 3\n").is_err());
        assert!(parse_settings("[agent]\nstrategy = \"fastest\"\n").is_err());
    }
}
