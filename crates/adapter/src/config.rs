use std::env;
use std::path::PathBuf;

use log::LevelFilter;

/// Which messages the runner writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventMode {
    /// Turn outcomes only
    #[default]
    Final,
    /// Every phase boundary plus turn outcomes
    All,
}

impl EventMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "final" => Some(EventMode::Final),
            "all" => Some(EventMode::All),
            _ => None,
        }
    }
}

/// Headless runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub seed: u32,
    pub level_path: Option<PathBuf>,
    pub max_turns: u32,
    pub events: EventMode,
    pub log_level: LevelFilter,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            level_path: None,
            max_turns: 200,
            events: EventMode::Final,
            log_level: LevelFilter::Warn,
        }
    }
}

impl RunConfig {
    /// Read `MATCH3_SEED`, `MATCH3_LEVEL_PATH`, `MATCH3_MAX_TURNS`, `MATCH3_EVENTS` and
    /// `MATCH3_LOG`. Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed = get("MATCH3_SEED")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(defaults.seed);

        let level_path = get("MATCH3_LEVEL_PATH")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let max_turns = get("MATCH3_MAX_TURNS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_turns);

        let events = get("MATCH3_EVENTS")
            .and_then(|v| EventMode::from_str(&v))
            .unwrap_or(defaults.events);

        let log_level = get("MATCH3_LOG")
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .unwrap_or(defaults.log_level);

        Self {
            seed,
            level_path,
            max_turns,
            events,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(RunConfig::from_lookup(|_| None), RunConfig::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = RunConfig::from_lookup(lookup(&[
            ("MATCH3_SEED", "42"),
            ("MATCH3_LEVEL_PATH", "levels/one.json"),
            ("MATCH3_MAX_TURNS", "15"),
            ("MATCH3_EVENTS", "ALL"),
            ("MATCH3_LOG", "debug"),
        ]));
        assert_eq!(config.seed, 42);
        assert_eq!(config.level_path, Some(PathBuf::from("levels/one.json")));
        assert_eq!(config.max_turns, 15);
        assert_eq!(config.events, EventMode::All);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = RunConfig::from_lookup(lookup(&[
            ("MATCH3_SEED", "-3"),
            ("MATCH3_LEVEL_PATH", "  "),
            ("MATCH3_MAX_TURNS", "0"),
            ("MATCH3_EVENTS", "some"),
            ("MATCH3_LOG", "loud"),
        ]));
        assert_eq!(config, RunConfig::default());
    }
}
