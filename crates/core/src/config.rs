use std::env;

use chrono::TimeDelta;

use crate::error::{Error, Result};

pub const POPULAR_WINDOW_DAYS_VAR: &str = "GAMESTATS_POPULAR_WINDOW_DAYS";
pub const INACTIVE_USERS_VAR: &str = "GAMESTATS_INACTIVE_USERS";

const DEFAULT_POPULAR_WINDOW_DAYS: i64 = 7;
const MAX_POPULAR_WINDOW_DAYS: i64 = 3650;

/// What best-user ranking does when it meets an inactive user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InactiveUserPolicy {
    /// Abort the whole ranking with `Error::InactiveUser`
    #[default]
    Reject,
    /// Leave inactive users out of the ranking
    Skip,
}

impl std::str::FromStr for InactiveUserPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            other => Err(Error::InvalidInput(format!(
                "Unknown inactive user policy: {}",
                other
            ))),
        }
    }
}

fn parse_window_days(days: &str) -> Result<TimeDelta> {
    let parsed: i64 = days.trim().parse().map_err(|_| {
        Error::InvalidInput(format!(
            "{} must be an integer: {}",
            POPULAR_WINDOW_DAYS_VAR, days
        ))
    })?;

    if !(1..=MAX_POPULAR_WINDOW_DAYS).contains(&parsed) {
        return Err(Error::InvalidInput(format!(
            "{} must be between 1 and {}, got {}",
            POPULAR_WINDOW_DAYS_VAR, MAX_POPULAR_WINDOW_DAYS, parsed
        )));
    }

    TimeDelta::try_days(parsed).ok_or_else(|| {
        Error::InvalidInput(format!("{} is out of range: {}", POPULAR_WINDOW_DAYS_VAR, parsed))
    })
}

#[derive(Debug, Clone)]
pub struct StatisticsConfig {
    /// Trailing window used for `played_in_week`
    pub popular_window: TimeDelta,
    pub inactive_users: InactiveUserPolicy,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            popular_window: TimeDelta::days(DEFAULT_POPULAR_WINDOW_DAYS),
            inactive_users: InactiveUserPolicy::default(),
        }
    }
}

impl StatisticsConfig {
    /// Build a config from `GAMESTATS_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(days) = lookup(POPULAR_WINDOW_DAYS_VAR) {
            config.popular_window = parse_window_days(&days)?;
        }

        if let Some(policy) = lookup(INACTIVE_USERS_VAR) {
            config.inactive_users = policy.parse()?;
        }

        Ok(config)
    }

    pub fn with_popular_window(mut self, window: TimeDelta) -> Self {
        self.popular_window = window;

        self
    }

    pub fn with_inactive_users(mut self, policy: InactiveUserPolicy) -> Self {
        self.inactive_users = policy;

        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StatisticsConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.popular_window, TimeDelta::days(7));
        assert_eq!(config.inactive_users, InactiveUserPolicy::Reject);
    }

    #[test]
    fn test_overrides() {
        let config = StatisticsConfig::from_lookup(lookup_from(&[
            (POPULAR_WINDOW_DAYS_VAR, "30"),
            (INACTIVE_USERS_VAR, " Skip "),
        ]))
        .unwrap();

        assert_eq!(config.popular_window, TimeDelta::days(30));
        assert_eq!(config.inactive_users, InactiveUserPolicy::Skip);
    }

    #[test]
    fn test_invalid_values() {
        let parse = |key: &str, value: &str| {
            StatisticsConfig::from_lookup(lookup_from(&[(key, value)]))
        };

        for days in ["week", "0", "-3", "3651", "200000000", "9223372036854775807"] {
            assert!(
                matches!(parse(POPULAR_WINDOW_DAYS_VAR, days), Err(Error::InvalidInput(_))),
                "window of {} days should be rejected",
                days
            );
        }
        assert!(matches!(parse(INACTIVE_USERS_VAR, "ignore"), Err(Error::InvalidInput(_))));

        let longest = parse(POPULAR_WINDOW_DAYS_VAR, "3650").unwrap();
        assert_eq!(longest.popular_window, TimeDelta::days(3650));
    }
}
