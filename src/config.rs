use std::net::SocketAddr;
use std::time::Duration;

use crate::diff::PeriodAlignment;
use crate::error::AppError;
use crate::gradebook::GradebookConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://gradewatch.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 900;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    /// `None` when running offline against the no-op client.
    pub gradebook: Option<GradebookConfig>,
    /// `None` disables background refreshes.
    pub refresh_interval: Option<Duration>,
    pub bind_addr: SocketAddr,
    pub alignment: PeriodAlignment,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let offline = lookup("GRADEBOOK_OFFLINE").is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
        let gradebook = if offline {
            None
        } else {
            let base_url = lookup("GRADEBOOK_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| AppError::Config("GRADEBOOK_BASE_URL is not set".to_string()))?;
            let timeout_secs = parse_or(&lookup, "GRADEBOOK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
            Some(GradebookConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            })
        };

        let interval_secs = parse_or(&lookup, "REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        let refresh_interval = (interval_secs > 0).then(|| Duration::from_secs(interval_secs));

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let alignment = match lookup("PERIOD_ALIGNMENT") {
            Some(value) => value.parse::<PeriodAlignment>().map_err(AppError::Config)?,
            None => PeriodAlignment::default(),
        };

        Ok(Self {
            database_url,
            gradebook,
            refresh_interval,
            bind_addr,
            alignment,
        })
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64, AppError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a whole number of seconds", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_base_url() {
        let config = config(&[("GRADEBOOK_BASE_URL", "https://grades.example.org")]).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(900)));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.alignment, PeriodAlignment::Position);
        assert_eq!(config.gradebook.unwrap().timeout, Duration::from_secs(30));
    }

    #[test]
    fn base_url_is_required_unless_offline() {
        assert!(matches!(config(&[]), Err(AppError::Config(_))));

        let offline = config(&[("GRADEBOOK_OFFLINE", "1")]).unwrap();
        assert!(offline.gradebook.is_none());
    }

    #[test]
    fn zero_interval_disables_scheduler() {
        let config = config(&[("GRADEBOOK_OFFLINE", "true"), ("REFRESH_INTERVAL_SECS", "0")]).unwrap();
        assert!(config.refresh_interval.is_none());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for vars in [
            [("GRADEBOOK_OFFLINE", "1"), ("REFRESH_INTERVAL_SECS", "soon")],
            [("GRADEBOOK_OFFLINE", "1"), ("PERIOD_ALIGNMENT", "random")],
            [("GRADEBOOK_OFFLINE", "1"), ("BIND_ADDR", "localhost")],
        ] {
            assert!(matches!(config(&vars), Err(AppError::Config(_))));
        }
    }

    #[test]
    fn class_alignment_is_selectable() {
        let config = config(&[("GRADEBOOK_OFFLINE", "1"), ("PERIOD_ALIGNMENT", "class")]).unwrap();
        assert_eq!(config.alignment, PeriodAlignment::Class);
    }
}
