use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub route: RouteConfig,
    pub estimator: EstimatorConfig,
    pub features: FeatureFlags,
}

// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{}', expected pretty or json", other),
        }
    }
}

// Route layout: seat count and ordered stops
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub seat_count: u32,
    pub stations: Vec<String>,
}

// Synthetic dataset and training parameters for the confirmation estimator
#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    pub dataset_rows: usize,
    pub random_seed: u64,
    pub dataset_path: Option<PathBuf>,
    pub learning_rate: f64,
    pub epochs: usize,
}

// Feature flags
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    pub enable_estimator: bool,
    pub seed_demo_bookings: bool,
}

pub const DEFAULT_STATIONS: [&str; 7] = [
    "Ahmedabad",
    "Vadodara",
    "Bharuch",
    "Surat",
    "Valsad",
    "Vapi",
    "Mumbai",
];

pub const DEFAULT_SEAT_COUNT: u32 = 30;
pub const MAX_SEAT_COUNT: u32 = 200;

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            seat_count: DEFAULT_SEAT_COUNT,
            stations: DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            dataset_rows: 600,
            random_seed: 42,
            dataset_path: None,
            learning_rate: 0.5,
            epochs: 800,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests do not
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let estimator_defaults = EstimatorConfig::default();

        let config = Config {
            app: AppConfig {
                host: get("HOST", "0.0.0.0"),
                port: parse(&lookup, "PORT", 8000)?,
                environment: get("ENVIRONMENT", "development"),
                rust_log: get("RUST_LOG", "bus_booking=debug,tower_http=debug"),
                log_format: parse(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
            },
            route: RouteConfig {
                seat_count: parse(&lookup, "SEAT_COUNT", DEFAULT_SEAT_COUNT)?,
                stations: match lookup("ROUTE_STATIONS") {
                    Some(raw) => raw
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect(),
                    None => RouteConfig::default().stations,
                },
            },
            estimator: EstimatorConfig {
                dataset_rows: parse(&lookup, "ESTIMATOR_DATASET_ROWS", estimator_defaults.dataset_rows)?,
                random_seed: parse(&lookup, "ESTIMATOR_RANDOM_SEED", estimator_defaults.random_seed)?,
                dataset_path: lookup("ESTIMATOR_DATASET_PATH")
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
                learning_rate: parse(&lookup, "ESTIMATOR_LEARNING_RATE", estimator_defaults.learning_rate)?,
                epochs: parse(&lookup, "ESTIMATOR_EPOCHS", estimator_defaults.epochs)?,
            },
            features: FeatureFlags {
                enable_estimator: parse(&lookup, "ENABLE_ESTIMATOR", true)?,
                seed_demo_bookings: parse(&lookup, "SEED_DEMO_BOOKINGS", false)?,
            },
        };

        if config.route.seat_count == 0 || config.route.seat_count > MAX_SEAT_COUNT {
            bail!("SEAT_COUNT must be between 1 and {}", MAX_SEAT_COUNT);
        }
        if config.route.stations.len() < 2 {
            bail!("ROUTE_STATIONS must name at least two stations");
        }
        if config.estimator.dataset_rows < 8 {
            bail!("ESTIMATOR_DATASET_ROWS must be at least 8");
        }
        let rate = config.estimator.learning_rate;
        if !(rate.is_finite() && rate > 0.0) {
            bail!("ESTIMATOR_LEARNING_RATE must be a positive finite number, got {}", rate);
        }
        if config.estimator.epochs == 0 {
            bail!("ESTIMATOR_EPOCHS must be greater than zero");
        }

        Ok(config)
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_describe_the_ahmedabad_mumbai_route() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.log_format, LogFormat::Pretty);
        assert_eq!(config.route.seat_count, 30);
        assert_eq!(config.route.stations.first().map(String::as_str), Some("Ahmedabad"));
        assert_eq!(config.route.stations.last().map(String::as_str), Some("Mumbai"));
        assert!(config.features.enable_estimator);
        assert!(!config.features.seed_demo_bookings);
        assert_eq!(config.estimator.random_seed, 42);
        assert!(config.estimator.dataset_path.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9100"),
            ("LOG_FORMAT", "JSON"),
            ("ROUTE_STATIONS", " Ahmedabad, Surat ,Mumbai "),
            ("SEED_DEMO_BOOKINGS", "true"),
            ("ESTIMATOR_DATASET_PATH", "/tmp/bus_history.csv"),
        ]))
        .unwrap();

        assert_eq!(config.app.port, 9100);
        assert_eq!(config.app.log_format, LogFormat::Json);
        assert_eq!(config.route.stations, vec!["Ahmedabad", "Surat", "Mumbai"]);
        assert!(config.features.seed_demo_bookings);
        assert_eq!(
            config.estimator.dataset_path,
            Some(PathBuf::from("/tmp/bus_history.csv"))
        );
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        assert!(Config::from_lookup(lookup_from(&[("ENABLE_ESTIMATOR", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ROUTE_STATIONS", "Ahmedabad")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SEAT_COUNT", "0")])).is_err());
    }

    #[test]
    fn seat_count_is_bounded() {
        assert!(Config::from_lookup(lookup_from(&[("SEAT_COUNT", "4000000000")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SEAT_COUNT", "201")])).is_err());
        let config = Config::from_lookup(lookup_from(&[("SEAT_COUNT", "200")])).unwrap();
        assert_eq!(config.route.seat_count, MAX_SEAT_COUNT);
    }

    #[test]
    fn training_parameters_must_be_usable() {
        for rate in ["NaN", "inf", "0", "-0.1"] {
            let err = Config::from_lookup(lookup_from(&[("ESTIMATOR_LEARNING_RATE", rate)])).unwrap_err();
            assert!(err.to_string().contains("ESTIMATOR_LEARNING_RATE"), "{}: {}", rate, err);
        }
        let err = Config::from_lookup(lookup_from(&[("ESTIMATOR_EPOCHS", "0")])).unwrap_err();
        assert!(err.to_string().contains("ESTIMATOR_EPOCHS"));

        let config = Config::from_lookup(lookup_from(&[
            ("ESTIMATOR_LEARNING_RATE", "0.1"),
            ("ESTIMATOR_EPOCHS", "50"),
        ]))
        .unwrap();
        assert_eq!(config.estimator.epochs, 50);
    }
}
