use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Timer and behaviour settings for the simulation loops.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Quote simulator period.
    pub quote_interval: Duration,
    /// Candle regeneration period.
    pub candle_interval: Duration,
    /// Position revaluation period.
    pub position_interval: Duration,
    /// Instrument selected at startup.
    pub default_symbol: String,
    /// Start the chart walk from the selected quote's bid instead of the
    /// base price table.
    pub candles_follow_quotes: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            quote_interval: Duration::from_millis(2000),
            candle_interval: Duration::from_millis(5000),
            position_interval: Duration::from_millis(2000),
            default_symbol: "BTC".to_string(),
            candles_follow_quotes: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Simulated latency of the fake login.
    pub login_delay: Duration,
    /// Simulation loop settings.
    pub simulation: SimulationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            login_delay: Duration::from_millis(1000),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let sim = defaults.simulation;

        let millis = |key: &str, fallback: Duration| {
            parse::<u64>(&lookup, key)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT").unwrap_or(defaults.port),
            login_delay: parse::<u64>(&lookup, "LOGIN_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.login_delay),
            simulation: SimulationConfig {
                quote_interval: millis("QUOTE_TICK_MS", sim.quote_interval),
                candle_interval: millis("CANDLE_TICK_MS", sim.candle_interval),
                position_interval: millis("POSITION_TICK_MS", sim.position_interval),
                default_symbol: lookup("DEFAULT_SYMBOL")
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(sim.default_symbol),
                candles_follow_quotes: lookup("CANDLES_FOLLOW_QUOTES")
                    .map(|v| parse_bool(&v))
                    .unwrap_or(sim.candles_follow_quotes),
            },
        }
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 3001);
        assert_eq!(config.simulation.quote_interval, Duration::from_secs(2));
        assert_eq!(config.simulation.candle_interval, Duration::from_secs(5));
        assert_eq!(config.simulation.position_interval, Duration::from_secs(2));
        assert_eq!(config.simulation.default_symbol, "BTC");
        assert!(config.simulation.candles_follow_quotes);
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("QUOTE_TICK_MS", "500"),
            ("DEFAULT_SYMBOL", " aapl "),
            ("CANDLES_FOLLOW_QUOTES", "false"),
            ("LOGIN_DELAY_MS", "0"),
        ]));

        assert_eq!(config.port, 8080);
        assert_eq!(config.simulation.quote_interval, Duration::from_millis(500));
        assert_eq!(config.simulation.default_symbol, "AAPL");
        assert!(!config.simulation.candles_follow_quotes);
        assert_eq!(config.login_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("CANDLE_TICK_MS", "0"),
            ("POSITION_TICK_MS", "-5"),
        ]));

        assert_eq!(config.port, 3001);
        assert_eq!(config.simulation.candle_interval, Duration::from_secs(5));
        assert_eq!(config.simulation.position_interval, Duration::from_secs(2));
    }
}
