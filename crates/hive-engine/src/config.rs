//! Engine configuration from environment variables.

use anyhow::Context;
use std::net::SocketAddr;

/// Runtime settings for the engine binary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Serve UHP over TCP on this address instead of stdin/stdout
    pub listen_addr: Option<SocketAddr>,
    /// Seed for the random strategy
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Read `HIVE_LISTEN_ADDR` and `HIVE_SEED`
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("HIVE_LISTEN_ADDR")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().parse::<SocketAddr>())
            .transpose()
            .context("HIVE_LISTEN_ADDR is not a socket address")?;
        let seed = lookup("HIVE_SEED")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .context("HIVE_SEED is not an unsigned integer")?;

        Ok(Self { listen_addr, seed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<EngineConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_listen_and_seed() {
        let cfg = config(&[("HIVE_LISTEN_ADDR", "127.0.0.1:9000"), ("HIVE_SEED", "17")]).unwrap();
        assert_eq!(cfg.listen_addr, Some("127.0.0.1:9000".parse().unwrap()));
        assert_eq!(cfg.seed, Some(17));
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(config(&[("HIVE_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config(&[("HIVE_SEED", "-1")]).is_err());
    }
}
