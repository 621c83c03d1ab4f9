//! Environment-driven configuration, loaded once at startup.
//!
//! Each field reads its own environment variable with a documented default;
//! `Config::from_env` composes them into one struct consumed by `main.rs`.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|e| anyhow::anyhow!("Invalid {key}={raw}: {e}")),
        Err(_) => Ok(default),
    }
}

/// Process-wide configuration. No filesystem writes, no persistent store —
/// just the knobs `main.rs` needs to wire the HTTP server and the market
/// data provider chain.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub primary_base_url: String,
    pub secondary_base_url: String,
    /// Per-upstream-call deadline, on the order of a few seconds.
    pub upstream_timeout: Duration,
    /// Fixed inter-symbol delay for the scanner endpoint.
    pub scan_throttle: Duration,
    pub default_candle_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port: u16 = env_or("PORT", 8080u16).context("Failed to parse PORT")?;
        let host: Ipv4Addr = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse()
            .context("Failed to parse HOST")?;

        let upstream_timeout_secs: u64 = env_or("UPSTREAM_TIMEOUT_SECS", 5u64).context("Failed to parse UPSTREAM_TIMEOUT_SECS")?;
        let scan_throttle_ms: u64 = env_or("SCAN_THROTTLE_MS", 250u64).context("Failed to parse SCAN_THROTTLE_MS")?;
        let default_candle_limit: usize = env_or("DEFAULT_CANDLE_LIMIT", 500usize).context("Failed to parse DEFAULT_CANDLE_LIMIT")?;

        Ok(Self {
            bind_address: SocketAddr::new(IpAddr::V4(host), port),
            primary_base_url: env::var("PRIMARY_CANDLE_BASE_URL").unwrap_or_else(|_| "https://api.kraken.com".to_string()),
            secondary_base_url: env::var("SECONDARY_CANDLE_BASE_URL").unwrap_or_else(|_| "https://api.binance.com".to_string()),
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            scan_throttle: Duration::from_millis(scan_throttle_ms),
            default_candle_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_to_default_when_unset() {
        env::remove_var("TOTALLY_UNSET_KEY_FOR_TEST");
        let value: u16 = env_or("TOTALLY_UNSET_KEY_FOR_TEST", 42).unwrap();
        assert_eq!(value, 42);
    }
}
