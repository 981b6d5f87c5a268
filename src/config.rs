use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::time::Duration;

/// Scanner tuning.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// How long a scan result is served from cache.
    pub cache_ttl: Duration,
    /// Overrides the scan plan's daily-history chunk sizes when set.
    pub chunk_size: Option<usize>,
    /// Upper bound on chunk (or per-symbol) fetches in flight.
    pub max_concurrent_chunks: usize,
    /// Upper bound on single-symbol upstream requests in flight.
    pub max_upstream_requests: usize,
    /// Deadline for one chunk call to the provider.
    pub fetch_timeout: Duration,
    /// Deadline for one single-symbol upstream request.
    pub symbol_timeout: Duration,
    /// Market timezone offset from UTC, in minutes (IST = 330).
    pub utc_offset_minutes: i32,
    /// Replaces the built-in universe when set.
    pub universe: Option<Vec<String>>,
    /// Alternate Yahoo Finance host (mirror or local stand-in).
    pub upstream_url: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(900),
            chunk_size: None,
            max_concurrent_chunks: 4,
            max_upstream_requests: 8,
            fetch_timeout: Duration::from_secs(30),
            symbol_timeout: Duration::from_secs(10),
            utc_offset_minutes: 330,
            universe: None,
            upstream_url: None,
        }
    }
}

impl ScannerConfig {
    /// Load scanner settings from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`, falling back to defaults for missing
    /// or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parse_secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            cache_ttl: parse_secs("SCAN_CACHE_TTL_SECS", defaults.cache_ttl),
            chunk_size: lookup("SCAN_CHUNK_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &usize| *n > 0),
            max_concurrent_chunks: lookup("SCAN_MAX_CONCURRENT_CHUNKS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_concurrent_chunks),
            max_upstream_requests: lookup("SCAN_MAX_UPSTREAM_REQUESTS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_upstream_requests),
            fetch_timeout: parse_secs("SCAN_FETCH_TIMEOUT_SECS", defaults.fetch_timeout),
            symbol_timeout: parse_secs("SCAN_SYMBOL_TIMEOUT_SECS", defaults.symbol_timeout),
            utc_offset_minutes: lookup("SCAN_UTC_OFFSET_MINUTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.utc_offset_minutes),
            universe: lookup("SCAN_UNIVERSE")
                .map(|s| {
                    s.split(',')
                        .map(|sym| sym.trim().to_string())
                        .filter(|sym| !sym.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|symbols| !symbols.is_empty()),
            upstream_url: lookup("SCAN_UPSTREAM_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// Per-symbol timeout, always strictly below the chunk timeout.
    pub fn request_timeout(&self) -> Duration {
        if self.symbol_timeout < self.fetch_timeout {
            self.symbol_timeout
        } else {
            self.fetch_timeout / 2
        }
    }

    /// Market timezone. Out-of-range offsets fall back to UTC.
    pub fn market_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub scanner: ScannerConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            host,
            port,
            scanner: ScannerConfig::from_env(),
        }
    }
}
