// Engine configuration, loaded from environment variables.

/// How many upstream fetches a bulk scan may run at once when no
/// configuration is present. The game API rate-limits per token, so this
/// stays conservative.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Scoring engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bound on concurrent upstream fetches during bulk scans.
    pub fetch_concurrency: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLASH_FETCH_CONCURRENCY` - concurrent upstream fetches (default: 8)
    ///
    /// A value of 0 is treated as the default: a zero-width fan-out would
    /// never complete.
    pub fn load() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Tests inject fixed maps here
    /// instead of mutating the process environment.
    fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fetch_concurrency = lookup("CLASH_FETCH_CONCURRENCY")
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_FETCH_CONCURRENCY);

        EngineConfig { fetch_concurrency }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}
