//! Application configuration from environment variables

use std::env;
use std::str::FromStr;

use coach_llm::LlmConfig;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Playing strength of the opponent
    pub bot_elo: u32,

    /// Think time per opponent move
    pub bot_move_time_ms: u64,

    /// Search depth for post-game analysis
    pub analysis_depth: u32,

    /// Engine sessions for parallel analysis (0 = one per CPU)
    pub pool_size: usize,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let defaults = LlmConfig::default();

        let pool_size = match parse_or(get("ENGINE_POOL_SIZE").as_deref(), 1) {
            0 => num_cpus::get(),
            n => n,
        };

        Self {
            engine: EngineConfig {
                stockfish_path: string_or("STOCKFISH_PATH", "stockfish"),
                bot_elo: parse_or(get("BOT_ELO").as_deref(), 1200),
                bot_move_time_ms: parse_or(get("BOT_MOVE_TIME_MS").as_deref(), 100),
                analysis_depth: parse_or(
                    get("ANALYSIS_DEPTH").as_deref(),
                    coach_analysis::DEFAULT_ANALYSIS_DEPTH,
                ),
                pool_size,
            },
            llm: LlmConfig {
                backend: string_or("LLM_BACKEND", &defaults.backend),
                player_elo: parse_or(get("PLAYER_ELO").as_deref(), defaults.player_elo),
                ollama_host: string_or("OLLAMA_HOST", &defaults.ollama_host),
                ollama_model: string_or("OLLAMA_MODEL", &defaults.ollama_model),
                openai_api_key: string_or("OPENAI_API_KEY", ""),
                openai_model: string_or("OPENAI_MODEL", &defaults.openai_model),
                timeout_secs: parse_or(get("LLM_TIMEOUT_SECS").as_deref(), defaults.timeout_secs),
            },
        }
    }
}

/// `parse()` a value, keeping `default` when it is missing or malformed.
pub fn parse_or<T: FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
