use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::UserId;
use crate::error::AppError;

pub const DEFAULT_PREFIX: &str = ",";
pub const DEFAULT_BOARD_URL_TEMPLATE: &str = "http://www.fen-to-image.com/image/36/double/coords/{fen}";

/// Runtime settings for the bot, read from `CHESSBOT_*` environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub host: String,
    pub port: u16,
    /// Identity the automated opponent plays under.
    pub bot_user_id: UserId,
    pub default_prefix: String,
    pub snapshot_path: PathBuf,
    pub snapshot_interval: Duration,
    /// Opportunistic snapshots are skipped if one completed this recently.
    pub snapshot_debounce: Duration,
    pub engine: String,
    pub engine_depth: u8,
    /// Seed for the session colour coin flip and randomized strategies.
    pub rng_seed: Option<u64>,
    pub board_url_template: String,
    pub notify_url: Option<String>,
    pub notify_timeout: Duration,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let bot_user_id = UserId::new(must_var("CHESSBOT_USER_ID")?);
        let board_url_template = var_or("CHESSBOT_BOARD_URL_TEMPLATE", DEFAULT_BOARD_URL_TEMPLATE);
        if !board_url_template.contains("{fen}") {
            return Err(AppError::config(
                "CHESSBOT_BOARD_URL_TEMPLATE must contain a '{fen}' placeholder",
            ));
        }
        let default_prefix = var_or("CHESSBOT_DEFAULT_PREFIX", DEFAULT_PREFIX);
        if default_prefix.trim().is_empty() {
            return Err(AppError::config("CHESSBOT_DEFAULT_PREFIX must not be blank"));
        }

        Ok(Self {
            host: var_or("CHESSBOT_HOST", "0.0.0.0"),
            port: parsed_var("CHESSBOT_PORT", 3001)?,
            bot_user_id,
            default_prefix,
            snapshot_path: PathBuf::from(var_or("CHESSBOT_SNAPSHOT_PATH", "bot.data.json")),
            snapshot_interval: Duration::from_secs(parsed_var(
                "CHESSBOT_SNAPSHOT_INTERVAL_SECS",
                300,
            )?),
            snapshot_debounce: Duration::from_secs(parsed_var(
                "CHESSBOT_SNAPSHOT_DEBOUNCE_SECS",
                5,
            )?),
            engine: var_or("CHESSBOT_ENGINE", "minimax"),
            engine_depth: parsed_var("CHESSBOT_ENGINE_DEPTH", 2)?,
            rng_seed: optional_var("CHESSBOT_RNG_SEED")
                .map(|raw| parse_value("CHESSBOT_RNG_SEED", &raw))
                .transpose()?,
            board_url_template,
            notify_url: optional_var("CHESSBOT_NOTIFY_URL"),
            notify_timeout: Duration::from_millis(parsed_var("CHESSBOT_NOTIFY_TIMEOUT_MS", 5000)?),
        })
    }

    /// Deterministic settings for tests: seeded, random strategy, no webhook.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            bot_user_id: UserId::new("chessbot"),
            default_prefix: DEFAULT_PREFIX.to_string(),
            snapshot_path: PathBuf::from("bot.data.json"),
            snapshot_interval: Duration::from_secs(300),
            snapshot_debounce: Duration::from_secs(5),
            engine: "random".to_string(),
            engine_depth: 0,
            rng_seed: Some(7),
            board_url_template: DEFAULT_BOARD_URL_TEMPLATE.to_string(),
            notify_url: None,
            notify_timeout: Duration::from_millis(500),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config(format!("Invalid value for '{name}': '{raw}'")))
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
