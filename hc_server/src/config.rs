//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use hand_cricket::{
    PlayerId, TrackerConfig,
    chain::DEFAULT_PROGRAM_ID,
    tournament::{
        models::{DEFAULT_CAPACITY, DEFAULT_ENTRY_FEE, DEFAULT_LEADERBOARD_SIZE, DEFAULT_WINNER_COUNT},
        payout::RANK_SPLIT_PERCENT,
    },
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default server bind address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

/// Default action icon
pub const DEFAULT_ICON_URL: &str = "https://i.postimg.cc/52hr198Z/mainblink.png";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Tournament rules handed to the tracker
    pub tracker: TrackerConfig,
    /// Fixed dice seed for reproducible runs
    pub dice_seed: Option<u64>,
    /// Action presentation and program settings
    pub action: ActionConfig,
}

/// Settings used when building action responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    /// Tournament program id
    pub program_id: PlayerId,
    /// Icon shown by Blink clients
    pub icon_url: String,
    /// Entry fee in lamports, shown in action descriptions
    pub entry_fee: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `admin_override` - Optional administrator account override (from CLI args)
    /// * `capacity_override` - Optional tournament capacity override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        admin_override: Option<String>,
        capacity_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            bind_override,
            admin_override,
            capacity_override,
        )
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        admin_override: Option<String>,
        capacity_override: Option<usize>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_or(&lookup, "SERVER_BIND", DEFAULT_BIND)?,
        };

        let metrics_bind = parse_opt(&lookup, "METRICS_BIND")?;

        // Administrator (REQUIRED)
        let admin_raw = admin_override
            .or_else(|| lookup("TOURNAMENT_ADMIN"))
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "TOURNAMENT_ADMIN".to_string(),
                hint: "Set it to the base58 public key of the tournament administrator"
                    .to_string(),
            })?;

        let admin = PlayerId::parse(&admin_raw).map_err(|_| ConfigError::Invalid {
            var: "TOURNAMENT_ADMIN".to_string(),
            reason: "Must be a base58 encoded 32-byte public key".to_string(),
        })?;

        let program_id = match lookup("PROGRAM_ID") {
            Some(raw) => PlayerId::parse(&raw).map_err(|_| ConfigError::Invalid {
                var: "PROGRAM_ID".to_string(),
                reason: "Must be a base58 encoded 32-byte public key".to_string(),
            })?,
            None => PlayerId::parse(DEFAULT_PROGRAM_ID).map_err(|_| ConfigError::Invalid {
                var: "PROGRAM_ID".to_string(),
                reason: "Built-in default is not a valid key".to_string(),
            })?,
        };

        let capacity = match capacity_override {
            Some(capacity) => capacity,
            None => parse_or(&lookup, "TOURNAMENT_CAPACITY", DEFAULT_CAPACITY)?,
        };
        let entry_fee = parse_or(&lookup, "ENTRY_FEE_LAMPORTS", DEFAULT_ENTRY_FEE)?;

        let mut tracker = TrackerConfig::new(admin)
            .with_capacity(capacity)
            .with_entry_fee(entry_fee)
            .with_play_after_end(parse_flag(&lookup, "ALLOW_PLAY_AFTER_END", true)?);
        tracker.leaderboard_size =
            parse_or(&lookup, "LEADERBOARD_SIZE", DEFAULT_LEADERBOARD_SIZE)?;
        tracker.winner_count = parse_or(&lookup, "WINNER_COUNT", DEFAULT_WINNER_COUNT)?;

        let action = ActionConfig {
            program_id,
            icon_url: lookup("ACTION_ICON_URL").unwrap_or_else(|| DEFAULT_ICON_URL.to_string()),
            entry_fee,
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            tracker,
            dice_seed: parse_opt(&lookup, "DICE_SEED")?,
            action,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracker.capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "TOURNAMENT_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.tracker.leaderboard_size == 0 {
            return Err(ConfigError::Invalid {
                var: "LEADERBOARD_SIZE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        // The program pays a fixed split per rank
        if self.tracker.winner_count == 0 || self.tracker.winner_count > RANK_SPLIT_PERCENT.len() {
            return Err(ConfigError::Invalid {
                var: "WINNER_COUNT".to_string(),
                reason: format!("Must be between 1 and {}", RANK_SPLIT_PERCENT.len()),
            });
        }

        if self.action.icon_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "ACTION_ICON_URL".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an optional variable. A set but unparsable value is an error.
fn parse_opt<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Cannot parse '{}': {}", raw, e),
            }),
    }
}

/// Parse a variable, using `default` only when it is unset
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`)
fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Expected true or false, got '{}'", raw),
        }),
    }
}
