use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

pub const DEFAULT_DECK_API_URL: &str = "https://deckofcardsapi.com/api/deck";
pub const DEFAULT_MAX_SCORE: u32 = 8;

/// Cosmetic "thinking time" before the opponent draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpponentDelay
{
    pub min_ms: u64,
    pub max_ms: u64,
}

impl OpponentDelay
{
    pub const fn none() -> Self
    {
        OpponentDelay { min_ms: 0, max_ms: 0 }
    }

    pub fn is_none(&self) -> bool
    {
        self.max_ms == 0
    }

    /// Picks a delay uniformly from `[min_ms, max_ms)`, or `min_ms` when the
    /// range is empty.
    pub fn sample(&self, rng: &mut impl Rng) -> Duration
    {
        let ms = if self.max_ms > self.min_ms
        {
            rng.gen_range(self.min_ms..self.max_ms)
        }
        else
        {
            self.min_ms
        };
        Duration::from_millis(ms)
    }
}

impl Default for OpponentDelay
{
    fn default() -> Self
    {
        OpponentDelay { min_ms: 600, max_ms: 1500 }
    }
}

/// Settings supplied when a session is constructed
#[derive(Clone, Debug)]
pub struct GameConfig
{
    /// Skip the deck service and play with the local deck
    pub force_offline: bool,
    /// First side to reach this score wins the match
    pub max_score: u32,
    /// Base url of the deck-of-cards service
    pub deck_api_url: String,
    /// Upper bound on every request made to the deck service
    pub request_timeout: Duration,
    pub opponent_delay: OpponentDelay,
    /// Fixed shuffle seed for the local deck; random when unset
    pub local_deck_seed: Option<u64>,
}

impl Default for GameConfig
{
    fn default() -> Self
    {
        Self
        {
            force_offline: false,
            max_score: DEFAULT_MAX_SCORE,
            deck_api_url: DEFAULT_DECK_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            opponent_delay: OpponentDelay::default(),
            local_deck_seed: None,
        }
    }
}

impl GameConfig
{
    pub fn offline() -> Self
    {
        Self { force_offline: true, ..Self::default() }
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError>
    {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults plus whatever `lookup` returns for the
    /// `WAR_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = GameConfig::default();

        if let Some(value) = lookup("WAR_FORCE_OFFLINE")
        {
            config.force_offline = parse_flag("WAR_FORCE_OFFLINE", &value)?;
        }

        if let Some(value) = lookup("WAR_MAX_SCORE")
        {
            config.max_score = match value.trim().parse::<u32>()
            {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("WAR_MAX_SCORE", &value)),
            };
        }

        if let Some(value) = lookup("WAR_DECK_API_URL")
        {
            let url = value.trim().trim_end_matches('/');
            if !url.starts_with("http")
            {
                return Err(invalid("WAR_DECK_API_URL", &value));
            }
            config.deck_api_url = url.to_string();
        }

        if let Some(value) = lookup("WAR_REQUEST_TIMEOUT_SECS")
        {
            config.request_timeout = match value.trim().parse::<u64>()
            {
                Ok(n) if n > 0 => Duration::from_secs(n),
                _ => return Err(invalid("WAR_REQUEST_TIMEOUT_SECS", &value)),
            };
        }

        if let Some(value) = lookup("WAR_OPPONENT_DELAY_MS")
        {
            config.opponent_delay = parse_delay(&value).ok_or_else(|| invalid("WAR_OPPONENT_DELAY_MS", &value))?;
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError
{
    ConfigError::InvalidValue { key: key.to_string(), value: value.to_string() }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError>
{
    match value.trim().to_ascii_lowercase().as_str()
    {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

// "750" or "600-1500"
fn parse_delay(value: &str) -> Option<OpponentDelay>
{
    let value = value.trim();
    match value.split_once('-')
    {
        Some((min, max)) =>
        {
            let min_ms = min.trim().parse().ok()?;
            let max_ms = max.trim().parse().ok()?;
            (min_ms <= max_ms).then_some(OpponentDelay { min_ms, max_ms })
        }
        None =>
        {
            let ms = value.parse().ok()?;
            Some(OpponentDelay { min_ms: ms, max_ms: ms })
        }
    }
}
