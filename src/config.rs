//! Configuration loading and validation
//!
//! All tuning knobs for the engine (stat weights, opponent adjustment,
//! probability blend, confidence thresholds) live here and are validated
//! once at startup, before anything is handed to the engine.

use crate::error::{BotError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sheets: SheetsConfig,
    pub odds: OddsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub bot: BotConfig,
    pub telegram: Option<TelegramConfig>,
}

/// Google Sheets stats source
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    /// A1 range holding the batting stats table, header row first
    #[serde(default = "default_stats_range")]
    pub stats_range: String,
    /// How long fetched stat rows stay fresh
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u64,
}

/// The Odds API source
#[derive(Debug, Clone, Deserialize)]
pub struct OddsConfig {
    pub api_key: String,
    #[serde(default = "default_odds_base_url")]
    pub base_url: String,
    #[serde(default = "default_sport")]
    pub sport: String,
    /// Bookmaker regions, comma separated
    #[serde(default = "default_regions")]
    pub regions: String,
}

/// Relative weight of each batting metric in the raw team score.
/// Must sum to exactly 1.0.
#[derive(Debug, Clone, Deserialize)]
pub struct StatWeights {
    #[serde(default = "default_woba_weight")]
    pub woba: Decimal,
    #[serde(default = "default_xwoba_weight")]
    pub xwoba: Decimal,
    #[serde(default = "default_xslg_weight")]
    pub xslg: Decimal,
    #[serde(default = "default_xba_weight")]
    pub xba: Decimal,
}

impl Default for StatWeights {
    fn default() -> Self {
        Self {
            woba: default_woba_weight(),
            xwoba: default_xwoba_weight(),
            xslg: default_xslg_weight(),
            xba: default_xba_weight(),
        }
    }
}

impl StatWeights {
    pub fn sum(&self) -> Decimal {
        self.woba + self.xwoba + self.xslg + self.xba
    }
}

/// Prediction engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub weights: StatWeights,
    /// Fraction of the opponent's raw score subtracted from a team's score
    #[serde(default = "default_adjustment_factor")]
    pub adjustment_factor: Decimal,
    /// Share of the market-implied probability in the blended estimate;
    /// the rest comes from the statistical model
    #[serde(default = "default_market_blend")]
    pub market_blend: Decimal,
    /// Steepness of the logistic mapping from score differential to
    /// model win probability
    #[serde(default = "default_logistic_scale")]
    pub logistic_scale: Decimal,
    /// Minimum EV + score-gap strength for a High confidence label
    #[serde(default = "default_high_confidence")]
    pub high_confidence: Decimal,
    /// Minimum strength for a Medium confidence label
    #[serde(default = "default_medium_confidence")]
    pub medium_confidence: Decimal,
    /// Number of picks returned by a ranking request
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: StatWeights::default(),
            adjustment_factor: default_adjustment_factor(),
            market_blend: default_market_blend(),
            logistic_scale: default_logistic_scale(),
            high_confidence: default_high_confidence(),
            medium_confidence: default_medium_confidence(),
            top_n: default_top_n(),
        }
    }
}

/// Scan loop settings
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
        }
    }
}

/// Telegram notifications and command listener
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    #[serde(default = "default_true")]
    pub notify_picks: bool,
    #[serde(default = "default_true")]
    pub notify_errors: bool,
}

fn default_stats_range() -> String {
    "Batting Stats!A1:Z40".to_string()
}

fn default_cache_minutes() -> u64 {
    15
}

fn default_odds_base_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_sport() -> String {
    "baseball_mlb".to_string()
}

fn default_regions() -> String {
    "us".to_string()
}

fn default_woba_weight() -> Decimal {
    dec!(0.30)
}

fn default_xwoba_weight() -> Decimal {
    dec!(0.30)
}

fn default_xslg_weight() -> Decimal {
    dec!(0.25)
}

fn default_xba_weight() -> Decimal {
    dec!(0.15)
}

fn default_adjustment_factor() -> Decimal {
    dec!(0.5)
}

fn default_market_blend() -> Decimal {
    dec!(0.5)
}

fn default_logistic_scale() -> Decimal {
    dec!(10)
}

fn default_high_confidence() -> Decimal {
    dec!(0.10)
}

fn default_medium_confidence() -> Decimal {
    dec!(0.04)
}

fn default_top_n() -> usize {
    5
}

fn default_scan_interval_secs() -> u64 {
    900
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file with environment overrides
    /// (prefix `MONEYLINE`, e.g. `MONEYLINE__ODDS__API_KEY`)
    pub fn load(path: &str) -> Result<Self> {
        let raw = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("MONEYLINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| BotError::Config(e.to_string()))?;

        let cfg: Config = raw
            .try_deserialize()
            .map_err(|e| BotError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range and consistency checks, run once at startup
    pub fn validate(&self) -> Result<()> {
        let e = &self.engine;

        if e.weights.sum() != Decimal::ONE {
            return Err(BotError::Config(format!(
                "Stat weights must sum to 1.0, got {}",
                e.weights.sum()
            )));
        }
        if e.adjustment_factor < Decimal::ZERO || e.adjustment_factor > Decimal::ONE {
            return Err(BotError::Config(format!(
                "adjustment_factor must be in [0, 1], got {}",
                e.adjustment_factor
            )));
        }
        if e.market_blend < Decimal::ZERO || e.market_blend > Decimal::ONE {
            return Err(BotError::Config(format!(
                "market_blend must be in [0, 1], got {}",
                e.market_blend
            )));
        }
        if e.logistic_scale <= Decimal::ZERO {
            return Err(BotError::Config(format!(
                "logistic_scale must be positive, got {}",
                e.logistic_scale
            )));
        }
        if e.medium_confidence < Decimal::ZERO || e.high_confidence < e.medium_confidence {
            return Err(BotError::Config(format!(
                "Confidence thresholds must satisfy high >= medium >= 0, got high={} medium={}",
                e.high_confidence, e.medium_confidence
            )));
        }
        if e.top_n == 0 {
            return Err(BotError::Config("top_n must be at least 1".to_string()));
        }
        if self.sheets.cache_minutes == 0 {
            return Err(BotError::Config(
                "sheets.cache_minutes must be at least 1".to_string(),
            ));
        }
        if self.bot.scan_interval_secs == 0 {
            return Err(BotError::Config(
                "bot.scan_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
