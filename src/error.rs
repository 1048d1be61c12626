//! Error types for the bot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Top-level error type
#[derive(Error, Debug)]
pub enum BotError {
    /// American odds in the open interval (-100, 100) are not a valid price
    #[error("Invalid American odds: {0}")]
    InvalidOdds(i64),

    /// Malformed numeric input to the EV calculator
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required stat metric is absent or non-numeric for a team
    #[error("Missing metric {metric} for team {team}")]
    MissingMetric { team: String, metric: &'static str },

    /// No bookmaker quote available for a side of a matchup
    #[error("No quotes available for matchup {0}")]
    NoQuotesAvailable(String),

    /// Fewer valid matchups than the number of picks requested
    #[error("Insufficient data: {available} valid matchups, {requested} picks requested")]
    InsufficientData { available: usize, requested: usize },

    /// Stats source failed and no cached snapshot exists
    #[error("Stats unavailable: {0}")]
    StatsUnavailable(String),

    /// Odds source failed
    #[error("Odds unavailable: {0}")]
    OddsUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
