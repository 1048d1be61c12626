//! External data source clients
//!
//! Two read-only adapters feed the engine: a Google Sheets client for
//! per-team advanced stats and a The Odds API client for the schedule and
//! bookmaker quotes. Both are consumed through source traits so the pick
//! pipeline can be tested without a network.

mod odds_api;
mod sheets;

pub use odds_api::OddsApiClient;
pub use sheets::SheetsClient;

use crate::error::Result;
use crate::types::{Matchup, OddsQuote, TeamStatRow};
use async_trait::async_trait;
use std::collections::HashMap;

/// Per-team stat rows, keyed by normalized lowercase team name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Current stat rows, fresh within the adapter's cache window
    async fn get_team_stats(&self) -> Result<HashMap<String, TeamStatRow>>;

    /// Force a refetch; returns the number of rows loaded
    async fn refresh(&self) -> Result<usize>;
}

/// Matchup schedule and bookmaker quotes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsSource: Send + Sync {
    async fn get_events(&self) -> Result<Vec<Matchup>>;

    /// All available quotes for the given matchups, one per bookmaker per
    /// matchup. An empty `matchup_ids` means no filtering.
    async fn get_quotes(&self, matchup_ids: &[String]) -> Result<Vec<OddsQuote>>;
}

/// Canonical team name for joining sheet rows with the odds feed.
/// The odds feed occasionally abbreviates city names.
pub fn normalize_team_name(name: &str) -> String {
    let trimmed = name.trim();
    match trimmed {
        "LA Angels" => "Los Angeles Angels",
        "LA Dodgers" => "Los Angeles Dodgers",
        "NY Yankees" => "New York Yankees",
        "NY Mets" => "New York Mets",
        "SF Giants" => "San Francisco Giants",
        "CHI White Sox" => "Chicago White Sox",
        "CHI Cubs" => "Chicago Cubs",
        other => other,
    }
    .to_string()
}

/// Lookup key used for stat maps
pub fn team_key(name: &str) -> String {
    normalize_team_name(name).to_lowercase()
}
