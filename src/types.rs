//! Core domain types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a matchup a quote or pick refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Coarse confidence rating attached to a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// One team's advanced batting metrics, as fetched from the stats sheet.
///
/// Cells that were empty or non-numeric in the sheet arrive as `None`;
/// the engine decides whether that excludes the team from a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStatRow {
    pub team_name: String,
    /// Weighted on-base average
    pub woba: Option<Decimal>,
    /// Expected weighted on-base average
    pub xwoba: Option<Decimal>,
    /// Expected slugging percentage
    pub xslg: Option<Decimal>,
    /// Expected batting average
    pub xba: Option<Decimal>,
}

/// A scheduled game between two teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub matchup_id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
}

/// A single bookmaker's moneyline prices for one matchup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsQuote {
    pub matchup_id: String,
    pub home_team: String,
    pub away_team: String,
    /// Bookmaker display name
    pub bookmaker: String,
    /// American odds for the home side (e.g. -110)
    pub home_american_odds: i64,
    /// American odds for the away side (e.g. +150)
    pub away_american_odds: i64,
    /// When the bookmaker last updated this price
    pub timestamp: DateTime<Utc>,
}

impl OddsQuote {
    pub fn american_odds(&self, side: Side) -> i64 {
        match side {
            Side::Home => self.home_american_odds,
            Side::Away => self.away_american_odds,
        }
    }
}

/// A team's strength score within one matchup.
///
/// `opponent_adjusted_score` is only meaningful against the specific
/// opponent it was computed for and is recomputed every ranking request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamScore {
    pub team_name: String,
    pub raw_score: Decimal,
    pub opponent_adjusted_score: Decimal,
}

/// Full evaluation of one matchup for one ranking request.
///
/// Odds-derived fields are `None` when the matchup ran in stats-only mode
/// (no usable quotes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupEvaluation {
    pub matchup_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: TeamScore,
    pub away_score: TeamScore,
    pub implied_home_prob: Option<Decimal>,
    pub implied_away_prob: Option<Decimal>,
    pub best_home_decimal_odds: Option<Decimal>,
    pub best_away_decimal_odds: Option<Decimal>,
    pub best_home_bookmaker: Option<String>,
    pub best_away_bookmaker: Option<String>,
    pub home_ev: Option<Decimal>,
    pub away_ev: Option<Decimal>,
    pub confidence_label: Confidence,
}

impl MatchupEvaluation {
    pub fn ev(&self, side: Side) -> Option<Decimal> {
        match side {
            Side::Home => self.home_ev,
            Side::Away => self.away_ev,
        }
    }

    pub fn score(&self, side: Side) -> &TeamScore {
        match side {
            Side::Home => &self.home_score,
            Side::Away => &self.away_score,
        }
    }

    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    /// True when the matchup was evaluated without any usable quotes
    pub fn is_stats_only(&self) -> bool {
        self.home_ev.is_none() && self.away_ev.is_none()
    }
}

/// One ranked betting recommendation, rank 1 = best
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub rank: usize,
    pub matchup_id: String,
    pub recommended_side: Side,
    pub team_name: String,
    pub opponent_name: String,
    /// EV per unit staked; `None` in stats-only mode
    pub ev: Option<Decimal>,
    pub confidence_label: Confidence,
    /// Opponent-adjusted score backing the recommendation
    pub supporting_score: Decimal,
    pub bookmaker: Option<String>,
    pub decimal_odds: Option<Decimal>,
}
