//! Pick generation pipeline
//!
//! Ties the stats source, odds source, and engine together for one ranking
//! request. A failed quotes fetch downgrades the whole slate to stats-only
//! mode; a failed stats fetch aborts, since nothing can be ranked without
//! team metrics.

use crate::client::{OddsSource, StatsSource};
use crate::engine::{score_team, PickEngine};
use crate::error::{BotError, Result};
use crate::types::{MatchupEvaluation, Pick, TeamStatRow};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

pub struct PickService {
    stats: Arc<dyn StatsSource>,
    odds: Arc<dyn OddsSource>,
    engine: PickEngine,
}

impl PickService {
    pub fn new(stats: Arc<dyn StatsSource>, odds: Arc<dyn OddsSource>, engine: PickEngine) -> Self {
        Self {
            stats,
            odds,
            engine,
        }
    }

    pub fn engine(&self) -> &PickEngine {
        &self.engine
    }

    /// Evaluate every matchup on today's slate
    pub async fn evaluate_slate(&self) -> Result<Vec<MatchupEvaluation>> {
        let stats = self.stats.get_team_stats().await?;
        let matchups = self.odds.get_events().await?;
        let ids: Vec<String> = matchups.iter().map(|m| m.matchup_id.clone()).collect();

        let quotes = match self.odds.get_quotes(&ids).await {
            Ok(quotes) => quotes,
            Err(BotError::OddsUnavailable(e)) => {
                warn!("Quotes unavailable, ranking on stats alone: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(self.engine.evaluate_slate(&matchups, &stats, &quotes))
    }

    /// The ranked top-N picks for today's slate
    pub async fn generate_picks(&self, top_n: usize) -> Result<Vec<Pick>> {
        let evaluations = self.evaluate_slate().await?;
        self.engine.rank_picks(&evaluations, top_n)
    }

    /// Teams ordered by raw statistical score, strongest first. Teams with
    /// incomplete metrics are skipped.
    pub async fn top_teams(&self, count: usize) -> Result<Vec<(TeamStatRow, Decimal)>> {
        let stats = self.stats.get_team_stats().await?;
        let weights = &self.engine.config().weights;

        let mut scored: Vec<(TeamStatRow, Decimal)> = stats
            .into_values()
            .filter_map(|row| match score_team(&row, weights) {
                Ok(score) => Some((row, score)),
                Err(e) => {
                    warn!("Skipping team in stats ranking: {}", e);
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.team_name.cmp(&b.0.team_name)));
        scored.truncate(count);
        Ok(scored)
    }

    /// Case-insensitive substring lookup of a single team's row and score
    pub async fn find_team(&self, query: &str) -> Result<Option<(TeamStatRow, Option<Decimal>)>> {
        let stats = self.stats.get_team_stats().await?;
        let needle = query.trim().to_lowercase();

        let mut matches: Vec<&TeamStatRow> = stats
            .values()
            .filter(|row| row.team_name.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.team_name.cmp(&b.team_name));

        Ok(matches.first().map(|row| {
            let score = score_team(row, &self.engine.config().weights).ok();
            ((*row).clone(), score)
        }))
    }

    /// Force the stats cache to refetch; returns the row count
    pub async fn refresh_stats(&self) -> Result<usize> {
        self.stats.refresh().await
    }
}
