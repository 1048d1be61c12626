//! Prediction & odds fusion engine
//!
//! Turns per-team stat rows and bookmaker quotes into a ranked list of
//! betting picks. The engine is purely functional per invocation: it holds
//! only its configuration, performs no I/O, and produces identical output
//! for identical input.

pub mod ev;
pub mod odds;
pub mod scoring;


pub use ev::{blend_probability, compute_ev};
pub use odds::{american_to_decimal, american_to_probability, best_price};
pub use scoring::{adjust_for_opponent, model_win_probability, score_team};

use crate::config::EngineConfig;
use crate::error::{BotError, Result};
use crate::types::{Confidence, Matchup, MatchupEvaluation, OddsQuote, Pick, Side, TeamScore, TeamStatRow};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub struct PickEngine {
    config: EngineConfig,
}

impl PickEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a single matchup: score both teams, normalize the best
    /// available prices, and compute EV for both sides.
    ///
    /// With an empty quote set the matchup is evaluated in stats-only mode:
    /// all odds-derived fields are `None` and confidence comes from the
    /// score differential alone.
    pub fn evaluate_matchup(
        &self,
        matchup: &Matchup,
        home_row: &TeamStatRow,
        away_row: &TeamStatRow,
        quotes: &[OddsQuote],
    ) -> Result<MatchupEvaluation> {
        let weights = &self.config.weights;
        let home_raw = score_team(home_row, weights)?;
        let away_raw = score_team(away_row, weights)?;

        let factor = self.config.adjustment_factor;
        let home_adjusted = adjust_for_opponent(home_raw, away_raw, factor);
        let away_adjusted = adjust_for_opponent(away_raw, home_raw, factor);
        let score_gap = (home_adjusted - away_adjusted).abs();

        let home_score = TeamScore {
            team_name: matchup.home_team.clone(),
            raw_score: home_raw,
            opponent_adjusted_score: home_adjusted,
        };
        let away_score = TeamScore {
            team_name: matchup.away_team.clone(),
            raw_score: away_raw,
            opponent_adjusted_score: away_adjusted,
        };

        if quotes.is_empty() {
            return Ok(MatchupEvaluation {
                matchup_id: matchup.matchup_id.clone(),
                home_team: matchup.home_team.clone(),
                away_team: matchup.away_team.clone(),
                home_score,
                away_score,
                implied_home_prob: None,
                implied_away_prob: None,
                best_home_decimal_odds: None,
                best_away_decimal_odds: None,
                best_home_bookmaker: None,
                best_away_bookmaker: None,
                home_ev: None,
                away_ev: None,
                confidence_label: self.label_for(None, score_gap),
            });
        }

        let model_home = model_win_probability(
            home_adjusted - away_adjusted,
            self.config.logistic_scale,
        );
        let model_away = Decimal::ONE - model_home;

        let best_home = best_price(quotes, Side::Home)?;
        let best_away = best_price(quotes, Side::Away)?;

        let implied_home = american_to_probability(best_home.home_american_odds)?;
        let implied_away = american_to_probability(best_away.away_american_odds)?;
        let home_decimal = american_to_decimal(best_home.home_american_odds)?;
        let away_decimal = american_to_decimal(best_away.away_american_odds)?;

        let blend = self.config.market_blend;
        let home_prob = blend_probability(implied_home, model_home, blend);
        let away_prob = blend_probability(implied_away, model_away, blend);

        let home_ev = compute_ev(home_prob, home_decimal)?;
        let away_ev = compute_ev(away_prob, away_decimal)?;

        Ok(MatchupEvaluation {
            matchup_id: matchup.matchup_id.clone(),
            home_team: matchup.home_team.clone(),
            away_team: matchup.away_team.clone(),
            home_score,
            away_score,
            implied_home_prob: Some(implied_home),
            implied_away_prob: Some(implied_away),
            best_home_decimal_odds: Some(home_decimal),
            best_away_decimal_odds: Some(away_decimal),
            best_home_bookmaker: Some(best_home.bookmaker.clone()),
            best_away_bookmaker: Some(best_away.bookmaker.clone()),
            home_ev: Some(home_ev),
            away_ev: Some(away_ev),
            confidence_label: self.label_for(Some(home_ev.max(away_ev)), score_gap),
        })
    }

    /// Evaluate every matchup on the slate, degrading per-matchup failures
    /// instead of aborting: teams with incomplete stats drop that matchup
    /// from the cycle, matchups with no usable quotes fall back to
    /// stats-only mode.
    pub fn evaluate_slate(
        &self,
        matchups: &[Matchup],
        stats: &HashMap<String, TeamStatRow>,
        quotes: &[OddsQuote],
    ) -> Vec<MatchupEvaluation> {
        let mut by_matchup: HashMap<&str, Vec<OddsQuote>> = HashMap::new();
        for quote in quotes {
            by_matchup
                .entry(quote.matchup_id.as_str())
                .or_default()
                .push(quote.clone());
        }

        let mut evaluations = Vec::with_capacity(matchups.len());
        for matchup in matchups {
            let (Some(home_row), Some(away_row)) = (
                stats.get(&matchup.home_team.to_lowercase()),
                stats.get(&matchup.away_team.to_lowercase()),
            ) else {
                tracing::warn!(
                    "No stat rows for {} @ {}, excluding matchup",
                    matchup.away_team,
                    matchup.home_team
                );
                continue;
            };

            let matchup_quotes = by_matchup
                .get(matchup.matchup_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            match self.evaluate_matchup(matchup, home_row, away_row, matchup_quotes) {
                Ok(eval) => evaluations.push(eval),
                Err(BotError::MissingMetric { team, metric }) => {
                    tracing::warn!(
                        "Excluding {} @ {}: {} missing {}",
                        matchup.away_team,
                        matchup.home_team,
                        team,
                        metric
                    );
                }
                Err(e) => {
                    // Bad or absent prices degrade to stats-only, which can
                    // only fail on metrics already validated above
                    tracing::warn!(
                        "Quotes unusable for {} @ {} ({}), falling back to stats-only",
                        matchup.away_team,
                        matchup.home_team,
                        e
                    );
                    if let Ok(eval) = self.evaluate_matchup(matchup, home_row, away_row, &[]) {
                        evaluations.push(eval);
                    }
                }
            }
        }
        evaluations
    }

    /// Rank the better-EV side of each evaluated matchup and return the top
    /// `top_n` picks.
    ///
    /// Order: EV descending with stats-only picks after all priced picks,
    /// then opponent-adjusted score descending, then team name, then
    /// matchup id. Fails with `InsufficientData` rather than padding when
    /// fewer valid matchups exist than picks requested.
    pub fn rank_picks(
        &self,
        evaluations: &[MatchupEvaluation],
        top_n: usize,
    ) -> Result<Vec<Pick>> {
        if evaluations.len() < top_n {
            return Err(BotError::InsufficientData {
                available: evaluations.len(),
                requested: top_n,
            });
        }

        let mut picks: Vec<Pick> = evaluations
            .iter()
            .map(|eval| self.pick_side(eval))
            .collect();

        picks.sort_by(|a, b| {
            b.ev.cmp(&a.ev)
                .then_with(|| b.supporting_score.cmp(&a.supporting_score))
                .then_with(|| a.team_name.cmp(&b.team_name))
                .then_with(|| a.matchup_id.cmp(&b.matchup_id))
        });
        picks.truncate(top_n);

        for (i, pick) in picks.iter_mut().enumerate() {
            pick.rank = i + 1;
        }
        Ok(picks)
    }

    /// Confidence rating for an evaluated matchup, monotonic in the
    /// combined EV and score-gap strength.
    pub fn confidence_label(&self, evaluation: &MatchupEvaluation) -> Confidence {
        let best_ev = match (evaluation.home_ev, evaluation.away_ev) {
            (Some(h), Some(a)) => Some(h.max(a)),
            _ => None,
        };
        let gap = (evaluation.home_score.opponent_adjusted_score
            - evaluation.away_score.opponent_adjusted_score)
            .abs();
        self.label_for(best_ev, gap)
    }

    // Strength is the score gap plus any positive EV; negative EV adds
    // nothing rather than subtracting, so a lopsided matchup with a bad
    // price still rates on its stats.
    fn label_for(&self, best_ev: Option<Decimal>, score_gap: Decimal) -> Confidence {
        let strength = score_gap + best_ev.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
        if strength >= self.config.high_confidence {
            Confidence::High
        } else if strength >= self.config.medium_confidence {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Choose the recommended side of one evaluation: higher EV, falling
    /// back to the higher opponent-adjusted score in stats-only mode.
    fn pick_side(&self, eval: &MatchupEvaluation) -> Pick {
        let side = match (eval.home_ev, eval.away_ev) {
            (Some(home_ev), Some(away_ev)) => {
                if home_ev > away_ev {
                    Side::Home
                } else if away_ev > home_ev {
                    Side::Away
                } else {
                    self.side_by_score(eval)
                }
            }
            _ => self.side_by_score(eval),
        };

        let (bookmaker, decimal_odds) = match side {
            Side::Home => (
                eval.best_home_bookmaker.clone(),
                eval.best_home_decimal_odds,
            ),
            Side::Away => (
                eval.best_away_bookmaker.clone(),
                eval.best_away_decimal_odds,
            ),
        };

        Pick {
            rank: 0,
            matchup_id: eval.matchup_id.clone(),
            recommended_side: side,
            team_name: eval.team_name(side).to_string(),
            opponent_name: eval.team_name(side.opposite()).to_string(),
            ev: eval.ev(side),
            confidence_label: eval.confidence_label,
            supporting_score: eval.score(side).opponent_adjusted_score,
            bookmaker,
            decimal_odds,
        }
    }

    fn side_by_score(&self, eval: &MatchupEvaluation) -> Side {
        let home = &eval.home_score.opponent_adjusted_score;
        let away = &eval.away_score.opponent_adjusted_score;
        if home > away {
            Side::Home
        } else if away > home {
            Side::Away
        } else if eval.home_team <= eval.away_team {
            Side::Home
        } else {
            Side::Away
        }
    }
}
