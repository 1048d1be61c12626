//! Statistical team scoring
//!
//! Collapses a team's advanced batting metrics into a single strength
//! score, discounts it by the opponent's strength, and maps score
//! differentials to a model win probability.

use crate::config::StatWeights;
use crate::error::{BotError, Result};
use crate::types::TeamStatRow;
use rust_decimal::{Decimal, MathematicalOps};

/// Weighted sum of the four batting metrics.
///
/// Fails when any metric is absent or was non-numeric in the source sheet;
/// the caller excludes that team from the current cycle only.
pub fn score_team(row: &TeamStatRow, weights: &StatWeights) -> Result<Decimal> {
    let woba = require(row, row.woba, "WOBA")?;
    let xwoba = require(row, row.xwoba, "XWOBA")?;
    let xslg = require(row, row.xslg, "XSLG")?;
    let xba = require(row, row.xba, "XBA")?;

    Ok(woba * weights.woba + xwoba * weights.xwoba + xslg * weights.xslg + xba * weights.xba)
}

fn require(row: &TeamStatRow, metric: Option<Decimal>, name: &'static str) -> Result<Decimal> {
    metric.ok_or_else(|| BotError::MissingMetric {
        team: row.team_name.clone(),
        metric: name,
    })
}

/// Discount a team's raw score by a fraction of the opponent's raw score.
/// Valid only for the matchup it was computed for.
pub fn adjust_for_opponent(
    raw_score: Decimal,
    opponent_raw_score: Decimal,
    adjustment_factor: Decimal,
) -> Decimal {
    raw_score - adjustment_factor * opponent_raw_score
}

/// Logistic mapping of an opponent-adjusted score differential into a win
/// probability. A differential of zero maps to exactly 0.5.
pub fn model_win_probability(score_diff: Decimal, scale: Decimal) -> Decimal {
    sigmoid(scale * score_diff)
}

// Evaluated with the exponent argument kept negative on both branches so
// the series never overflows.
fn sigmoid(x: Decimal) -> Decimal {
    if x >= Decimal::ZERO {
        let e = (-x).exp();
        Decimal::ONE / (Decimal::ONE + e)
    } else {
        let e = x.exp();
        e / (Decimal::ONE + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_row(name: &str, woba: Decimal, xwoba: Decimal, xslg: Decimal, xba: Decimal) -> TeamStatRow {
        TeamStatRow {
            team_name: name.to_string(),
            woba: Some(woba),
            xwoba: Some(xwoba),
            xslg: Some(xslg),
            xba: Some(xba),
        }
    }

    #[test]
    fn test_score_team_weighted_sum() {
        let row = full_row("Test", dec!(0.330), dec!(0.325), dec!(0.450), dec!(0.270));
        let score = score_team(&row, &StatWeights::default()).unwrap();
        // 0.330*0.30 + 0.325*0.30 + 0.450*0.25 + 0.270*0.15
        assert_eq!(score, dec!(0.3495));
    }

    #[test]
    fn test_score_team_missing_metric() {
        let mut row = full_row("Test", dec!(0.330), dec!(0.325), dec!(0.450), dec!(0.270));
        row.xslg = None;
        let err = score_team(&row, &StatWeights::default()).unwrap_err();
        match err {
            BotError::MissingMetric { team, metric } => {
                assert_eq!(team, "Test");
                assert_eq!(metric, "XSLG");
            }
            other => panic!("Unexpected error: {other}"),
        }
    }

    #[test]
    fn test_adjust_for_opponent() {
        let adjusted = adjust_for_opponent(dec!(0.35), dec!(0.30), dec!(0.5));
        assert_eq!(adjusted, dec!(0.20));
        // Zero factor leaves the raw score untouched
        assert_eq!(
            adjust_for_opponent(dec!(0.35), dec!(0.30), Decimal::ZERO),
            dec!(0.35)
        );
    }

    #[test]
    fn test_model_probability_even_matchup() {
        assert_eq!(model_win_probability(Decimal::ZERO, dec!(10)), dec!(0.5));
    }

    #[test]
    fn test_model_probability_symmetry() {
        // The two divisions round independently, so allow the last digit
        let up = model_win_probability(dec!(0.05), dec!(10));
        let down = model_win_probability(dec!(-0.05), dec!(10));
        let drift = (up + down - Decimal::ONE).abs();
        assert!(drift <= dec!(0.000000000000000000000000001), "drift {drift}");
    }

    #[test]
    fn test_model_probability_monotonic_and_bounded() {
        let scale = dec!(10);
        let mut last = Decimal::ZERO;
        for diff in [dec!(-0.5), dec!(-0.1), dec!(0), dec!(0.1), dec!(0.5)] {
            let p = model_win_probability(diff, scale);
            assert!(p > Decimal::ZERO && p < Decimal::ONE);
            assert!(p > last || diff == dec!(-0.5));
            last = p;
        }
    }
}
