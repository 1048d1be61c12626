//! Expected value arithmetic

use crate::error::{BotError, Result};
use rust_decimal::Decimal;

/// Expected profit per unit staked.
///
/// `ev = p * (d - 1) - (1 - p)`: win `d - 1` with probability `p`, lose the
/// stake otherwise. Out-of-range inputs are rejected, never clamped.
pub fn compute_ev(probability: Decimal, decimal_odds: Decimal) -> Result<Decimal> {
    if probability < Decimal::ZERO || probability > Decimal::ONE {
        return Err(BotError::InvalidInput(format!(
            "Probability must be in [0, 1], got {probability}"
        )));
    }
    if decimal_odds <= Decimal::ONE {
        return Err(BotError::InvalidInput(format!(
            "Decimal odds must be > 1.0, got {decimal_odds}"
        )));
    }
    Ok(probability * (decimal_odds - Decimal::ONE) - (Decimal::ONE - probability))
}

/// Weighted combination of market-implied and model-implied probability.
/// `market_blend` is the market's share; the model supplies the rest.
pub fn blend_probability(
    market_prob: Decimal,
    model_prob: Decimal,
    market_blend: Decimal,
) -> Decimal {
    market_blend * market_prob + (Decimal::ONE - market_blend) * model_prob
}
