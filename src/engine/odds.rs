//! American odds normalization
//!
//! Converts bookmaker moneyline prices into implied probabilities and
//! decimal payout multipliers, and selects the best available price for a
//! side across bookmakers.

use crate::error::{BotError, Result};
use crate::types::{OddsQuote, Side};
use rust_decimal::Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Implied win probability of an American price.
///
/// +150 means "win 150 on a 100 stake" and implies 100/250; -110 means
/// "stake 110 to win 100" and implies 110/210. Prices in (-100, 100) are
/// not valid American odds.
pub fn american_to_probability(odds: i64) -> Result<Decimal> {
    validate_american(odds)?;
    let prob = if odds > 0 {
        HUNDRED / (Decimal::from(odds) + HUNDRED)
    } else {
        let stake = Decimal::from(-odds);
        stake / (stake + HUNDRED)
    };
    Ok(prob)
}

/// Decimal payout multiplier of an American price; always > 1
pub fn american_to_decimal(odds: i64) -> Result<Decimal> {
    validate_american(odds)?;
    let decimal = if odds > 0 {
        Decimal::ONE + Decimal::from(odds) / HUNDRED
    } else {
        Decimal::ONE + HUNDRED / Decimal::from(-odds)
    };
    Ok(decimal)
}

// Valid American prices are exactly those with |odds| >= 100
fn validate_american(odds: i64) -> Result<()> {
    if odds > -100 && odds < 100 {
        return Err(BotError::InvalidOdds(odds));
    }
    Ok(())
}

/// Select the quote with the most favorable (highest) decimal odds for the
/// requested side. Ties go to the quote with the earliest timestamp; quotes
/// equal on both stay in first-seen order. All quotes must belong to the
/// same matchup.
pub fn best_price(quotes: &[OddsQuote], side: Side) -> Result<&OddsQuote> {
    let first = quotes
        .first()
        .ok_or_else(|| BotError::NoQuotesAvailable("<empty quote set>".to_string()))?;

    let mut best = first;
    let mut best_decimal = american_to_decimal(first.american_odds(side))?;

    for quote in &quotes[1..] {
        if quote.matchup_id != first.matchup_id {
            return Err(BotError::InvalidInput(format!(
                "Quote set mixes matchups {} and {}",
                first.matchup_id, quote.matchup_id
            )));
        }
        let decimal = american_to_decimal(quote.american_odds(side))?;
        if decimal > best_decimal
            || (decimal == best_decimal && quote.timestamp < best.timestamp)
        {
            best = quote;
            best_decimal = decimal;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn quote(bookmaker: &str, home: i64, away: i64, minute: u32) -> OddsQuote {
        OddsQuote {
            matchup_id: "game-1".to_string(),
            home_team: "New York Yankees".to_string(),
            away_team: "Boston Red Sox".to_string(),
            bookmaker: bookmaker.to_string(),
            home_american_odds: home,
            away_american_odds: away,
            timestamp: Utc.with_ymd_and_hms(2024, 7, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_positive_odds_probability() {
        assert_eq!(american_to_probability(100).unwrap(), dec!(0.5));
        assert_eq!(american_to_probability(300).unwrap(), dec!(0.25));
    }

    #[test]
    fn test_negative_odds_probability() {
        assert_eq!(american_to_probability(-100).unwrap(), dec!(0.5));
        assert_eq!(american_to_probability(-300).unwrap(), dec!(0.75));
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(american_to_decimal(150).unwrap(), dec!(2.5));
        assert_eq!(american_to_decimal(-200).unwrap(), dec!(1.5));
        assert_eq!(american_to_decimal(100).unwrap(), dec!(2));
    }

    #[test]
    fn test_invalid_odds_rejected() {
        for odds in [0, 1, -1, 50, -50, 99, -99] {
            assert!(matches!(
                american_to_probability(odds),
                Err(BotError::InvalidOdds(_))
            ));
            assert!(matches!(
                american_to_decimal(odds),
                Err(BotError::InvalidOdds(_))
            ));
        }
    }

    #[test]
    fn test_best_price_picks_highest_decimal() {
        let quotes = vec![
            quote("BookA", -110, -105, 0),
            quote("BookB", -105, -115, 1),
            quote("BookC", -120, 100, 2),
        ];
        let best_home = best_price(&quotes, Side::Home).unwrap();
        assert_eq!(best_home.bookmaker, "BookB");
        let best_away = best_price(&quotes, Side::Away).unwrap();
        assert_eq!(best_away.bookmaker, "BookC");
    }

    #[test]
    fn test_best_price_tie_earliest_timestamp() {
        // BookB posted the same price later; the earlier quote wins
        let quotes = vec![quote("BookB", -110, -110, 5), quote("BookA", -110, -110, 1)];
        let best = best_price(&quotes, Side::Home).unwrap();
        assert_eq!(best.bookmaker, "BookA");
    }

    #[test]
    fn test_best_price_empty_fails() {
        let quotes: Vec<OddsQuote> = Vec::new();
        assert!(matches!(
            best_price(&quotes, Side::Home),
            Err(BotError::NoQuotesAvailable(_))
        ));
    }

    #[test]
    fn test_best_price_rejects_mixed_matchups() {
        let mut other = quote("BookB", -110, -110, 1);
        other.matchup_id = "game-2".to_string();
        let quotes = vec![quote("BookA", -110, -110, 0), other];
        assert!(matches!(
            best_price(&quotes, Side::Home),
            Err(BotError::InvalidInput(_))
        ));
    }
}
