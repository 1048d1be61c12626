//! The Odds API client
//!
//! Fetches the MLB schedule and head-to-head moneyline prices across US
//! bookmakers, in American format.

use super::{normalize_team_name, OddsSource};
use crate::config::OddsConfig;
use crate::error::{BotError, Result};
use crate::types::{Matchup, OddsQuote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const H2H_MARKET: &str = "h2h";

pub struct OddsApiClient {
    http: Client,
    config: OddsConfig,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    id: String,
    commence_time: DateTime<Utc>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiBookmaker {
    title: String,
    last_update: DateTime<Utc>,
    #[serde(default)]
    markets: Vec<ApiMarket>,
}

#[derive(Debug, Deserialize)]
struct ApiMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<ApiOutcome>,
}

#[derive(Debug, Deserialize)]
struct ApiOutcome {
    name: String,
    price: i64,
}

impl OddsApiClient {
    pub fn new(config: OddsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    async fn fetch_events(&self, with_odds: bool) -> Result<Vec<ApiEvent>> {
        let endpoint = if with_odds { "odds" } else { "events" };
        let url = format!(
            "{}/sports/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.sport,
            endpoint
        );

        let mut query: Vec<(&str, &str)> = vec![
            ("apiKey", self.config.api_key.as_str()),
            ("dateFormat", "iso"),
        ];
        if with_odds {
            query.push(("regions", self.config.regions.as_str()));
            query.push(("markets", H2H_MARKET));
            query.push(("oddsFormat", "american"));
        }

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| BotError::OddsUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(BotError::OddsUnavailable(format!(
                "Odds API returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| BotError::OddsUnavailable(e.to_string()))
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn get_events(&self) -> Result<Vec<Matchup>> {
        let events = self.fetch_events(false).await?;
        info!("Fetched {} scheduled games", events.len());
        Ok(events.into_iter().map(matchup_from_event).collect())
    }

    async fn get_quotes(&self, matchup_ids: &[String]) -> Result<Vec<OddsQuote>> {
        let events = self.fetch_events(true).await?;
        let quotes = quotes_from_events(&events, matchup_ids);
        info!("Collected {} bookmaker quotes", quotes.len());
        Ok(quotes)
    }
}

fn matchup_from_event(event: ApiEvent) -> Matchup {
    Matchup {
        matchup_id: event.id,
        home_team: normalize_team_name(&event.home_team),
        away_team: normalize_team_name(&event.away_team),
        commence_time: event.commence_time,
    }
}

/// One quote per bookmaker per matchup. Bookmakers missing a price for
/// either side are skipped rather than half-quoted.
fn quotes_from_events(events: &[ApiEvent], matchup_ids: &[String]) -> Vec<OddsQuote> {
    let mut quotes = Vec::new();
    for event in events {
        if !matchup_ids.is_empty() && !matchup_ids.contains(&event.id) {
            continue;
        }
        let home = normalize_team_name(&event.home_team);
        let away = normalize_team_name(&event.away_team);

        for bookmaker in &event.bookmakers {
            let Some(market) = bookmaker.markets.iter().find(|m| m.key == H2H_MARKET)
            else {
                continue;
            };
            let price_for = |team: &str| {
                market
                    .outcomes
                    .iter()
                    .find(|o| normalize_team_name(&o.name) == team)
                    .map(|o| o.price)
            };
            let (Some(home_price), Some(away_price)) = (price_for(&home), price_for(&away))
            else {
                continue;
            };

            quotes.push(OddsQuote {
                matchup_id: event.id.clone(),
                home_team: home.clone(),
                away_team: away.clone(),
                bookmaker: bookmaker.title.clone(),
                home_american_odds: home_price,
                away_american_odds: away_price,
                timestamp: bookmaker.last_update,
            });
        }
    }
    quotes
}
