//! Google Sheets client for team stats
//!
//! Reads the advanced batting stats table through the Sheets API v4
//! `values` endpoint and caches the parsed rows behind a TTL snapshot.

use super::{team_key, StatsSource};
use crate::cache::TtlCache;
use crate::config::SheetsConfig;
use crate::error::{BotError, Result};
use crate::types::TeamStatRow;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub struct SheetsClient {
    http: Client,
    config: SheetsConfig,
    cache: TtlCache<HashMap<String, TeamStatRow>>,
}

/// Response of the `values` endpoint; every cell arrives as a string
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let cache = TtlCache::new(Duration::from_secs(config.cache_minutes * 60));

        Ok(Self {
            http,
            config,
            cache,
        })
    }

    async fn fetch_rows(&self) -> Result<HashMap<String, TeamStatRow>> {
        // The range is a path segment; spaces in worksheet names must be
        // percent-encoded, the rest of the A1 notation is path-safe
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_BASE_URL,
            self.config.spreadsheet_id,
            self.config.stats_range.replace(' ', "%20"),
        );

        let resp = self
            .http
            .get(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| BotError::StatsUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(BotError::StatsUnavailable(format!(
                "Sheets API returned {}",
                resp.status()
            )));
        }

        let range: ValueRange = resp
            .json()
            .await
            .map_err(|e| BotError::StatsUnavailable(e.to_string()))?;

        let rows = parse_values(&range.values)?;
        info!("Fetched {} team stat rows from sheet", rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl StatsSource for SheetsClient {
    async fn get_team_stats(&self) -> Result<HashMap<String, TeamStatRow>> {
        self.cache.get_or_refresh(|| self.fetch_rows()).await
    }

    async fn refresh(&self) -> Result<usize> {
        self.cache.invalidate();
        let rows = self.cache.get_or_refresh(|| self.fetch_rows()).await?;
        Ok(rows.len())
    }
}

/// Parse the raw cell grid into stat rows, keyed by normalized team name.
///
/// The first row is the header; columns are matched case-insensitively and
/// both `Team` and `Teams` are accepted. Cells that fail to parse as a
/// number become `None` so the engine can decide exclusion per cycle.
fn parse_values(values: &[Vec<String>]) -> Result<HashMap<String, TeamStatRow>> {
    let header = values
        .first()
        .ok_or_else(|| BotError::StatsUnavailable("Sheet returned no rows".to_string()))?;

    let col = |name: &str| -> Option<usize> {
        header.iter().position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let team_col = col("team")
        .or_else(|| col("teams"))
        .ok_or_else(|| BotError::StatsUnavailable("No Team column in sheet".to_string()))?;
    let woba_col = col("woba");
    let xwoba_col = col("xwoba");
    let xslg_col = col("xslg");
    let xba_col = col("xba");

    let cell = |row: &Vec<String>, idx: Option<usize>| -> Option<Decimal> {
        idx.and_then(|i| row.get(i))
            .and_then(|s| Decimal::from_str(s.trim()).ok())
    };

    let mut rows = HashMap::new();
    for row in &values[1..] {
        let Some(name) = row.get(team_col).map(|s| s.trim()).filter(|s| !s.is_empty())
        else {
            continue;
        };

        let stat_row = TeamStatRow {
            team_name: name.to_string(),
            woba: cell(row, woba_col),
            xwoba: cell(row, xwoba_col),
            xslg: cell(row, xslg_col),
            xba: cell(row, xba_col),
        };
        debug!("Parsed stat row for {}", stat_row.team_name);
        // First occurrence of a team wins, matching the sheet merge rule
        rows.entry(team_key(name)).or_insert(stat_row);
    }

    if rows.is_empty() {
        return Err(BotError::StatsUnavailable(
            "Sheet contained no team rows".to_string(),
        ));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_basic_table() {
        let values = grid(&[
            &["Team", "WOBA", "XWOBA", "XSLG", "XBA"],
            &["New York Yankees", "0.335", "0.332", "0.465", "0.258"],
            &["Boston Red Sox", "0.320", "0.318", "0.435", "0.260"],
        ]);
        let rows = parse_values(&values).unwrap();
        assert_eq!(rows.len(), 2);

        let yankees = &rows["new york yankees"];
        assert_eq!(yankees.team_name, "New York Yankees");
        assert_eq!(yankees.woba, Some(dec!(0.335)));
        assert_eq!(yankees.xba, Some(dec!(0.258)));
    }

    #[test]
    fn test_parse_accepts_teams_header_and_any_case() {
        let values = grid(&[
            &["Teams", "woba", "xWOBA", "xSLG", "xBA"],
            &["Houston Astros", "0.330", "0.328", "0.445", "0.262"],
        ]);
        let rows = parse_values(&values).unwrap();
        assert_eq!(rows["houston astros"].xwoba, Some(dec!(0.328)));
    }

    #[test]
    fn test_parse_non_numeric_cell_becomes_none() {
        let values = grid(&[
            &["Team", "WOBA", "XWOBA", "XSLG", "XBA"],
            &["Miami Marlins", "N/A", "0.298", "", "0.242"],
        ]);
        let rows = parse_values(&values).unwrap();
        let marlins = &rows["miami marlins"];
        assert_eq!(marlins.woba, None);
        assert_eq!(marlins.xslg, None);
        assert_eq!(marlins.xwoba, Some(dec!(0.298)));
    }

    #[test]
    fn test_parse_skips_blank_team_cells_and_dedups() {
        let values = grid(&[
            &["Team", "WOBA", "XWOBA", "XSLG", "XBA"],
            &["", "0.1", "0.1", "0.1", "0.1"],
            &["Texas Rangers", "0.320", "0.318", "0.430", "0.255"],
            &["Texas Rangers", "0.999", "0.999", "0.999", "0.999"],
        ]);
        let rows = parse_values(&values).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows["texas rangers"].woba, Some(dec!(0.320)));
    }

    #[test]
    fn test_parse_missing_team_column_fails() {
        let values = grid(&[
            &["Club", "WOBA"],
            &["Texas Rangers", "0.320"],
        ]);
        assert!(matches!(
            parse_values(&values),
            Err(BotError::StatsUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_empty_sheet_fails() {
        assert!(parse_values(&[]).is_err());
        let header_only = grid(&[&["Team", "WOBA", "XWOBA", "XSLG", "XBA"]]);
        assert!(parse_values(&header_only).is_err());
    }
}
