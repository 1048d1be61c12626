//! Telegram notifications
//!
//! Thin wrapper over the Bot API `sendMessage` endpoint, plus the HTML
//! formatting for pick reports. Constructed disabled when Telegram is not
//! configured, in which case every send is a no-op.

use crate::error::Result;
use crate::types::{Confidence, Pick};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone)]
pub struct Notifier {
    http: Client,
    bot_token: String,
    chat_id: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    parse_mode: String,
}

impl Notifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            chat_id,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            http: Client::new(),
            bot_token: String::new(),
            chat_id: String::new(),
            enabled: false,
        }
    }

    /// Send an HTML-formatted message
    pub async fn send(&self, text: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let request = SendMessageRequest {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: "HTML".to_string(),
        };

        self.http.post(&url).json(&request).send().await?.error_for_status()?;
        Ok(())
    }

    pub async fn startup(&self) -> Result<()> {
        self.send("⚾ <b>Moneyline bot started</b>\n\nUse /help for commands.")
            .await
    }

    pub async fn error(&self, context: &str, message: &str) -> Result<()> {
        self.send(&format!("❌ <b>{context}</b>\n\n<code>{message}</code>"))
            .await
    }

    pub async fn picks_report(&self, picks: &[Pick]) -> Result<()> {
        self.send(&format_picks_html(picks)).await
    }
}

fn confidence_emoji(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "🟢",
        Confidence::Medium => "🟡",
        Confidence::Low => "🔴",
    }
}

/// Render a ranked pick list for Telegram (HTML parse mode)
pub fn format_picks_html(picks: &[Pick]) -> String {
    if picks.is_empty() {
        return "📭 No picks available right now.".to_string();
    }

    let mut text = format!("🏆 <b>Top {} EV Picks</b>\n\n", picks.len());
    for pick in picks {
        text.push_str(&format!(
            "{}. <b>{}</b> vs {}\n",
            pick.rank, pick.team_name, pick.opponent_name
        ));
        match (pick.ev, pick.decimal_odds, &pick.bookmaker) {
            (Some(ev), Some(odds), Some(book)) => {
                text.push_str(&format!(
                    "   EV: <code>{:+.2}%</code> @ {:.2} ({})\n",
                    ev * Decimal::ONE_HUNDRED,
                    odds,
                    book
                ));
            }
            _ => {
                text.push_str("   EV: n/a (no live odds, stats only)\n");
            }
        }
        text.push_str(&format!(
            "   {} {} confidence | score {:.4}\n\n",
            confidence_emoji(pick.confidence_label),
            pick.confidence_label,
            pick.supporting_score
        ));
    }
    text.push_str("⚠️ <i>For informational purposes only. Bet responsibly.</i>");
    text
}
