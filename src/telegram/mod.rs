//! Telegram bot for receiving commands
//!
//! Supports commands like /picks, /stats, /team, /refresh, /pause, /resume

use crate::error::Result;
use crate::notify::Notifier;
use crate::service::PickService;
use crate::types::TeamStatRow;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// Telegram bot for receiving commands
pub struct TelegramBot {
    http: Client,
    bot_token: String,
    chat_id: String,
    last_update_id: RwLock<i64>,
    command_tx: mpsc::Sender<BotCommand>,
}

/// Commands that can be sent to the pick loop
#[derive(Debug, Clone)]
pub enum BotCommand {
    /// Ranked EV picks
    Picks { count: Option<usize> },
    /// Top teams by raw statistical score
    Stats { count: usize },
    /// Single team lookup
    Team { query: String },
    /// Force a stats cache refresh
    Refresh,
    /// Pause the scan loop
    Pause,
    /// Resume the scan loop
    Resume,
    /// Liveness check
    Ping,
    Help,
}

/// Bot state shared with the scan loop
#[derive(Debug, Clone, Default)]
pub struct BotState {
    pub paused: bool,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    chat: TelegramChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GetUpdatesResponse {
    ok: bool,
    result: Vec<TelegramUpdate>,
}

impl TelegramBot {
    pub fn new(bot_token: String, chat_id: String, command_tx: mpsc::Sender<BotCommand>) -> Self {
        Self {
            http: Client::new(),
            bot_token,
            chat_id,
            last_update_id: RwLock::new(0),
            command_tx,
        }
    }

    /// Start polling for updates
    pub async fn start_polling(self: Arc<Self>) {
        tracing::info!("Starting Telegram command listener...");

        loop {
            match self.poll_updates().await {
                Ok(updates) => {
                    for update in updates {
                        if let Some(msg) = update.message {
                            // Only process messages from the authorized chat
                            if msg.chat.id.to_string() == self.chat_id {
                                if let Some(text) = msg.text {
                                    self.handle_message(&text).await;
                                }
                            }
                        }

                        let mut last_id = self.last_update_id.write().await;
                        *last_id = update.update_id + 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to poll Telegram updates: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                }
            }

            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
        }
    }

    async fn poll_updates(&self) -> Result<Vec<TelegramUpdate>> {
        let last_id = *self.last_update_id.read().await;

        let url = format!(
            "https://api.telegram.org/bot{}/getUpdates?offset={}&timeout=30",
            self.bot_token, last_id
        );

        let response: GetUpdatesResponse = self.http.get(&url).send().await?.json().await?;
        Ok(response.result)
    }

    async fn handle_message(&self, text: &str) {
        let Some((cmd, args)) = parse_command(text) else {
            return; // Ignore non-commands
        };

        tracing::info!("Received command: /{} {}", cmd, args);

        let command = match cmd.as_str() {
            "start" | "help" => BotCommand::Help,
            "ping" => BotCommand::Ping,
            "picks" => BotCommand::Picks {
                count: args.parse().ok(),
            },
            "stats" => BotCommand::Stats {
                count: args.parse().unwrap_or(5),
            },
            "team" => {
                if args.is_empty() {
                    self.reply("❌ Usage: /team <name>").await;
                    return;
                }
                BotCommand::Team {
                    query: args.to_string(),
                }
            }
            "refresh" => BotCommand::Refresh,
            "pause" => BotCommand::Pause,
            "resume" => BotCommand::Resume,
            _ => {
                self.reply(&format!(
                    "❓ Unknown command: /{cmd}\nUse /help for available commands"
                ))
                .await;
                return;
            }
        };
        let _ = self.command_tx.send(command).await;
    }

    async fn reply(&self, text: &str) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        if let Err(e) = self.http.post(&url).json(&body).send().await {
            tracing::error!("Failed to send Telegram reply: {}", e);
        }
    }
}

/// Split a `/command args` message; returns `None` for ordinary messages.
/// A trailing `@botname` on the command is stripped.
fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;
    let (cmd, args) = rest.split_once(' ').unwrap_or((rest, ""));
    let cmd = cmd.split('@').next().unwrap_or(cmd);
    Some((cmd.to_lowercase(), args.trim().to_string()))
}

/// Processes commands coming from Telegram
pub struct CommandHandler {
    pub state: Arc<RwLock<BotState>>,
    notifier: Notifier,
    service: Arc<PickService>,
}

impl CommandHandler {
    pub fn new(notifier: Notifier, service: Arc<PickService>) -> Self {
        Self {
            state: Arc::new(RwLock::new(BotState::default())),
            notifier,
            service,
        }
    }

    pub async fn handle(&self, cmd: BotCommand) {
        match cmd {
            BotCommand::Picks { count } => self.send_picks(count).await,
            BotCommand::Stats { count } => self.send_stats(count).await,
            BotCommand::Team { query } => self.send_team(&query).await,
            BotCommand::Refresh => self.do_refresh().await,
            BotCommand::Pause => {
                self.state.write().await.paused = true;
                let _ = self.notifier.send("⏸ Scanning paused").await;
            }
            BotCommand::Resume => {
                self.state.write().await.paused = false;
                let _ = self.notifier.send("▶️ Scanning resumed").await;
            }
            BotCommand::Ping => {
                let _ = self.notifier.send("🏓 Pong! Bot is online.").await;
            }
            BotCommand::Help => self.send_help().await,
        }
    }

    pub async fn is_paused(&self) -> bool {
        self.state.read().await.paused
    }

    async fn send_picks(&self, count: Option<usize>) {
        let top_n = count.unwrap_or(self.service.engine().config().top_n);
        match self.service.generate_picks(top_n).await {
            Ok(picks) => {
                let _ = self.notifier.picks_report(&picks).await;
            }
            Err(e) => {
                let _ = self.notifier.error("Picks", &e.to_string()).await;
            }
        }
    }

    async fn send_stats(&self, count: usize) {
        match self.service.top_teams(count).await {
            Ok(teams) => {
                let mut text = format!("📊 <b>Top {} Teams by Score</b>\n\n", teams.len());
                for (i, (row, score)) in teams.iter().enumerate() {
                    text.push_str(&format!(
                        "{}. <b>{}</b> <code>{:.4}</code>\n",
                        i + 1,
                        row.team_name,
                        score
                    ));
                }
                let _ = self.notifier.send(&text).await;
            }
            Err(e) => {
                let _ = self.notifier.error("Stats fetch", &e.to_string()).await;
            }
        }
    }

    async fn send_team(&self, query: &str) {
        match self.service.find_team(query).await {
            Ok(Some((row, score))) => {
                let _ = self.notifier.send(&format_team_html(&row, score)).await;
            }
            Ok(None) => {
                let _ = self
                    .notifier
                    .send(&format!("❌ No team found matching '{query}'"))
                    .await;
            }
            Err(e) => {
                let _ = self.notifier.error("Team lookup", &e.to_string()).await;
            }
        }
    }

    async fn do_refresh(&self) {
        match self.service.refresh_stats().await {
            Ok(count) => {
                let _ = self
                    .notifier
                    .send(&format!("✅ Data refreshed, {count} teams loaded"))
                    .await;
            }
            Err(e) => {
                let _ = self.notifier.error("Refresh", &e.to_string()).await;
            }
        }
    }

    async fn send_help(&self) {
        let help_text = "⚾ <b>Moneyline Bot Commands</b>\n\n\
            /picks [n] - Top n EV picks (default from config)\n\
            /stats [n] - Top n teams by statistical score\n\
            /team &lt;name&gt; - Single team stats and rating\n\
            /refresh - Force a stats refresh\n\
            /pause - Pause the scan loop\n\
            /resume - Resume the scan loop\n\
            /ping - Liveness check\n\
            /help - Show this message";

        let _ = self.notifier.send(help_text).await;
    }
}

fn metric(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn format_team_html(row: &TeamStatRow, score: Option<Decimal>) -> String {
    let mut text = format!("📊 <b>{}</b>\n\n", row.team_name);
    text.push_str(&format!("• WOBA: {}\n", metric(row.woba)));
    text.push_str(&format!("• XWOBA: {}\n", metric(row.xwoba)));
    text.push_str(&format!("• XSLG: {}\n", metric(row.xslg)));
    text.push_str(&format!("• XBA: {}\n", metric(row.xba)));
    match score {
        Some(score) => text.push_str(&format!("\n🎯 Composite score: <code>{score:.4}</code>")),
        None => text.push_str("\n⚠️ Incomplete metrics, excluded from rankings"),
    }
    text
}
