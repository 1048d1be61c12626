//! MLB Expected-Value Betting Picks Bot
//!
//! Fuses advanced batting stats with live bookmaker odds into ranked picks.

use clap::{Parser, Subcommand};
use moneyline_bot::{
    client::{OddsApiClient, SheetsClient},
    config::Config,
    engine::PickEngine,
    notify::Notifier,
    service::PickService,
    telegram::{BotCommand, CommandHandler, TelegramBot},
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "moneyline-bot")]
#[command(about = "EV-ranked MLB betting picks from advanced stats and live odds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot: periodic scans plus Telegram commands
    Run,
    /// Print today's ranked picks
    Picks {
        /// Number of picks (defaults to the configured top_n)
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Print top teams by statistical score
    Stats {
        /// Number of teams to show
        #[arg(short, long, default_value = "5")]
        count: usize,
    },
    /// Look up one team's metrics and score
    Team {
        /// Team name, full or partial
        name: String,
    },
    /// Test Telegram notification
    TestNotify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run => run_bot(config).await,
        Commands::Picks { count } => show_picks(config, count).await,
        Commands::Stats { count } => show_stats(config, count).await,
        Commands::Team { name } => show_team(config, &name).await,
        Commands::TestNotify => test_notify(config).await,
    }
}

fn build_service(config: &Config) -> anyhow::Result<Arc<PickService>> {
    let sheets = SheetsClient::new(config.sheets.clone())?;
    let odds = OddsApiClient::new(config.odds.clone())?;
    let engine = PickEngine::new(config.engine.clone());
    Ok(Arc::new(PickService::new(
        Arc::new(sheets),
        Arc::new(odds),
        engine,
    )))
}

async fn run_bot(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting moneyline bot");

    // Initialize Telegram notifier
    let notifier = if let Some(tg) = &config.telegram {
        Notifier::new(tg.bot_token.clone(), tg.chat_id.clone())
    } else {
        tracing::warn!("Telegram not configured, notifications disabled");
        Notifier::disabled()
    };

    if let Err(e) = notifier.startup().await {
        tracing::warn!("Failed to send startup notification: {}", e);
    }

    let service = build_service(&config)?;
    let cmd_handler = CommandHandler::new(notifier.clone(), service.clone());

    // Start Telegram command listener if configured
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<BotCommand>(100);
    if let Some(tg) = &config.telegram {
        let telegram_bot = Arc::new(TelegramBot::new(
            tg.bot_token.clone(),
            tg.chat_id.clone(),
            cmd_tx,
        ));

        tokio::spawn(async move {
            telegram_bot.start_polling().await;
        });

        tracing::info!("Telegram command listener started");
    }

    let tg_config = config.telegram.clone();
    let top_n = config.engine.top_n;

    // Main scan loop
    loop {
        // Process any pending Telegram commands
        while let Ok(cmd) = cmd_rx.try_recv() {
            cmd_handler.handle(cmd).await;
        }

        if cmd_handler.is_paused().await {
            tracing::info!("Scanning paused, waiting...");
            tokio::time::sleep(Duration::from_secs(10)).await;
            continue;
        }

        match service.generate_picks(top_n).await {
            Ok(picks) => {
                tracing::info!("Scan produced {} picks", picks.len());
                for pick in &picks {
                    tracing::info!(
                        "#{} {} vs {} | EV: {} | {}",
                        pick.rank,
                        pick.team_name,
                        pick.opponent_name,
                        pick.ev
                            .map(|ev| format!("{:+.2}%", ev * Decimal::ONE_HUNDRED))
                            .unwrap_or_else(|| "n/a".to_string()),
                        pick.confidence_label
                    );
                }
                if tg_config.as_ref().map(|c| c.notify_picks).unwrap_or(false) {
                    if let Err(e) = notifier.picks_report(&picks).await {
                        tracing::warn!("Failed to send picks report: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Scan failed: {}", e);
                if tg_config.as_ref().map(|c| c.notify_errors).unwrap_or(false) {
                    let _ = notifier.error("Scan", &e.to_string()).await;
                }
            }
        }

        tracing::info!(
            "Sleeping for {} seconds...",
            config.bot.scan_interval_secs
        );
        tokio::time::sleep(Duration::from_secs(config.bot.scan_interval_secs)).await;
    }
}

async fn show_picks(config: Config, count: Option<usize>) -> anyhow::Result<()> {
    let top_n = count.unwrap_or(config.engine.top_n);
    let service = build_service(&config)?;
    let picks = service.generate_picks(top_n).await?;

    println!("\n🏆 Top {} EV Picks:\n", picks.len());
    println!(
        "{:<5} {:<25} {:<25} {:>9} {:>10} {:>8}",
        "Rank", "Pick", "Opponent", "EV", "Conf", "Score"
    );
    println!("{}", "-".repeat(86));

    for pick in &picks {
        let ev = pick
            .ev
            .map(|ev| format!("{:+.2}%", ev * Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<5} {:<25} {:<25} {:>9} {:>10} {:>8.4}",
            pick.rank,
            pick.team_name,
            pick.opponent_name,
            ev,
            pick.confidence_label.to_string(),
            pick.supporting_score
        );
    }

    Ok(())
}

async fn show_stats(config: Config, count: usize) -> anyhow::Result<()> {
    let service = build_service(&config)?;
    let teams = service.top_teams(count).await?;

    println!("\n📊 Top {} Teams by Statistical Score:\n", teams.len());
    for (i, (row, score)) in teams.iter().enumerate() {
        println!("{:>2}. {:<25} {:.4}", i + 1, row.team_name, score);
    }

    Ok(())
}

async fn show_team(config: Config, name: &str) -> anyhow::Result<()> {
    let service = build_service(&config)?;

    match service.find_team(name).await? {
        Some((row, score)) => {
            println!("\n📊 {}\n", row.team_name);
            let cell =
                |v: Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_else(|| "N/A".to_string());
            println!("  WOBA:  {}", cell(row.woba));
            println!("  XWOBA: {}", cell(row.xwoba));
            println!("  XSLG:  {}", cell(row.xslg));
            println!("  XBA:   {}", cell(row.xba));
            match score {
                Some(score) => println!("\n  Composite score: {score:.4}"),
                None => println!("\n  Incomplete metrics, excluded from rankings"),
            }
        }
        None => {
            println!("No team found matching '{name}'");
        }
    }

    Ok(())
}

async fn test_notify(config: Config) -> anyhow::Result<()> {
    let tg = config
        .telegram
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Telegram not configured in config.toml"))?;

    let notifier = Notifier::new(tg.bot_token.clone(), tg.chat_id.clone());
    notifier
        .send("🧪 <b>Test Notification</b>\n\nIf you see this, Telegram integration is working!")
        .await?;

    println!("✅ Test notification sent!");
    Ok(())
}
