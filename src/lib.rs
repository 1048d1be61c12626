//! MLB Expected-Value Betting Picks Bot
//!
//! Ranks upcoming MLB matchups by fusing cached advanced batting stats with
//! live bookmaker odds into an EV-ranked pick list.
//!
//! ## Architecture
//!
//! ```text
//! Sheets (stats, TTL cache) ─┐
//!                            ├─→ Engine (score → odds normalize → EV → rank) ─→ Picks
//! Odds API (schedule+quotes)─┘                                                    │
//!                                                                                 ↓
//!                                    Telegram (commands in, pick reports out)
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod service;
pub mod telegram;
pub mod types;

#[cfg(test)]
mod config_tests;
