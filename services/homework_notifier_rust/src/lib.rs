//! homework_notifier_rust - polls the homework review API and relays status changes to Telegram

pub mod config;
pub mod poller;

pub use config::{Config, ConfigError};
pub use poller::{run_once, send_message, Poller, PollerState, TickOutcome};
