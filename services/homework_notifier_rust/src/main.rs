use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use dotenv::dotenv;
use homework_notifier_rust::{Config, ConfigError, Poller};
use homework_rust_core::{PracticumClient, TelegramClient};
use log::{error, info};

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}, {}, {}, {}, {}, {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args(),
                record.target(),
                record.module_path().unwrap_or("unknown"),
                record.line().unwrap_or(0)
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_logger();

    info!("Starting homework notifier...");

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e @ ConfigError::MissingCredentials(_)) => {
            error!("CRITICAL: required environment variables are missing at startup: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("CRITICAL: invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Config: {:?}", cfg);

    let source = PracticumClient::new(
        cfg.practicum_endpoint.clone(),
        cfg.practicum_token.clone(),
        cfg.http_timeout,
    );
    let notifier = TelegramClient::new(
        cfg.telegram_api_base_url.clone(),
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id.clone(),
        cfg.http_timeout,
    );

    info!(
        "Polling {} and reporting to chat {}",
        source.endpoint(),
        notifier.chat_id()
    );

    let poller = Poller::new(source, notifier, cfg.retry_period, Utc::now().timestamp());
    poller.run().await
}
