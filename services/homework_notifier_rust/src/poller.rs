//! Poll-check-notify loop
//!
//! `run_once` is a single tick: query, validate, parse the newest homework,
//! notify on change, report errors. It owns no timers, so tests drive it
//! directly with fake clients. `Poller` is the thin driver that adds the
//! fixed sleep between ticks.

use std::time::Duration;

use homework_rust_core::clients::{HomeworkSource, Notifier};
use homework_rust_core::validation::{check_response, parse_status};
use homework_rust_core::PollError;
use log::{debug, error, info, warn};

/// State carried from one tick to the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    /// Lower bound (`from_date`) for the next query
    pub cursor: i64,
    pub last_notified_message: Option<String>,
    pub last_notified_error: Option<String>,
}

impl PollerState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_notified_message: None,
            last_notified_error: None,
        }
    }
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// New status message delivered to the chat
    StatusNotified(String),
    /// Newest homework still produces the last delivered message
    StatusUnchanged(String),
    /// Status message built but the chat did not accept it
    StatusDeliveryFailed(String),
    /// Response had an empty `homeworks` list
    NoNewStatuses,
    /// Error text delivered to the chat
    ErrorNotified(String),
    /// Same error text as the last one delivered; not repeated
    ErrorSuppressed(String),
    ErrorDeliveryFailed(String),
}

impl TickOutcome {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TickOutcome::ErrorNotified(_)
                | TickOutcome::ErrorSuppressed(_)
                | TickOutcome::ErrorDeliveryFailed(_)
        )
    }
}

/// Chat text for an error raised during a tick
pub fn error_message(err: &PollError) -> String {
    format!("Возникла ошибка: {}", err)
}

/// Send `text`, logging instead of propagating any failure.
///
/// Returns whether the message was delivered.
pub async fn send_message<N>(notifier: &N, text: &str) -> bool
where
    N: Notifier + ?Sized,
{
    debug!("Sending Telegram message: {}", text);
    match notifier.send_message(text).await {
        Ok(()) => {
            debug!("Telegram message sent: {}", text);
            true
        }
        Err(e) => {
            error!("Failed to send Telegram message: {}", e);
            false
        }
    }
}

/// Fallible part of a tick: fetch, validate and pick the newest status.
///
/// Returns the next cursor and the status message, if any.
async fn poll<S>(source: &S, cursor: i64) -> Result<(i64, Option<String>), PollError>
where
    S: HomeworkSource + ?Sized,
{
    let answer = source.get_api_answer(cursor).await?;
    let response = check_response(&answer)?;

    let message = match response.latest() {
        Some(homework) => Some(parse_status(homework)?),
        None => None,
    };

    Ok((response.current_date, message))
}

/// Run one poll cycle against `source`, reporting through `notifier`.
pub async fn run_once<S, N>(
    mut state: PollerState,
    source: &S,
    notifier: &N,
) -> (PollerState, TickOutcome)
where
    S: HomeworkSource + ?Sized,
    N: Notifier + ?Sized,
{
    let outcome = match poll(source, state.cursor).await {
        Ok((next_cursor, message)) => {
            state.cursor = next_cursor;
            match message {
                None => {
                    debug!("No new statuses");
                    TickOutcome::NoNewStatuses
                }
                Some(message) if state.last_notified_message.as_deref() == Some(message.as_str()) => {
                    debug!("Status unchanged since last notification");
                    TickOutcome::StatusUnchanged(message)
                }
                Some(message) => {
                    if send_message(notifier, &message).await {
                        info!("Notified status change: {}", message);
                        state.last_notified_message = Some(message.clone());
                        state.last_notified_error = None;
                        TickOutcome::StatusNotified(message)
                    } else {
                        TickOutcome::StatusDeliveryFailed(message)
                    }
                }
            }
        }
        Err(err) => {
            let text = error_message(&err);
            error!("{}", text);

            if state.last_notified_error.as_deref() == Some(text.as_str()) {
                debug!("Error already reported, not repeating it");
                TickOutcome::ErrorSuppressed(text)
            } else if send_message(notifier, &text).await {
                state.last_notified_error = Some(text.clone());
                TickOutcome::ErrorNotified(text)
            } else {
                warn!("Error notification was not delivered; will retry next cycle");
                TickOutcome::ErrorDeliveryFailed(text)
            }
        }
    };

    (state, outcome)
}

/// Drives `run_once` forever with a fixed pause between ticks
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    retry_period: Duration,
    state: PollerState,
}

impl<S, N> Poller<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, retry_period: Duration, start_cursor: i64) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            state: PollerState::new(start_cursor),
        }
    }

    pub fn state(&self) -> &PollerState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub async fn tick(&mut self) -> TickOutcome {
        let state = std::mem::replace(&mut self.state, PollerState::new(0));
        let (state, outcome) = run_once(state, &self.source, &self.notifier).await;
        self.state = state;
        outcome
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            "Polling started (cursor={}, retry period={}s)",
            self.state.cursor,
            self.retry_period.as_secs()
        );

        loop {
            let outcome = self.tick().await;
            if outcome.is_error() {
                warn!("Cycle failed, retrying in {}s", self.retry_period.as_secs());
            }
            debug!("Tick finished: {:?} (next cursor={})", outcome, self.state.cursor);
            tokio::time::sleep(self.retry_period).await;
        }
    }
}
