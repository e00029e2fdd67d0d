//! Homework Core - building blocks for the homework status notifier.
//!
//! This module provides:
//! - Practicum homework statuses API client
//! - Telegram Bot API client for chat notifications
//! - Response shape validation and status-to-verdict parsing
//! - `HomeworkSource` / `Notifier` traits so the poll loop can run against fakes

pub mod clients;
pub mod error;
pub mod models;
pub mod validation;

pub use clients::{HomeworkSource, Notifier, PracticumClient, TelegramClient};
pub use error::{ConnectionError, NotificationError, PollError};
pub use models::{HomeworkResponse, HomeworkStatus};
pub use validation::{check_response, parse_status, ValidationError, ValidationKind};
