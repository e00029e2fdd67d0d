//! Error types shared by the API client, the chat client and the poll loop
//!
//! Display texts end up in chat notifications, so they are written for the
//! person reading the chat.

use thiserror::Error;

use crate::validation::ValidationError;

/// Remote homework API could not produce a response body
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Ошибка при запросе к API: {source}. Эндпоинт: {endpoint}, Параметры: {{'from_date': {from_date}}}")]
    Transport {
        endpoint: String,
        from_date: i64,
        #[source]
        source: reqwest::Error,
    },

    #[error("Эндпоинт {endpoint} недоступен. Код ответа: {status}. Причина: {reason}")]
    Status {
        endpoint: String,
        status: u16,
        reason: String,
    },

    #[error("Ответ API от {endpoint} не является JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ConnectionError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ConnectionError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Chat message could not be delivered
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Ошибка при отправке сообщения в Telegram: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Telegram отклонил сообщение (код {status}): {description}")]
    Api { status: u16, description: String },
}

/// Anything that can go wrong inside one poll cycle
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
