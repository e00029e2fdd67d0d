pub mod practicum;
pub mod telegram;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ConnectionError, NotificationError};

// Re-export commonly used types
pub use practicum::PracticumClient;
pub use telegram::TelegramClient;

/// Source of homework status updates
///
/// Implementations must be Send + Sync so the poller can hold them across
/// await points.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch every homework updated since `from_date` (Unix seconds).
    ///
    /// Returns the decoded body as-is; shape checks belong to
    /// [`crate::validation::check_response`].
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, ConnectionError>;
}

/// Destination for chat notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), NotificationError>;
}
