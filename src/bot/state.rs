//! Per-chat UI state
//!
//! Remembers, for every chat, which screen is shown and which message
//! carries it, so that navigation edits one message instead of sending
//! a new one for every button press.

use super::menu::MenuLevel;
use moka::future::Cache;
use std::time::Duration;
use teloxide::types::{ChatId, MessageId};
use tracing::debug;

/// What a chat currently looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatUiState {
    /// Current position in the tree
    pub level: MenuLevel,
    /// Message that carries the menu, if one has been sent
    pub message_id: Option<MessageId>,
}

/// How the next screen reaches the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Edit the given message in place
    Edit(MessageId),
    /// Send a new message
    Send,
}

/// In-memory tracker of [`ChatUiState`] per chat
///
/// Entries expire after a period of inactivity and the number of tracked
/// chats is bounded. A forgotten chat falls back to adopting the message
/// its next button press came from.
#[derive(Clone)]
pub struct UiStateTracker {
    /// Moka cache storing chat_id -> state with automatic idle expiry
    cache: Cache<i64, ChatUiState>,
}

impl UiStateTracker {
    /// Creates a new tracker
    ///
    /// # Arguments
    ///
    /// * `idle_ttl` - Time after the last access when a chat is forgotten
    /// * `max_capacity` - Maximum number of tracked chats
    ///
    /// # Examples
    ///
    /// ```
    /// use kb_navigator::bot::UiStateTracker;
    /// use std::time::Duration;
    ///
    /// let tracker = UiStateTracker::new(Duration::from_secs(86_400), 100_000);
    /// ```
    #[must_use]
    pub fn new(idle_ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(idle_ttl)
            .build();

        Self { cache }
    }

    /// Current state of a chat, if tracked
    pub async fn get(&self, chat_id: ChatId) -> Option<ChatUiState> {
        self.cache.get(&chat_id.0).await
    }

    /// Starts the chat over: main menu, no tracked message
    pub async fn reset(&self, chat_id: ChatId) {
        debug!("Resetting UI state for chat {}", chat_id.0);
        self.cache.insert(chat_id.0, ChatUiState::default()).await;
    }

    /// Decides whether the next screen edits a message or sends a new one
    ///
    /// A tracked message wins. An untracked chat adopts `origin`, the message
    /// whose button was pressed. A chat reset by `/start` always gets a new
    /// message.
    pub async fn delivery(&self, chat_id: ChatId, origin: Option<MessageId>) -> Delivery {
        match self.get(chat_id).await {
            Some(ChatUiState {
                message_id: Some(id),
                ..
            }) => Delivery::Edit(id),
            Some(_) => Delivery::Send,
            None => origin.map_or(Delivery::Send, Delivery::Edit),
        }
    }

    /// Records the screen now shown and the message carrying it
    pub async fn record(&self, chat_id: ChatId, level: MenuLevel, message_id: MessageId) {
        self.cache
            .insert(
                chat_id.0,
                ChatUiState {
                    level,
                    message_id: Some(message_id),
                },
            )
            .await;
    }

    /// Forgets the tracked message but keeps the level
    ///
    /// Used when the message can no longer be edited.
    pub async fn forget_message(&self, chat_id: ChatId) {
        if let Some(mut state) = self.get(chat_id).await {
            state.message_id = None;
            self.cache.insert(chat_id.0, state).await;
        }
    }

    /// Returns the current number of tracked chats
    ///
    /// Useful for monitoring and health checks.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> UiStateTracker {
        UiStateTracker::new(Duration::from_secs(60), 100)
    }

    #[tokio::test]
    async fn test_unknown_chat_sends_without_origin() {
        let tracker = tracker();
        assert_eq!(tracker.delivery(ChatId(1), None).await, Delivery::Send);
    }

    #[tokio::test]
    async fn test_unknown_chat_adopts_origin_message() {
        let tracker = tracker();
        assert_eq!(
            tracker.delivery(ChatId(1), Some(MessageId(7))).await,
            Delivery::Edit(MessageId(7))
        );
    }

    #[tokio::test]
    async fn test_reset_chat_sends_new_message() {
        let tracker = tracker();
        tracker.record(ChatId(1), MenuLevel::Main, MessageId(3)).await;
        tracker.reset(ChatId(1)).await;

        assert_eq!(
            tracker.delivery(ChatId(1), Some(MessageId(3))).await,
            Delivery::Send
        );
    }

    #[tokio::test]
    async fn test_tracked_message_is_edited() {
        let tracker = tracker();
        let level = MenuLevel::Topics { section: 2 };
        tracker.record(ChatId(1), level, MessageId(5)).await;

        // The tracked message wins over the one the button came from
        assert_eq!(
            tracker.delivery(ChatId(1), Some(MessageId(9))).await,
            Delivery::Edit(MessageId(5))
        );
        assert_eq!(
            tracker.get(ChatId(1)).await,
            Some(ChatUiState {
                level,
                message_id: Some(MessageId(5)),
            })
        );
    }

    #[tokio::test]
    async fn test_forget_message_keeps_level() {
        let tracker = tracker();
        let level = MenuLevel::Subtopics {
            section: 1,
            topic: 0,
        };
        tracker.record(ChatId(1), level, MessageId(5)).await;
        tracker.forget_message(ChatId(1)).await;

        let state = tracker.get(ChatId(1)).await;
        assert_eq!(state.map(|s| s.level), Some(level));
        assert_eq!(tracker.delivery(ChatId(1), None).await, Delivery::Send);
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let tracker = tracker();
        tracker.record(ChatId(1), MenuLevel::Main, MessageId(5)).await;

        assert_eq!(tracker.delivery(ChatId(2), None).await, Delivery::Send);
    }

    #[tokio::test]
    async fn test_entry_count() {
        let tracker = tracker();
        tracker.reset(ChatId(1)).await;
        tracker.reset(ChatId(2)).await;

        // Manually run pending tasks to update the entry count
        tracker.cache.run_pending_tasks().await;

        assert_eq!(tracker.entry_count(), 2);
    }
}
