//! Transport seam between the navigator and the Telegram Bot API.
//!
//! The navigator only needs two operations: send a screen as a new message
//! and replace the contents of an existing one. [`MenuTransport`] is
//! implemented for [`teloxide::Bot`] with automatic retry on transient
//! network failures.

use super::menu::Screen;
use crate::utils::retry_telegram_operation;
use async_trait::async_trait;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId};
use teloxide::{ApiError, RequestError};
use thiserror::Error;

/// Errors surfaced by a [`MenuTransport`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Edit carried the same text and keyboard as the message already has
    #[error("message is not modified")]
    NotModified,
    /// Target message was deleted, is too old or otherwise cannot be edited
    #[error("message is unavailable for editing: {0}")]
    MessageUnavailable(String),
    /// Network failure, worth retrying
    #[error("transient Telegram error: {0}")]
    Transient(String),
    /// Flood control, retry no earlier than the given delay
    #[error("flood control, retry after {0:?}")]
    RetryAfter(Duration),
    /// Any other Bot API error
    #[error("Telegram API error: {0}")]
    Api(String),
}

impl TransportError {
    /// Returns `true` if the operation may succeed when repeated
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::RetryAfter(_))
    }
}

impl From<RequestError> for TransportError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(ApiError::MessageNotModified) => Self::NotModified,
            RequestError::Api(
                api @ (ApiError::MessageToEditNotFound
                | ApiError::MessageCantBeEdited
                | ApiError::MessageIdInvalid),
            ) => Self::MessageUnavailable(api.to_string()),
            RequestError::RetryAfter(secs) => Self::RetryAfter(secs.duration()),
            e @ (RequestError::Network(_) | RequestError::Io(_)) => Self::Transient(e.to_string()),
            other => Self::Api(other.to_string()),
        }
    }
}

/// Interface for delivering menu screens to a chat
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuTransport: Send + Sync {
    /// Send the screen as a new message and return its id
    async fn send_screen(&self, chat_id: ChatId, screen: &Screen)
        -> Result<MessageId, TransportError>;
    /// Replace text and keyboard of an existing message
    async fn edit_screen(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        screen: &Screen,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl MenuTransport for Bot {
    async fn send_screen(
        &self,
        chat_id: ChatId,
        screen: &Screen,
    ) -> Result<MessageId, TransportError> {
        retry_telegram_operation(|| {
            let mut req = self.send_message(chat_id, screen.text.clone());
            if let Some(mode) = screen.parse_mode {
                req = req.parse_mode(mode);
            }
            if let Some(keyboard) = &screen.keyboard {
                req = req.reply_markup(keyboard.clone());
            }
            async move { req.await.map(|msg| msg.id).map_err(TransportError::from) }
        })
        .await
    }

    async fn edit_screen(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        screen: &Screen,
    ) -> Result<(), TransportError> {
        retry_telegram_operation(|| {
            let mut req = self.edit_message_text(chat_id, message_id, screen.text.clone());
            if let Some(mode) = screen.parse_mode {
                req = req.parse_mode(mode);
            }
            if let Some(keyboard) = &screen.keyboard {
                req = req.reply_markup(keyboard.clone());
            }
            async move { req.await.map(|_| ()).map_err(TransportError::from) }
        })
        .await
    }
}
