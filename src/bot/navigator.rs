//! In-place navigation state machine.
//!
//! Ties the knowledge base, the per-chat UI state and the transport
//! together: every button press renders the destination screen and either
//! edits the chat's menu message or, when there is none, sends a new one.

use super::callback::NavCallback;
use super::menu::{self, MenuLevel, Screen};
use super::state::{Delivery, UiStateTracker};
use super::transport::{MenuTransport, TransportError};
use super::views::{DefaultMenuView, MenuView};
use crate::knowledge_base::KnowledgeBase;
use crate::statistics::StatisticsStore;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId, ParseMode};
use tracing::{debug, error, info, warn};

/// Result of processing a button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Destination screen was delivered
    Handled(MenuLevel),
    /// Callback data was not recognised
    Unknown,
}

/// Navigator over a static knowledge base
pub struct Navigator<T: MenuTransport, V: MenuView = DefaultMenuView> {
    transport: T,
    knowledge_base: Arc<KnowledgeBase>,
    tracker: UiStateTracker,
    statistics: Arc<StatisticsStore>,
    _view: std::marker::PhantomData<fn() -> V>,
}

impl<T: MenuTransport, V: MenuView> Navigator<T, V> {
    /// Creates a navigator
    #[must_use]
    pub fn new(
        transport: T,
        knowledge_base: Arc<KnowledgeBase>,
        tracker: UiStateTracker,
        statistics: Arc<StatisticsStore>,
    ) -> Self {
        Self {
            transport,
            knowledge_base,
            tracker,
            statistics,
            _view: std::marker::PhantomData,
        }
    }

    /// UI state tracker shared with this navigator
    #[must_use]
    pub const fn tracker(&self) -> &UiStateTracker {
        &self.tracker
    }

    /// Handles `/start`: counts it, greets the user and shows the main menu
    /// as a fresh message that subsequent navigation edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu cannot be sent. A failed welcome
    /// message is only logged.
    pub async fn start(&self, chat_id: ChatId) -> Result<(), TransportError> {
        self.tracker.reset(chat_id).await;

        if let Err(e) = self.statistics.record_start().await {
            error!("Failed to save statistics: {e}");
        }

        let welcome = Screen::text(V::welcome_message()).parse_mode(ParseMode::Markdown);
        if let Err(e) = self.transport.send_screen(chat_id, &welcome).await {
            warn!("Failed to send welcome message to chat {}: {e}", chat_id.0);
        }

        self.show(chat_id, None, MenuLevel::Main).await
    }

    /// Handles a button press
    ///
    /// `origin` is the message the pressed button belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination screen cannot be delivered.
    pub async fn handle_callback(
        &self,
        chat_id: ChatId,
        origin: Option<MessageId>,
        data: &str,
    ) -> Result<CallbackOutcome, TransportError> {
        let action = match data.parse::<NavCallback>() {
            Ok(action) => action,
            Err(e) => {
                warn!("Unknown callback data from chat {}: {e}", chat_id.0);
                return Ok(CallbackOutcome::Unknown);
            }
        };

        let level = action.destination();
        debug!("Chat {} navigates to {level:?}", chat_id.0);
        self.show(chat_id, origin, level).await?;

        if let MenuLevel::Article {
            section,
            topic,
            subtopic,
        } = level
        {
            if let Some(article) =
                menu::resolve_article(&self.knowledge_base, section, topic, subtopic)
            {
                if let Err(e) = self
                    .statistics
                    .record_article_view(article.link.as_str())
                    .await
                {
                    error!("Failed to save statistics: {e}");
                }
            }
        }

        Ok(CallbackOutcome::Handled(level))
    }

    /// Re-sends the chat's current screen as a new message
    ///
    /// Useful when the menu message has scrolled out of view. Navigation
    /// continues on the new message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be sent.
    pub async fn show_current(&self, chat_id: ChatId) -> Result<(), TransportError> {
        let level = self
            .tracker
            .get(chat_id)
            .await
            .map(|state| state.level)
            .unwrap_or_default();
        let screen = menu::render::<V>(&self.knowledge_base, level);
        self.send_and_track(chat_id, level, &screen).await
    }

    /// Text summary of the usage counters
    pub async fn statistics_report(&self) -> String {
        V::statistics_report(&self.statistics.snapshot().await)
    }

    /// Alert text for unrecognised button presses
    #[must_use]
    pub fn unknown_request_text(&self) -> &'static str {
        V::unknown_request()
    }

    /// Renders `level` and delivers it, editing in place when possible
    async fn show(
        &self,
        chat_id: ChatId,
        origin: Option<MessageId>,
        level: MenuLevel,
    ) -> Result<(), TransportError> {
        let screen = menu::render::<V>(&self.knowledge_base, level);

        match self.tracker.delivery(chat_id, origin).await {
            Delivery::Edit(message_id) => {
                match self.transport.edit_screen(chat_id, message_id, &screen).await {
                    Ok(()) => {
                        self.tracker.record(chat_id, level, message_id).await;
                        Ok(())
                    }
                    Err(TransportError::NotModified) => {
                        debug!("Menu in chat {} already up to date", chat_id.0);
                        self.tracker.record(chat_id, level, message_id).await;
                        Ok(())
                    }
                    Err(TransportError::MessageUnavailable(reason)) => {
                        info!(
                            "Menu message {} in chat {} cannot be edited ({reason}), sending a new one",
                            message_id.0, chat_id.0
                        );
                        self.tracker.forget_message(chat_id).await;
                        self.send_and_track(chat_id, level, &screen).await
                    }
                    Err(e) => {
                        error!("Failed to edit menu in chat {}: {e}", chat_id.0);
                        Err(e)
                    }
                }
            }
            Delivery::Send => self.send_and_track(chat_id, level, &screen).await,
        }
    }

    async fn send_and_track(
        &self,
        chat_id: ChatId,
        level: MenuLevel,
        screen: &Screen,
    ) -> Result<(), TransportError> {
        match self.transport.send_screen(chat_id, screen).await {
            Ok(message_id) => {
                self.tracker.record(chat_id, level, message_id).await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to send menu to chat {}: {e}", chat_id.0);
                Err(e)
            }
        }
    }
}
