//! Menu renderer
//!
//! Maps a position in the knowledge base tree to the screen shown for it.
//! Rendering is pure: no I/O, no state.

use super::callback::NavCallback;
use super::views::{self, MenuView};
use crate::knowledge_base::KnowledgeBase;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};
use tracing::warn;
use url::Url;

/// Position of a chat inside the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuLevel {
    /// Section list
    #[default]
    Main,
    /// Topic list of a section
    Topics {
        /// Section index
        section: usize,
    },
    /// Subtopic list of a topic
    Subtopics {
        /// Section index
        section: usize,
        /// Topic index
        topic: usize,
    },
    /// Article link of a subtopic
    Article {
        /// Section index
        section: usize,
        /// Topic index
        topic: usize,
        /// Subtopic index
        subtopic: usize,
    },
}

/// A message body with its inline keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Message text
    pub text: String,
    /// Inline keyboard, `None` removes any existing one on edit
    pub keyboard: Option<InlineKeyboardMarkup>,
    /// Parse mode for the text, plain text when `None`
    pub parse_mode: Option<ParseMode>,
}

impl Screen {
    /// Plain text screen without keyboard
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            parse_mode: None,
        }
    }

    /// Plain text screen with an inline keyboard
    #[must_use]
    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
            parse_mode: None,
        }
    }

    /// Sets the parse mode
    #[must_use]
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }
}

/// Article resolved for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// Subtopic title
    pub title: String,
    /// Validated article URL
    pub link: Url,
}

/// Resolves the article at a leaf position, if it has a usable link
#[must_use]
pub fn resolve_article(
    kb: &KnowledgeBase,
    section: usize,
    topic: usize,
    subtopic: usize,
) -> Option<ArticleRef> {
    let entry = kb.subtopic(section, topic, subtopic)?;
    let raw = entry.link.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    match Url::parse(raw) {
        Ok(link) => Some(ArticleRef {
            title: entry.title.clone(),
            link,
        }),
        Err(e) => {
            warn!("Invalid article link {raw:?} for \"{}\": {e}", entry.title);
            None
        }
    }
}

/// Renders the screen for a tree position
#[must_use]
pub fn render<V: MenuView>(kb: &KnowledgeBase, level: MenuLevel) -> Screen {
    match level {
        MenuLevel::Main => {
            if kb.is_empty() {
                Screen::text(V::empty_knowledge_base())
            } else {
                Screen::with_keyboard(
                    V::main_menu_prompt(),
                    views::sections_keyboard(&kb.sections),
                )
            }
        }
        MenuLevel::Topics { section } => match kb.section(section) {
            Some(s) if !s.topics.is_empty() => Screen::with_keyboard(
                V::topics_prompt(&s.name),
                views::topics_keyboard::<V>(section, &s.topics),
            ),
            _ => Screen::with_keyboard(
                V::no_topics(),
                views::back_keyboard::<V>(NavCallback::BackMain),
            ),
        },
        MenuLevel::Subtopics { section, topic } => match kb.topic(section, topic) {
            Some(t) if !t.subtopics.is_empty() => Screen::with_keyboard(
                V::subtopics_prompt(&t.title),
                views::subtopics_keyboard::<V>(section, topic, &t.subtopics),
            ),
            _ => Screen::with_keyboard(
                V::no_subtopics(),
                views::back_keyboard::<V>(back_from_subtopics(kb, section)),
            ),
        },
        MenuLevel::Article {
            section,
            topic,
            subtopic,
        } => match resolve_article(kb, section, topic, subtopic) {
            Some(article) => Screen::with_keyboard(
                V::article_prompt(),
                views::article_keyboard::<V>(section, topic, &article.title, article.link),
            ),
            None => Screen::with_keyboard(
                V::article_not_found(),
                views::back_keyboard::<V>(NavCallback::BackToSubtopics(section, topic)),
            ),
        },
    }
}

/// Back target for an empty or missing subtopic list
fn back_from_subtopics(kb: &KnowledgeBase, section: usize) -> NavCallback {
    if kb.section(section).is_some() {
        NavCallback::BackToTopics(section)
    } else {
        NavCallback::BackMain
    }
}
