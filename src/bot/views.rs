//! Menu UI components
//!
//! Contains keyboards and text messages for knowledge base navigation.

use super::callback::NavCallback;
use crate::knowledge_base::{Section, Subtopic, Topic};
use crate::statistics::Statistics;
use crate::utils::truncate_str;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

// ─────────────────────────────────────────────────────────────────────────────
// Trait definition
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for menu view rendering
///
/// Provides all text messages shown while navigating the knowledge base.
pub trait MenuView {
    /// Greeting sent on `/start` (Markdown)
    fn welcome_message() -> &'static str;

    /// Prompt above the section list
    fn main_menu_prompt() -> &'static str;

    /// Knowledge base has no sections
    fn empty_knowledge_base() -> &'static str;

    /// Prompt above the topic list of a section
    fn topics_prompt(section_name: &str) -> String;

    /// Section is missing or has no topics
    fn no_topics() -> &'static str;

    /// Prompt above the subtopic list of a topic
    fn subtopics_prompt(topic_title: &str) -> String;

    /// Topic is missing or has no subtopics
    fn no_subtopics() -> &'static str;

    /// Text shown with the article link button
    fn article_prompt() -> &'static str;

    /// Label of the article link button
    fn article_button(subtopic_title: &str) -> String;

    /// Subtopic is missing or has no usable link
    fn article_not_found() -> &'static str;

    /// Label of every back button
    fn back_button() -> &'static str;

    /// Alert for unrecognised button presses
    fn unknown_request() -> &'static str;

    /// Usage counters report
    fn statistics_report(stats: &Statistics) -> String;
}

// ─────────────────────────────────────────────────────────────────────────────
// Default implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Default Russian-language implementation of `MenuView`
pub struct DefaultMenuView;

/// Number of articles listed in the statistics report
const TOP_ARTICLES_LIMIT: usize = 5;
/// Longest article key shown in the statistics report
const ARTICLE_KEY_MAX_CHARS: usize = 60;

impl MenuView for DefaultMenuView {
    fn welcome_message() -> &'static str {
        "🖐 Привет! Я ваш бот для работы с базой знаний."
    }

    fn main_menu_prompt() -> &'static str {
        "📎Выберите необходимый раздел:"
    }

    fn empty_knowledge_base() -> &'static str {
        "В базе знаний пока нет разделов."
    }

    fn topics_prompt(section_name: &str) -> String {
        format!("Выберите тему из раздела \"{section_name}\":")
    }

    fn no_topics() -> &'static str {
        "В выбранном разделе нет доступных тем."
    }

    fn subtopics_prompt(topic_title: &str) -> String {
        format!("📌 Выберите подтему из темы \"{topic_title}\":")
    }

    fn no_subtopics() -> &'static str {
        "В выбранной теме нет доступных подтем."
    }

    fn article_prompt() -> &'static str {
        "😎 Вот ссылка на статью:"
    }

    fn article_button(subtopic_title: &str) -> String {
        format!("Ссылка на статью: {subtopic_title}")
    }

    fn article_not_found() -> &'static str {
        "Статья не найдена."
    }

    fn back_button() -> &'static str {
        "🔙 Назад"
    }

    fn unknown_request() -> &'static str {
        "Неизвестный запрос"
    }

    fn statistics_report(stats: &Statistics) -> String {
        let mut report = format!(
            "📊 Статистика\n\nЗапусков /start: {}\nПросмотров статей: {}",
            stats.start_command_count,
            stats.total_article_views()
        );

        let top = stats.top_articles(TOP_ARTICLES_LIMIT);
        if !top.is_empty() {
            report.push_str("\n\nПопулярные статьи:");
            for (position, (key, views)) in top.into_iter().enumerate() {
                let shown = truncate_str(key, ARTICLE_KEY_MAX_CHARS);
                let ellipsis = if shown.len() < key.len() { "…" } else { "" };
                report.push_str(&format!("\n{}. {shown}{ellipsis} — {views}", position + 1));
            }
        }
        report
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyboards
// ─────────────────────────────────────────────────────────────────────────────

fn back_row<V: MenuView>(target: NavCallback) -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::callback(
        V::back_button(),
        target.encode(),
    )]
}

/// Single back button keyboard
#[must_use]
pub fn back_keyboard<V: MenuView>(target: NavCallback) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_row::<V>(target)])
}

/// One row per section
#[must_use]
pub fn sections_keyboard(sections: &[Section]) -> InlineKeyboardMarkup {
    let rows = sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            vec![InlineKeyboardButton::callback(
                section.name.clone(),
                NavCallback::Section(index).encode(),
            )]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

/// One row per topic plus a back row to the main menu
#[must_use]
pub fn topics_keyboard<V: MenuView>(section: usize, topics: &[Topic]) -> InlineKeyboardMarkup {
    let mut rows = topics
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            vec![InlineKeyboardButton::callback(
                topic.title.clone(),
                NavCallback::Topic(section, index).encode(),
            )]
        })
        .collect::<Vec<_>>();
    rows.push(back_row::<V>(NavCallback::BackMain));
    InlineKeyboardMarkup::new(rows)
}

/// One row per subtopic plus a back row to the topic list
#[must_use]
pub fn subtopics_keyboard<V: MenuView>(
    section: usize,
    topic: usize,
    subtopics: &[Subtopic],
) -> InlineKeyboardMarkup {
    let mut rows = subtopics
        .iter()
        .enumerate()
        .map(|(index, subtopic)| {
            vec![InlineKeyboardButton::callback(
                subtopic.title.clone(),
                NavCallback::Subtopic(section, topic, index).encode(),
            )]
        })
        .collect::<Vec<_>>();
    rows.push(back_row::<V>(NavCallback::BackToTopics(section)));
    InlineKeyboardMarkup::new(rows)
}

/// Article URL button plus a back row to the subtopic list
#[must_use]
pub fn article_keyboard<V: MenuView>(
    section: usize,
    topic: usize,
    title: &str,
    link: Url,
) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url(V::article_button(title), link)],
        back_row::<V>(NavCallback::BackToSubtopics(section, topic)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_report_lists_top_articles() {
        let mut stats = Statistics {
            start_command_count: 4,
            ..Statistics::default()
        };
        stats.article_views.insert("https://a".into(), 2);
        stats.article_views.insert("https://b".into(), 5);

        let report = DefaultMenuView::statistics_report(&stats);
        assert!(report.contains("Запусков /start: 4"));
        assert!(report.contains("Просмотров статей: 7"));
        assert!(report.contains("1. https://b — 5"));
        assert!(report.contains("2. https://a — 2"));
    }

    #[test]
    fn test_statistics_report_without_views() {
        let report = DefaultMenuView::statistics_report(&Statistics::default());
        assert!(!report.contains("Популярные статьи"));
    }

    #[test]
    fn test_statistics_report_truncates_long_keys() {
        let mut stats = Statistics::default();
        let long_key = format!("https://example.com/{}", "a".repeat(200));
        stats.article_views.insert(long_key.clone(), 1);

        let report = DefaultMenuView::statistics_report(&stats);
        assert!(!report.contains(&long_key));
        assert!(report.contains('…'));
    }
}
