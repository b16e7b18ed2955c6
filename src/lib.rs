#![deny(missing_docs)]
//! Knowledge-base navigator bot.
//!
//! Menu-driven Telegram front end over a static section → topic → subtopic
//! tree. Navigation happens by editing a single message in place.

/// Telegram-specific bot logic (navigation, views, handlers).
pub mod bot;
/// Configuration management.
pub mod config;
/// Knowledge base model and loading.
pub mod knowledge_base;
/// Logging setup with secret redaction.
pub mod logging;
/// Telegram runtime entrypoint.
pub mod runner;
/// Persisted usage counters.
pub mod statistics;
/// Utility functions.
pub mod utils;
