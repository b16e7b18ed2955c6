/// Callback data codec for inline buttons
pub mod callback;
/// Telegram command and callback handlers
pub mod handlers;
/// Screen rendering for tree positions
pub mod menu;
/// Send-or-edit navigation state machine
pub mod navigator;
/// Per-chat UI state tracking
pub mod state;
/// Transport seam over the Bot API
pub mod transport;
/// View layer for UI components (keyboards, messages)
pub mod views;

pub use navigator::{CallbackOutcome, Navigator};
pub use state::UiStateTracker;
