use super::navigator::{CallbackOutcome, Navigator};
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::BotCommand, utils::command::BotCommands};
use tracing::{info, warn};

/// Navigator wired to the real Telegram transport
pub type BotNavigator = Navigator<Bot>;

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    /// Start over from the main menu
    #[command(description = "открыть базу знаний.")]
    Start,
    /// Re-send the current menu as a new message
    #[command(description = "показать текущее меню.")]
    Menu,
    /// Show usage counters
    #[command(description = "статистика использования.")]
    Stats,
    /// Show the command list
    #[command(description = "список команд.")]
    Help,
}

/// Command list registered in the Telegram UI
#[must_use]
pub fn bot_commands() -> Vec<BotCommand> {
    Command::bot_commands()
}

/// `/start` handler
///
/// # Errors
///
/// Returns an error if the welcome message or the menu cannot be sent.
pub async fn start(msg: Message, navigator: Arc<BotNavigator>) -> Result<()> {
    info!(
        "User {} ({}) initiated /start command.",
        msg.chat.id.0,
        get_user_name(&msg)
    );
    navigator.start(msg.chat.id).await?;
    Ok(())
}

/// `/menu` handler
///
/// # Errors
///
/// Returns an error if the menu cannot be sent.
pub async fn menu(msg: Message, navigator: Arc<BotNavigator>) -> Result<()> {
    navigator.show_current(msg.chat.id).await?;
    Ok(())
}

/// `/stats` handler
///
/// # Errors
///
/// Returns an error if the report cannot be sent.
pub async fn stats(bot: Bot, msg: Message, navigator: Arc<BotNavigator>) -> Result<()> {
    let report = navigator.statistics_report().await;
    bot.send_message(msg.chat.id, report).await?;
    Ok(())
}

/// `/help` handler
///
/// # Errors
///
/// Returns an error if the help text cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Inline keyboard button handler
///
/// Every query is answered so the client stops its loading indicator;
/// unknown payloads get an alert.
///
/// # Errors
///
/// Returns an error if the query cannot be answered or the screen cannot be delivered.
pub async fn callback(bot: Bot, q: CallbackQuery, navigator: Arc<BotNavigator>) -> Result<()> {
    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        warn!("Callback query from user {} without data or message", q.from.id.0);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let chat_id = message.chat().id;
    let outcome = navigator
        .handle_callback(chat_id, Some(message.id()), data)
        .await;

    match outcome {
        Ok(CallbackOutcome::Unknown) => {
            bot.answer_callback_query(q.id.clone())
                .text(navigator.unknown_request_text())
                .show_alert(true)
                .await?;
        }
        Ok(CallbackOutcome::Handled(_)) => {
            bot.answer_callback_query(q.id.clone()).await?;
        }
        Err(e) => {
            // Stop the spinner even if the screen could not be delivered
            if let Err(answer_err) = bot.answer_callback_query(q.id.clone()).await {
                warn!(
                    "Failed to answer callback query from user {}: {}",
                    q.from.id.0, answer_err
                );
            }
            return Err(e.into());
        }
    }
    Ok(())
}
