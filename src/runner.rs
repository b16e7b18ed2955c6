use crate::bot::handlers::{self, BotNavigator, Command};
use crate::bot::UiStateTracker;
use crate::config::Settings;
use crate::knowledge_base::KnowledgeBase;
use crate::statistics::StatisticsStore;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{error, info};

/// Run the Telegram transport runtime.
pub async fn run_bot(settings: Arc<Settings>) {
    let knowledge_base = Arc::new(KnowledgeBase::load_or_empty(&settings.knowledge_base_path).await);
    let statistics = Arc::new(StatisticsStore::open(settings.statistics_path.clone()).await);
    let tracker = init_tracker(&settings);

    let bot = Bot::new(settings.telegram_bot_token.clone());
    register_commands(&bot).await;

    let navigator: Arc<BotNavigator> = Arc::new(BotNavigator::new(
        bot.clone(),
        knowledge_base,
        tracker,
        statistics,
    ));
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![navigator])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn init_tracker(settings: &Settings) -> UiStateTracker {
    info!(
        "Initializing UiStateTracker (idle ttl: {}s, max chats: {})",
        settings.ui_state_ttl_secs, settings.ui_state_max_chats
    );
    UiStateTracker::new(settings.ui_state_ttl(), settings.ui_state_max_chats)
}

async fn register_commands(bot: &Bot) {
    if let Err(e) = bot.set_my_commands(handlers::bot_commands()).await {
        error!("Failed to register bot commands: {}", e);
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    navigator: Arc<BotNavigator>,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        Command::Start => handlers::start(msg, navigator).await,
        Command::Menu => handlers::menu(msg, navigator).await,
        Command::Stats => handlers::stats(bot, msg, navigator).await,
        Command::Help => handlers::help(bot, msg).await,
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    navigator: Arc<BotNavigator>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::callback(bot, q, navigator).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}
