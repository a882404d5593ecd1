use teloxide::{prelude::*, utils::command::BotCommands};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

mod api;
mod bot_state;
mod cache;
mod config;
mod database;
mod handlers;
mod models;

use crate::api::AppState;
use crate::bot_state::BotState;
use crate::config::Config;
use crate::database::Database;
use crate::handlers::{callback_handler, command_handler, message_handler};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать помощь")]
    Help,
    #[command(description = "пройти онбординг")]
    Onboarding,
    #[command(description = "мой профиль")]
    Profile,
    #[command(description = "прервать онбординг")]
    Cancel,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting pro100gym backend...");

    let config = Config::from_env().inspect_err(|e| log::error!("Configuration error: {}", e))?;

    let db = Database::new(&config.database_url).await?;
    db.init().await?;
    log::info!("✅ Database initialized");

    let api_state = AppState::new(Arc::new(db), config.options_cache_ttl);

    // Очистка кэша ответов API
    let cache = api_state.cache.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            cache.purge_expired().await;
        }
    });

    let cors = api::cors_layer(config.cors_allow_origins.as_deref());
    let listener = api::bind(&config.api_address)
        .await
        .inspect_err(|e| log::error!("Cannot bind options API on {}: {}", config.api_address, e))?;
    tokio::spawn(async move {
        if let Err(e) = api::serve(listener, api_state, cors).await {
            log::error!("Options API stopped: {}", e);
        }
    });

    let state = BotState::new(config.user_state_ttl);
    let bot = Bot::new(config.bot_token.clone());

    // Напоминания о тренировках
    let (bot_clone, state_clone) = (bot.clone(), state.clone());
    tokio::spawn(async move {
        handlers::check_training_days_task(bot_clone, state_clone).await;
    });

    // Очистка неактивных пользователей
    let state_clone = state.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            let removed = state_clone.cleanup_inactive().await;
            if removed > 0 {
                log::info!("🧹 Dropped {} inactive users", removed);
            }
        }
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler)
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
