pub mod commands;
pub mod messages;
pub mod callbacks;
pub mod utils;

pub use commands::command_handler;
pub use messages::message_handler;
pub use callbacks::callback_handler;

use chrono::Local;
use teloxide::prelude::*;
use tokio::time;
use crate::bot_state::BotState;

pub async fn check_training_days_task(bot: Bot, state: BotState) {
    let mut interval = time::interval(time::Duration::from_secs(60));

    loop {
        interval.tick().await;

        let today = Local::now().date_naive();
        for chat_id in state.take_due_reminders(today).await {
            match bot.send_message(chat_id, "Сегодня тренировка! 💪").await {
                Ok(_) => log::info!("⏰ Training reminder sent to {}", chat_id),
                Err(e) => log::error!("Error sending training reminder to {}: {}", chat_id, e),
            }
        }
    }
}
