use teloxide::prelude::*;
use std::error::Error;

use crate::bot_state::BotState;
use crate::models::{OnboardingStep, StepReply};
use crate::handlers::utils::{
    goal_keyboard, main_menu_keyboard, show_profile, start_onboarding,
    ONBOARDING_BUTTON, PROFILE_BUTTON,
};

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    // Пропускаем неизвестные команды
    if text.starts_with('/') {
        return Ok(());
    }

    let chat_id = msg.chat.id;
    match text {
        ONBOARDING_BUTTON => start_onboarding(&bot, chat_id, &state).await?,
        PROFILE_BUTTON => show_profile(&bot, chat_id, &state).await?,
        _ => {
            let reply = state.update(chat_id, |user| user.submit_text(text)).await;
            log::debug!("Onboarding reply for {}: {:?}", chat_id, reply);

            match reply {
                StepReply::Ask(step) => {
                    bot.send_message(chat_id, step.prompt()).await?;
                }
                StepReply::InvalidNumber => {
                    bot.send_message(chat_id, "Введите число!").await?;
                }
                StepReply::ChooseGoal => {
                    bot.send_message(chat_id, OnboardingStep::Goal.prompt())
                        .reply_markup(goal_keyboard())
                        .await?;
                }
                StepReply::Idle => {
                    bot.send_message(chat_id, "Выберите действие в меню 👇")
                        .reply_markup(main_menu_keyboard())
                        .await?;
                }
            }
        }
    }

    Ok(())
}
