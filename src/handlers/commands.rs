use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use std::error::Error;

use crate::bot_state::BotState;
use crate::handlers::utils::{main_menu_keyboard, show_profile, start_onboarding};

use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Command::Start => handle_start(bot, msg, state).await?,
        Command::Help => handle_help(bot, msg).await?,
        Command::Onboarding => start_onboarding(&bot, msg.chat.id, &state).await?,
        Command::Profile => show_profile(&bot, msg.chat.id, &state).await?,
        Command::Cancel => handle_cancel(bot, msg, state).await?,
    }
    Ok(())
}

async fn handle_start(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    state.update(msg.chat.id, |_| ()).await;

    bot.send_message(
        msg.chat.id,
        "👋 Добро пожаловать в pro100gym!\n\n\
        Я ваш персональный тренер в кармане. Давайте познакомимся: \
        пройдите онбординг, и я подберу день для первой тренировки.",
    )
    .reply_markup(main_menu_keyboard())
    .await?;

    Ok(())
}

async fn handle_help(bot: Bot, msg: Message) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

async fn handle_cancel(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let cancelled = state.update(msg.chat.id, |user| user.cancel()).await;
    let text = if cancelled {
        "Онбординг прерван. Начать заново можно в любой момент."
    } else {
        "Нечего отменять."
    };

    bot.send_message(msg.chat.id, text)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}
