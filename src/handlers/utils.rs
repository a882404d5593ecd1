use chrono::Datelike;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ParseMode, ReplyMarkup};

use crate::bot_state::BotState;
use crate::models::onboarding::{weekday_name, WEEK_DAYS};
use crate::models::{Goal, UserState};

pub const ONBOARDING_BUTTON: &str = "🧩 Онбординг";
pub const PROFILE_BUTTON: &str = "📋 Мой профиль";

/// Экранирование MarkdownV2
pub fn escape_markdown_v2(text: &str) -> String {
    let specials = ['_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!'];
    let mut out = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Главное меню
pub fn main_menu_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(ONBOARDING_BUTTON)],
            vec![KeyboardButton::new(PROFILE_BUTTON)],
        ])
        .resize_keyboard()
    )
}

/// Клавиатура выбора цели
pub fn goal_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Goal::ALL
            .into_iter()
            .map(|goal| vec![InlineKeyboardButton::callback(goal.label(), format!("goal:{}", goal.id()))]),
    )
}

/// Клавиатура выбора дня тренировки: 3 + 3 + 1
pub fn training_day_keyboard() -> InlineKeyboardMarkup {
    let button = |index: usize| {
        InlineKeyboardButton::callback(WEEK_DAYS[index], format!("training_day:{}", index))
    };

    InlineKeyboardMarkup::new(vec![
        (0..3).map(button).collect::<Vec<_>>(),
        (3..6).map(button).collect(),
        vec![button(6)],
    ])
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

/// Профиль в формате MarkdownV2
pub fn format_profile(user: &UserState) -> String {
    let answers = &user.answers;
    let training = user.training_day.map(|date| {
        format!("{}, {}", weekday_name(date.weekday()), date.format("%d.%m.%Y"))
    });

    let lines = [
        ("Имя", or_dash(answers.name.as_deref())),
        ("Возраст", or_dash(answers.age)),
        ("Рост, см", or_dash(answers.height)),
        ("Вес, кг", or_dash(answers.weight)),
        ("Цель", or_dash(answers.goal.map(Goal::label))),
        ("Тренировка", or_dash(training)),
    ];

    let mut text = String::from("📋 *Ваш профиль*\n\n");
    for (label, value) in lines {
        text.push_str(&format!("*{}:* {}\n", escape_markdown_v2(label), escape_markdown_v2(&value)));
    }
    text
}

pub async fn start_onboarding(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let step = state.start_onboarding(chat_id).await;
    bot.send_message(chat_id, step.prompt()).await?;
    Ok(())
}

pub async fn show_profile(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let user = state.update(chat_id, |user| user.clone()).await;

    if !user.has_profile() {
        bot.send_message(
            chat_id,
            format!("Вы ещё не прошли онбординг. Нажмите «{}».", ONBOARDING_BUTTON),
        )
        .reply_markup(main_menu_keyboard())
        .await?;
        return Ok(());
    }

    bot.send_message(chat_id, format_profile(&user))
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}
