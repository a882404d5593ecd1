use teloxide::prelude::*;
use std::error::Error;
use chrono::{Local, Weekday};

use crate::bot_state::BotState;
use crate::models::Goal;
use crate::models::onboarding::{weekday_from_index, weekday_name};
use crate::handlers::utils::training_day_keyboard;

/// Parsed inline button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Goal(Goal),
    TrainingDay(Weekday),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        let (kind, value) = data.split_once(':')?;
        match kind {
            "goal" => Goal::from_id(value).map(CallbackAction::Goal),
            "training_day" => value
                .parse::<usize>()
                .ok()
                .and_then(weekday_from_index)
                .map(CallbackAction::TrainingDay),
            _ => None,
        }
    }
}

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) {
        let chat_id = message.chat().id;

        match CallbackAction::parse(data) {
            Some(CallbackAction::Goal(goal)) => {
                let accepted = state.update(chat_id, |user| user.select_goal(goal)).await;
                if accepted {
                    log::info!("🎯 Goal {:?} selected by {}", goal, chat_id);
                    bot.send_message(chat_id, "Отлично! Теперь выберите, когда начнете тренироваться:")
                        .reply_markup(training_day_keyboard())
                        .await?;
                } else {
                    bot.send_message(chat_id, "Сначала пройдите онбординг: /onboarding")
                        .await?;
                }
            }

            Some(CallbackAction::TrainingDay(day)) => {
                let today = Local::now().date_naive();
                let date = state.update(chat_id, |user| user.schedule_training(day, today)).await;
                log::info!("📅 Training for {} scheduled on {}", chat_id, date);

                bot.send_message(
                    chat_id,
                    format!(
                        "Отлично! Тренировка запланирована на {}, {} 💪",
                        weekday_name(day),
                        date.format("%d.%m.%Y")
                    ),
                )
                .await?;
            }

            None => {
                log::warn!("Unknown callback data from {}: {}", chat_id, data);
            }
        }
    }

    bot.answer_callback_query(q.id.clone()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_goal_callbacks() {
        assert_eq!(CallbackAction::parse("goal:lose"), Some(CallbackAction::Goal(Goal::Lose)));
        assert_eq!(CallbackAction::parse("goal:maintain"), Some(CallbackAction::Goal(Goal::Maintain)));
        assert_eq!(CallbackAction::parse("goal:fly"), None);
        assert_eq!(CallbackAction::parse("goal:"), None);
    }

    #[test]
    fn parses_training_day_callbacks() {
        assert_eq!(
            CallbackAction::parse("training_day:0"),
            Some(CallbackAction::TrainingDay(Weekday::Mon))
        );
        assert_eq!(
            CallbackAction::parse("training_day:6"),
            Some(CallbackAction::TrainingDay(Weekday::Sun))
        );
        assert_eq!(CallbackAction::parse("training_day:7"), None);
        assert_eq!(CallbackAction::parse("training_day:-1"), None);
        assert_eq!(CallbackAction::parse("training_day:x"), None);
    }

    #[test]
    fn rejects_unknown_payloads() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("goal"), None);
        assert_eq!(CallbackAction::parse("select_ai_gpt"), None);
    }
}
