use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Local, NaiveDate, Utc};
use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::models::{OnboardingStep, UserState};

type UserStore = Arc<RwLock<HashMap<ChatId, UserState>>>;

/// In-process per-chat onboarding data. Lost on restart.
#[derive(Clone)]
pub struct BotState {
    users: UserStore,
    idle_ttl: Duration,
}

impl BotState {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Replaces any previous record with a fresh onboarding.
    pub async fn start_onboarding(&self, chat_id: ChatId) -> OnboardingStep {
        let state = UserState::start_onboarding(Utc::now());
        let step = state.step.unwrap_or(OnboardingStep::Name);
        self.users.write().await.insert(chat_id, state);
        log::debug!("🧩 Onboarding started for {}", chat_id);
        step
    }

    /// Runs `f` on the chat's record, creating it if needed, and marks it active.
    pub async fn update<R>(&self, chat_id: ChatId, f: impl FnOnce(&mut UserState) -> R) -> R {
        let mut users = self.users.write().await;
        let user = users.entry(chat_id).or_default();
        user.last_active = Utc::now();
        f(user)
    }

    #[cfg(test)]
    pub async fn get_user_state(&self, chat_id: ChatId) -> Option<UserState> {
        self.users.read().await.get(&chat_id).cloned()
    }

    /// Chats whose training is on `today` and not yet reminded. Marks them reminded.
    pub async fn take_due_reminders(&self, today: NaiveDate) -> Vec<ChatId> {
        let mut users = self.users.write().await;
        users
            .iter_mut()
            .filter(|(_, user)| user.training_day == Some(today) && !user.reminder_sent)
            .map(|(chat_id, user)| {
                user.reminder_sent = true;
                *chat_id
            })
            .collect()
    }

    /// Drops idle records, except those still waiting for a training reminder.
    pub async fn cleanup_inactive(&self) -> usize {
        self.cleanup_inactive_at(Utc::now(), Local::now().date_naive()).await
    }

    async fn cleanup_inactive_at(&self, now: DateTime<Utc>, today: NaiveDate) -> usize {
        let mut users = self.users.write().await;
        let previous_count = users.len();

        users.retain(|_, user| {
            let fresh = (now - user.last_active).to_std().unwrap_or_default() < self.idle_ttl;
            let reminder_pending =
                !user.reminder_sent && user.training_day.is_some_and(|day| day >= today);
            fresh || reminder_pending
        });

        let current_count = users.len();
        log::debug!("🧹 User states cleaned: {} -> {} entries", previous_count, current_count);
        previous_count - current_count
    }
}
