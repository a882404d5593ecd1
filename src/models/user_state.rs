use chrono::{DateTime, NaiveDate, Utc, Weekday};

use super::onboarding::{next_training_date, parse_number, Goal, OnboardingAnswers, OnboardingStep};

#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub last_active: DateTime<Utc>,
    pub step: Option<OnboardingStep>,
    pub answers: OnboardingAnswers,
    pub training_day: Option<NaiveDate>,
    pub reminder_sent: bool,
}

/// What the bot should say after a text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepReply {
    Ask(OnboardingStep),
    InvalidNumber,
    ChooseGoal,
    Idle,
}

impl UserState {
    pub fn start_onboarding(now: DateTime<Utc>) -> Self {
        Self {
            last_active: now,
            step: Some(OnboardingStep::Name),
            ..Self::default()
        }
    }

    pub fn submit_text(&mut self, text: &str) -> StepReply {
        let Some(step) = self.step else {
            return StepReply::Idle;
        };

        match step {
            OnboardingStep::Name => {
                self.answers.name = Some(text.trim().to_string());
                self.advance(OnboardingStep::Age)
            }
            OnboardingStep::Age => match parse_number(text) {
                Some(age) => {
                    self.answers.age = Some(age);
                    self.advance(OnboardingStep::Height)
                }
                None => StepReply::InvalidNumber,
            },
            OnboardingStep::Height => match parse_number(text) {
                Some(height) => {
                    self.answers.height = Some(height);
                    self.advance(OnboardingStep::Weight)
                }
                None => StepReply::InvalidNumber,
            },
            OnboardingStep::Weight => match parse_number(text) {
                Some(weight) => {
                    self.answers.weight = Some(weight);
                    self.advance(OnboardingStep::Goal)
                }
                None => StepReply::InvalidNumber,
            },
            OnboardingStep::Goal => StepReply::ChooseGoal,
        }
    }

    fn advance(&mut self, next: OnboardingStep) -> StepReply {
        self.step = Some(next);
        match next {
            OnboardingStep::Goal => StepReply::ChooseGoal,
            step => StepReply::Ask(step),
        }
    }

    /// Returns false unless the conversation is waiting for a goal.
    pub fn select_goal(&mut self, goal: Goal) -> bool {
        if self.step != Some(OnboardingStep::Goal) {
            return false;
        }
        self.answers.goal = Some(goal);
        self.step = None;
        true
    }

    pub fn schedule_training(&mut self, day: Weekday, today: NaiveDate) -> NaiveDate {
        let date = next_training_date(day, today);
        self.training_day = Some(date);
        self.reminder_sent = false;
        date
    }

    pub fn cancel(&mut self) -> bool {
        self.step.take().is_some()
    }

    pub fn has_profile(&self) -> bool {
        self.answers != OnboardingAnswers::default() || self.training_day.is_some()
    }
}
