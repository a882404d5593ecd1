use chrono::{Datelike, Days, NaiveDate, Weekday};

pub const WEEK_DAYS: [&str; 7] = [
    "Понедельник", "Вторник", "Среда", "Четверг", "Пятница", "Суббота", "Воскресенье",
];

/// Weekdays in callback order, `training_day:0` is Monday.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu,
    Weekday::Fri, Weekday::Sat, Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Name,
    Age,
    Height,
    Weight,
    Goal,
}

impl OnboardingStep {
    pub fn prompt(self) -> &'static str {
        match self {
            OnboardingStep::Name => "Как вас зовут?",
            OnboardingStep::Age => "Сколько вам лет?",
            OnboardingStep::Height => "Введите ваш рост (см):",
            OnboardingStep::Weight => "Введите ваш вес (кг):",
            OnboardingStep::Goal => "🎯 Выберите вашу цель:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Lose,
    Gain,
    Maintain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Lose, Goal::Gain, Goal::Maintain];

    /// Identifier used in `goal:<id>` callback data.
    pub fn id(self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Gain => "gain",
            Goal::Maintain => "maintain",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|goal| goal.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Goal::Lose => "🔥 Похудеть",
            Goal::Gain => "💪 Набрать массу",
            Goal::Maintain => "⚖️ Поддержание формы",
        }
    }
}

/// Answers collected during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingAnswers {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
    pub goal: Option<Goal>,
}

/// Accepts only a non-empty run of ASCII digits that fits in `u32`.
pub fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

pub fn weekday_from_index(index: usize) -> Option<Weekday> {
    WEEKDAYS.get(index).copied()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEK_DAYS[day.num_days_from_monday() as usize]
}

/// Days from `today` to the next `target`, zero when they match.
pub fn days_until(target: Weekday, today: Weekday) -> u32 {
    (target.num_days_from_monday() + 7 - today.num_days_from_monday()) % 7
}

pub fn next_training_date(target: Weekday, today: NaiveDate) -> NaiveDate {
    today + Days::new(days_until(target, today.weekday()) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_until_is_modular_difference() {
        for target in 0..7i64 {
            for today in 0..7i64 {
                let expected = (target - today).rem_euclid(7) as u32;
                let got = days_until(WEEKDAYS[target as usize], WEEKDAYS[today as usize]);
                assert_eq!(got, expected, "target {target}, today {today}");
                assert!(got <= 6);
            }
        }
    }

    #[test]
    fn same_weekday_means_today() {
        // 2026-10-17 is a Saturday
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(next_training_date(Weekday::Sat, today), today);
    }

    #[test]
    fn earlier_weekday_wraps_into_next_week() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let date = next_training_date(Weekday::Mon, today);
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(date.weekday(), Weekday::Mon);

        let date = next_training_date(Weekday::Fri, today);
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
    }

    #[test]
    fn training_date_crosses_year_boundary() {
        // Thursday
        let today = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(
            next_training_date(Weekday::Tue, today),
            NaiveDate::from_ymd_opt(2027, 1, 5).unwrap()
        );
    }

    #[test]
    fn parse_number_accepts_digits_only() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("007"), Some(7));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-5"), None);
        assert_eq!(parse_number("+5"), None);
        assert_eq!(parse_number("4.5"), None);
        assert_eq!(parse_number(" 42"), None);
        assert_eq!(parse_number("сорок"), None);
        assert_eq!(parse_number("99999999999"), None);
    }

    #[test]
    fn weekday_index_bounds() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_name(Weekday::Wed), "Среда");
    }

    #[test]
    fn goal_ids_round_trip() {
        for goal in Goal::ALL {
            assert_eq!(Goal::from_id(goal.id()), Some(goal));
        }
        assert_eq!(Goal::from_id("bulk"), None);
    }
}
