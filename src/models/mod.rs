pub mod onboarding;
pub mod options;
pub mod user_state;

pub use onboarding::{Goal, OnboardingStep};
pub use options::{MuscleFocus, RestrictionRule};
pub use user_state::{StepReply, UserState};
