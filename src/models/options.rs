use serde::{Serialize, Deserialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RestrictionRule {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MuscleFocus {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub muscle_group_id: i32,
    pub priority_modifier: f64,
}
