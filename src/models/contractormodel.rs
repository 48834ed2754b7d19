use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 5.0;
/// Rating a contractor starts with when none is given.
pub const DEFAULT_RATING: f32 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct Contractor {
    pub id: i64,
    /// Identity whose login resolves to this contractor record, if any.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub avatar: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
