use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::person_entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Person {
    pub id: i64,
    #[schema(example = "Sophie Bernard")]
    pub name: String,
    pub present: bool,
    pub win_count: i32,
    pub last_win: Option<DateTime<Utc>>,
    pub last_win_reset: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// First word of the name, used as the wedge label.
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

impl From<person_entity::Model> for Person {
    fn from(m: person_entity::Model) -> Self {
        Person {
            id: m.id,
            name: m.name,
            present: m.present,
            win_count: m.win_count,
            last_win: m.last_win,
            last_win_reset: m.last_win_reset,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePersonRequest {
    #[schema(example = "Sophie Bernard")]
    pub name: String,
}

/// 部分更新，至少提供一个字段
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePersonRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PresenceRequest {
    pub present: bool,
}
