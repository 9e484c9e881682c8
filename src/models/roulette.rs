use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Person;
use crate::entities::{person_entity, winner_entity};

/// 抽奖结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SpinResult {
    pub winner: Person,
    /// 本次参与抽奖的出席人数
    pub total_participants: u64,
}

/// 中奖历史记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Winner {
    pub id: i64,
    pub person_id: i64,
    /// 中奖时的姓名快照
    pub person_name: String,
    /// Current state of the person; absent once the person was deleted.
    #[serde(default)]
    pub person: Option<Person>,
    pub won_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<(winner_entity::Model, Option<person_entity::Model>)> for Winner {
    fn from((w, p): (winner_entity::Model, Option<person_entity::Model>)) -> Self {
        Winner {
            id: w.id,
            person_id: w.person_id,
            person_name: w.person_name,
            person: p.map(Into::into),
            won_at: w.won_at,
            created_at: w.created_at,
        }
    }
}
