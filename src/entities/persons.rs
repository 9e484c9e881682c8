use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 成员实体
/// - present: 当前是否出席（只有出席成员参与抽奖）
/// - win_count: 自 last_win_reset 以来的中奖次数
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "persons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub present: bool,
    pub win_count: i32,
    pub last_win: Option<DateTime<Utc>>,
    pub last_win_reset: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::winners::Entity")]
    Winners,
}

impl Related<super::winners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Winners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
