use crate::entities::person_entity as persons;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePersonRequest, Person, UpdatePersonRequest};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};

#[derive(Clone)]
pub struct PersonService {
    pool: DatabaseConnection,
}

impl PersonService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取全部成员（按创建顺序）
    pub async fn list(&self) -> AppResult<Vec<Person>> {
        let list = persons::Entity::find()
            .order_by_asc(persons::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<Person> {
        Ok(self.find(id).await?.into())
    }

    pub async fn create(&self, request: CreatePersonRequest) -> AppResult<Person> {
        let name = validate_name(&request.name)?;
        let now = Utc::now();

        let created = persons::ActiveModel {
            name: Set(name),
            present: Set(false),
            win_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Person created: id={}", created.id);
        Ok(created.into())
    }

    pub async fn update(&self, id: i64, request: UpdatePersonRequest) -> AppResult<Person> {
        if request.name.is_none() && request.present.is_none() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        let name = request.name.as_deref().map(validate_name).transpose()?;

        let mut model = self.find(id).await?.into_active_model();
        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(present) = request.present {
            model.present = Set(present);
        }
        model.updated_at = Set(Utc::now());

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = persons::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Person not found".to_string()));
        }
        log::info!("Person deleted: id={id}");
        Ok(())
    }

    pub async fn set_presence(&self, id: i64, present: bool) -> AppResult<Person> {
        let mut model = self.find(id).await?.into_active_model();
        model.present = Set(present);
        model.updated_at = Set(Utc::now());
        Ok(model.update(&self.pool).await?.into())
    }

    /// 批量设置出席状态，返回受影响行数
    pub async fn set_all_presence(&self, present: bool) -> AppResult<u64> {
        let result = persons::Entity::update_many()
            .col_expr(persons::Column::Present, Expr::value(present))
            .col_expr(persons::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.pool)
            .await?;
        log::info!(
            "Presence set to {present} for {} persons",
            result.rows_affected
        );
        Ok(result.rows_affected)
    }

    /// 清零单个成员的中奖次数并记录重置时间
    pub async fn reset_wins(&self, id: i64) -> AppResult<Person> {
        let now = Utc::now();
        let mut model = self.find(id).await?.into_active_model();
        model.win_count = Set(0);
        model.last_win_reset = Set(Some(now));
        model.updated_at = Set(now);
        Ok(model.update(&self.pool).await?.into())
    }

    async fn find(&self, id: i64) -> AppResult<persons::Model> {
        persons::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Person not found".to_string()))
    }
}

fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
