use crate::config::DrawConfig;
use crate::entities::{person_entity as persons, winner_entity as winners};
use crate::error::{AppError, AppResult};
use crate::models::{SpinResult, Winner};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct RouletteService {
    pool: DatabaseConnection,
    draw: DrawConfig,
}

impl RouletteService {
    pub fn new(pool: DatabaseConnection, draw: DrawConfig) -> Self {
        Self { pool, draw }
    }

    /// 抽奖 (Spin)
    ///
    /// 逻辑:
    /// 1. 读取所有出席成员，无人出席则返回业务错误
    /// 2. 按中奖次数与最近中奖时间计算权重
    /// 3. 加权随机选出中奖者
    /// 4. 更新中奖者统计（超过重置周期则从 1 重新计数）
    /// 5. 追加中奖记录
    pub async fn spin(&self) -> AppResult<SpinResult> {
        let txn = self.pool.begin().await?;

        let present = persons::Entity::find()
            .filter(persons::Column::Present.eq(true))
            .order_by_asc(persons::Column::Id)
            .all(&txn)
            .await?;

        if present.is_empty() {
            return Err(AppError::ValidationError(
                "No present persons to select from".into(),
            ));
        }

        let now = Utc::now();
        let weights: Vec<f64> = present
            .iter()
            .map(|p| draw_weight(p, now, &self.draw))
            .collect();
        let roll: f64 = rand::rng().random();
        let chosen = present[pick_weighted(&weights, roll)].clone();
        let total_participants = present.len() as u64;

        let (win_count, last_win_reset) = next_win_state(&chosen, now, &self.draw);
        let mut am = chosen.into_active_model();
        am.win_count = Set(win_count);
        am.last_win = Set(Some(now));
        am.last_win_reset = Set(last_win_reset);
        am.updated_at = Set(now);
        let winner = am.update(&txn).await?;

        winners::ActiveModel {
            person_id: Set(winner.id),
            person_name: Set(winner.name.clone()),
            won_at: Set(now),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Draw won by person {} among {total_participants} participants",
            winner.id
        );

        Ok(SpinResult {
            winner: winner.into(),
            total_participants,
        })
    }

    /// 最近的中奖记录（倒序）
    pub async fn history(&self) -> AppResult<Vec<Winner>> {
        let rows = winners::Entity::find()
            .find_also_related(persons::Entity)
            .order_by_desc(winners::Column::WonAt)
            .order_by_desc(winners::Column::Id)
            .limit(self.draw.history_limit)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// 清零所有人的中奖次数，返回受影响行数
    pub async fn reset_all(&self) -> AppResult<u64> {
        let now = Utc::now();
        let result = persons::Entity::update_many()
            .col_expr(persons::Column::WinCount, Expr::value(0))
            .col_expr(persons::Column::LastWinReset, Expr::value(now))
            .col_expr(persons::Column::UpdatedAt, Expr::value(now))
            .exec(&self.pool)
            .await?;
        log::info!("Win counts reset for {} persons", result.rows_affected);
        Ok(result.rows_affected)
    }
}

fn reset_expired(last_reset: Option<DateTime<Utc>>, now: DateTime<Utc>, cfg: &DrawConfig) -> bool {
    match last_reset {
        None => true,
        Some(at) => now - at > Duration::days(cfg.reset_after_days),
    }
}

/// Draw weight of one present person.
///
/// Each counted win multiplies the weight by `win_decay`; counters older than
/// `reset_after_days` no longer count. A win within `recent_win_days`
/// multiplies the result by `recent_win_factor`.
pub fn draw_weight(person: &persons::Model, now: DateTime<Utc>, cfg: &DrawConfig) -> f64 {
    let mut weight = 1.0;

    if person.win_count > 0 {
        let stale = person
            .last_win_reset
            .is_some_and(|at| now - at > Duration::days(cfg.reset_after_days));
        if !stale {
            weight = cfg.win_decay.powi(person.win_count);
        }
    }

    if let Some(last_win) = person.last_win {
        if now - last_win < Duration::days(cfg.recent_win_days) {
            weight *= cfg.recent_win_factor;
        }
    }

    weight
}

/// Cumulative weighted pick. `roll` is uniform in `[0, 1)`; `weights` must not
/// be empty. Falls back to a uniform pick when every weight is zero.
pub fn pick_weighted(weights: &[f64], roll: f64) -> usize {
    let last = weights.len() - 1;
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return ((roll * weights.len() as f64) as usize).min(last);
    }

    let target = roll * total;
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return i;
        }
    }
    last
}

/// Win counter and reset stamp after `person` wins at `now`.
pub fn next_win_state(
    person: &persons::Model,
    now: DateTime<Utc>,
    cfg: &DrawConfig,
) -> (i32, Option<DateTime<Utc>>) {
    if reset_expired(person.last_win_reset, now, cfg) {
        (1, Some(now))
    } else {
        (person.win_count + 1, person.last_win_reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use crate::models::CreatePersonRequest;
    use crate::services::PersonService;

    fn person(win_count: i32) -> persons::Model {
        let now = Utc::now();
        persons::Model {
            id: 1,
            name: "Michel Moreau".into(),
            present: true,
            win_count,
            last_win: None,
            last_win_reset: Some(now - Duration::days(1)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_weight_decays_per_win() {
        let cfg = DrawConfig::default();
        let now = Utc::now();
        assert_eq!(draw_weight(&person(0), now, &cfg), 1.0);
        assert!((draw_weight(&person(2), now, &cfg) - 0.49).abs() < 1e-9);
    }

    #[test]
    fn test_weight_ignores_stale_counter() {
        let cfg = DrawConfig::default();
        let now = Utc::now();
        let mut p = person(3);
        p.last_win_reset = Some(now - Duration::days(91));
        assert_eq!(draw_weight(&p, now, &cfg), 1.0);
    }

    #[test]
    fn test_recent_win_halves_weight() {
        let cfg = DrawConfig::default();
        let now = Utc::now();
        let mut p = person(1);
        p.last_win = Some(now - Duration::days(2));
        assert!((draw_weight(&p, now, &cfg) - 0.35).abs() < 1e-9);

        p.last_win = Some(now - Duration::days(8));
        assert!((draw_weight(&p, now, &cfg) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_pick_weighted_follows_cumulative_weights() {
        let weights = [1.0, 0.0, 3.0];
        assert_eq!(pick_weighted(&weights, 0.0), 0);
        assert_eq!(pick_weighted(&weights, 0.24), 0);
        assert_eq!(pick_weighted(&weights, 0.25), 2);
        assert_eq!(pick_weighted(&weights, 0.999), 2);
    }

    #[test]
    fn test_pick_weighted_all_zero_is_uniform() {
        let weights = [0.0, 0.0, 0.0, 0.0];
        assert_eq!(pick_weighted(&weights, 0.0), 0);
        assert_eq!(pick_weighted(&weights, 0.6), 2);
        assert_eq!(pick_weighted(&weights, 0.9999), 3);
    }

    #[test]
    fn test_next_win_state() {
        let cfg = DrawConfig::default();
        let now = Utc::now();

        let (count, reset) = next_win_state(&person(2), now, &cfg);
        assert_eq!(count, 3);
        assert!(reset.is_some_and(|r| r < now));

        let mut never_reset = person(4);
        never_reset.last_win_reset = None;
        assert_eq!(next_win_state(&never_reset, now, &cfg), (1, Some(now)));

        let mut stale = person(4);
        stale.last_win_reset = Some(now - Duration::days(120));
        assert_eq!(next_win_state(&stale, now, &cfg), (1, Some(now)));
    }

    async fn setup(draw: DrawConfig) -> (PersonService, RouletteService) {
        let pool = create_memory_pool().await.unwrap();
        (
            PersonService::new(pool.clone()),
            RouletteService::new(pool, draw),
        )
    }

    #[tokio::test]
    async fn test_spin_without_present_persons_fails() {
        let (people, roulette) = setup(DrawConfig::default()).await;
        people
            .create(CreatePersonRequest {
                name: "Absent".into(),
            })
            .await
            .unwrap();

        let err = roulette.spin().await.unwrap_err();
        match err {
            AppError::ValidationError(msg) => assert_eq!(msg, "No present persons to select from"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(roulette.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spin_records_winner_and_history() {
        let (people, roulette) = setup(DrawConfig::default()).await;
        let absent = people
            .create(CreatePersonRequest { name: "Absent".into() })
            .await
            .unwrap();
        let present = people
            .create(CreatePersonRequest {
                name: "Catherine Leroy".into(),
            })
            .await
            .unwrap();
        people.set_presence(present.id, true).await.unwrap();

        let result = roulette.spin().await.unwrap();
        assert_eq!(result.total_participants, 1);
        assert_eq!(result.winner.id, present.id);
        assert_eq!(result.winner.win_count, 1);
        assert!(result.winner.last_win.is_some());
        assert!(result.winner.last_win_reset.is_some());

        let second = roulette.spin().await.unwrap();
        assert_eq!(second.winner.win_count, 2);

        let history = roulette.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|w| w.person_id == present.id));
        assert!(history[0].won_at >= history[1].won_at);
        assert_eq!(history[0].person.as_ref().map(|p| p.win_count), Some(2));

        let untouched = people.get(absent.id).await.unwrap();
        assert_eq!(untouched.win_count, 0);
    }

    #[tokio::test]
    async fn test_history_survives_person_deletion_and_is_limited() {
        let draw = DrawConfig {
            history_limit: 2,
            ..DrawConfig::default()
        };
        let (people, roulette) = setup(draw).await;
        let p = people
            .create(CreatePersonRequest {
                name: "Thierry Laurent".into(),
            })
            .await
            .unwrap();
        people.set_presence(p.id, true).await.unwrap();
        for _ in 0..3 {
            roulette.spin().await.unwrap();
        }
        people.delete(p.id).await.unwrap();

        let history = roulette.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|w| w.person.is_none()));
        assert!(history.iter().all(|w| w.person_name == "Thierry Laurent"));
    }

    #[tokio::test]
    async fn test_reset_all_zeroes_counters() {
        let (people, roulette) = setup(DrawConfig::default()).await;
        let p = people
            .create(CreatePersonRequest {
                name: "Sylvie Mercier".into(),
            })
            .await
            .unwrap();
        people.set_presence(p.id, true).await.unwrap();
        roulette.spin().await.unwrap();

        assert_eq!(roulette.reset_all().await.unwrap(), 1);
        let after = people.get(p.id).await.unwrap();
        assert_eq!(after.win_count, 0);
        assert!(after.last_win_reset.is_some());
        // 历史记录不受影响
        assert_eq!(roulette.history().await.unwrap().len(), 1);
    }
}
