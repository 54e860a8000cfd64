// ==========================================
// 卖家补货决策系统 - 规划运行仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 口径: 一次运行 = replenish_run 一行 + 子表行,单事务落库
// ==========================================

use crate::domain::allocation::AllocationRow;
use crate::domain::budget::BudgetAllocation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ReplenishRunRepository - 规划运行仓储
// ==========================================

/// 规划运行仓储
/// 职责: 管理 replenish_run / allocation_row / budget_row 三表
pub struct ReplenishRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReplenishRunRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 落库一次规划运行（单事务）
    ///
    /// # 参数
    /// - run_id: 运行标识 (uuid)
    /// - seller_id: 卖家账号
    /// - created_at: 运行时间
    /// - allocation_rows: 补货建议行
    /// - budget_rows: 预算分配行
    pub fn save_run(
        &self,
        run_id: &str,
        seller_id: &str,
        created_at: DateTime<Utc>,
        allocation_rows: &[AllocationRow],
        budget_rows: &[BudgetAllocation],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "INSERT INTO replenish_run (run_id, seller_id, created_at) VALUES (?1, ?2, ?3)",
            params![run_id, seller_id, created_at.to_rfc3339()],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO allocation_row (
                    run_id, cluster, sku, offer_id,
                    for_delivery, need_goods, turnover, avg_daily_share
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;
            for row in allocation_rows {
                stmt.execute(params![
                    run_id,
                    row.cluster,
                    row.sku,
                    row.offer_id,
                    row.for_delivery,
                    row.need_goods,
                    row.turnover,
                    row.avg_daily_share,
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO budget_row (run_id, sku, offer_id, week_budget, day_budget)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for row in budget_rows {
                stmt.execute(params![
                    run_id,
                    row.sku,
                    row.offer_id,
                    row.week_budget,
                    row.day_budget,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// 查询卖家最近一次运行的 run_id
    pub fn find_latest_run_id(&self, seller_id: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let run_id = conn
            .query_row(
                r#"
                SELECT run_id FROM replenish_run
                WHERE seller_id = ?1
                ORDER BY created_at DESC
                LIMIT 1
                "#,
                params![seller_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(run_id)
    }

    /// 读取一次运行的补货建议行
    pub fn load_allocation_rows(&self, run_id: &str) -> RepositoryResult<Vec<AllocationRow>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT cluster, sku, offer_id, for_delivery, need_goods, turnover, avg_daily_share
            FROM allocation_row
            WHERE run_id = ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(AllocationRow {
                    cluster: row.get(0)?,
                    sku: row.get(1)?,
                    offer_id: row.get(2)?,
                    for_delivery: row.get(3)?,
                    need_goods: row.get(4)?,
                    turnover: row.get(5)?,
                    avg_daily_share: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 读取一次运行的预算分配行
    pub fn load_budget_rows(&self, run_id: &str) -> RepositoryResult<Vec<BudgetAllocation>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT sku, offer_id, week_budget, day_budget
            FROM budget_row
            WHERE run_id = ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(BudgetAllocation {
                    sku: row.get(0)?,
                    offer_id: row.get(1)?,
                    week_budget: row.get(2)?,
                    day_budget: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
