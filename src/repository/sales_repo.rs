// ==========================================
// 卖家补货决策系统 - 销售记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::sales::SalesRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// SalesRecordRepository - 销售记录仓储
// ==========================================

/// 销售记录仓储
/// 职责: 管理 sales_record 表的写入与窗口查询
pub struct SalesRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SalesRecordRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入销售记录（单事务）
    ///
    /// # 参数
    /// - records: 待写入的销售记录
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn insert_batch(&self, records: &[SalesRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO sales_record (
                    seller_id, sku, offer_id, cluster_to,
                    quantity, revenue_amount, observation_date
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.seller_id,
                    record.sku,
                    record.offer_id,
                    record.cluster_to,
                    record.quantity,
                    record.revenue_amount,
                    record.observation_date.format("%Y-%m-%d").to_string(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(records.len())
    }

    /// 按卖家与追溯窗口查询销售记录
    ///
    /// # 参数
    /// - seller_id: 卖家账号
    /// - from_date: 窗口起始（含）
    /// - to_date: 窗口结束（含）
    pub fn find_by_seller_and_window(
        &self,
        seller_id: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> RepositoryResult<Vec<SalesRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT seller_id, sku, offer_id, cluster_to,
                   quantity, revenue_amount, observation_date
            FROM sales_record
            WHERE seller_id = ?1
              AND observation_date BETWEEN ?2 AND ?3
            ORDER BY observation_date
            "#,
        )?;

        let records = stmt
            .query_map(
                params![
                    seller_id,
                    from_date.format("%Y-%m-%d").to_string(),
                    to_date.format("%Y-%m-%d").to_string(),
                ],
                |row| {
                    Ok(SalesRecord {
                        seller_id: row.get(0)?,
                        sku: row.get(1)?,
                        offer_id: row.get(2)?,
                        cluster_to: row.get(3)?,
                        quantity: row.get(4)?,
                        revenue_amount: row.get(5)?,
                        observation_date: NaiveDate::parse_from_str(
                            &row.get::<_, String>(6)?,
                            "%Y-%m-%d",
                        )
                        .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// 删除卖家的全部销售记录（重新导入前清场）
    pub fn delete_by_seller(&self, seller_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM sales_record WHERE seller_id = ?1",
            params![seller_id],
        )?;
        Ok(affected)
    }
}
