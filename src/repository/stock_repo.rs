// ==========================================
// 卖家补货决策系统 - 库存快照仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 口径: 库存快照整体替换,不做增量合并
// ==========================================

use crate::domain::stock::StockRecord;
use crate::domain::types::StockScheme;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// StockSnapshotRepository - 库存快照仓储
// ==========================================

/// 库存快照仓储
/// 职责: 管理 stock_snapshot 表的替换与查询
pub struct StockSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StockSnapshotRepository {
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

    /// 整体替换卖家库存快照（单事务: 清场 + 写入）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn replace_for_seller(
        &self,
        seller_id: &str,
        records: &[StockRecord],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM stock_snapshot WHERE seller_id = ?1",
            params![seller_id],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO stock_snapshot (
                    seller_id, sku, cluster, scheme,
                    free_to_sell, reserved, in_transit, requested_supply, observed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.seller_id,
                    record.sku,
                    record.cluster,
                    record.scheme.to_string(),
                    record.free_to_sell,
                    record.reserved,
                    record.in_transit,
                    record.requested_supply,
                    record.observed_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(records.len())
    }

    /// 查询卖家当前库存快照
    pub fn find_by_seller(&self, seller_id: &str) -> RepositoryResult<Vec<StockRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT seller_id, sku, cluster, scheme,
                   free_to_sell, reserved, in_transit, requested_supply, observed_at
            FROM stock_snapshot
            WHERE seller_id = ?1
            ORDER BY cluster, sku
            "#,
        )?;

        let records = stmt
            .query_map(params![seller_id], |row| {
                let scheme_str: String = row.get(3)?;
                let observed_str: String = row.get(8)?;
                Ok(StockRecord {
                    seller_id: row.get(0)?,
                    sku: row.get(1)?,
                    cluster: row.get(2)?,
                    scheme: match scheme_str.to_uppercase().as_str() {
                        "FBS" => StockScheme::Fbs,
                        _ => StockScheme::Fbo,
                    },
                    free_to_sell: row.get(4)?,
                    reserved: row.get(5)?,
                    in_transit: row.get(6)?,
                    requested_supply: row.get(7)?,
                    observed_at: DateTime::parse_from_rfc3339(&observed_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
