// ==========================================
// 卖家补货决策系统 - 广告活动仓储
// ==========================================
// 定位: 广告活动归外部协作方管理,本仓储只提供
//       "该 SKU 是否已有在投活动" 的只读视图
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 在投状态值（与外部活动管理方的口径一致）
const ACTIVE_STATES: [&str; 2] = ["ACTIVE", "RUNNING"];

// ==========================================
// CampaignRepository - 广告活动仓储
// ==========================================

/// 广告活动仓储
/// 职责: ad_campaign 表的只读查询（写入属于外部协作方）
pub struct CampaignRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CampaignRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询已有在投广告活动的 SKU 集合
    pub fn find_campaigned_skus(&self, seller_id: &str) -> RepositoryResult<HashSet<i64>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT sku
            FROM ad_campaign
            WHERE seller_id = ?1 AND state IN (?2, ?3)
            "#,
        )?;

        let skus = stmt
            .query_map(
                params![seller_id, ACTIVE_STATES[0], ACTIVE_STATES[1]],
                |row| row.get::<_, i64>(0),
            )?
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(skus)
    }
}
