// ==========================================
// 卖家补货决策系统 - 商品参照与必备规则仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::product::{MandatoryRule, ProductInfo};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductInfoRepository - 商品参照仓储
// ==========================================

/// 商品参照仓储
/// 职责: 管理 product_info 表的 UPSERT 与查询
pub struct ProductInfoRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductInfoRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量 UPSERT 商品参照（单事务）
    pub fn upsert_batch(
        &self,
        seller_id: &str,
        products: &[ProductInfo],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO product_info (seller_id, sku, offer_id, name, price, barcode)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(seller_id, sku) DO UPDATE SET
                    offer_id = ?3, name = ?4, price = ?5, barcode = ?6
                "#,
            )?;

            for product in products {
                stmt.execute(params![
                    seller_id,
                    product.sku,
                    product.offer_id,
                    product.name,
                    product.price,
                    product.barcode,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(products.len())
    }

    /// 查询卖家的全部商品参照
    pub fn find_by_seller(&self, seller_id: &str) -> RepositoryResult<Vec<ProductInfo>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT sku, offer_id, name, price, barcode
            FROM product_info
            WHERE seller_id = ?1
            ORDER BY sku
            "#,
        )?;

        let products = stmt
            .query_map(params![seller_id], |row| {
                Ok(ProductInfo {
                    sku: row.get(0)?,
                    offer_id: row.get(1)?,
                    name: row.get(2)?,
                    price: row.get(3)?,
                    barcode: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }
}

// ==========================================
// MandatoryRuleRepository - 必备商品规则仓储
// ==========================================

/// 必备商品规则仓储
/// 职责: 管理 mandatory_rule 表的整体替换与查询
pub struct MandatoryRuleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MandatoryRuleRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整体替换卖家的必备规则（单事务: 清场 + 写入）
    pub fn replace_for_seller(
        &self,
        seller_id: &str,
        rules: &[MandatoryRule],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM mandatory_rule WHERE seller_id = ?1",
            params![seller_id],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO mandatory_rule (seller_id, offer_id, required_total_quantity)
                VALUES (?1, ?2, ?3)
                "#,
            )?;

            for rule in rules {
                stmt.execute(params![
                    seller_id,
                    rule.offer_id,
                    rule.required_total_quantity,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(rules.len())
    }

    /// 查询卖家的必备规则
    pub fn find_by_seller(&self, seller_id: &str) -> RepositoryResult<Vec<MandatoryRule>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT offer_id, required_total_quantity
            FROM mandatory_rule
            WHERE seller_id = ?1
            ORDER BY offer_id
            "#,
        )?;

        let rules = stmt
            .query_map(params![seller_id], |row| {
                Ok(MandatoryRule {
                    offer_id: row.get(0)?,
                    required_total_quantity: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rules)
    }
}
