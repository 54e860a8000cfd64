// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use tempfile::NamedTempFile;
use seller_replenish_aps::domain::product::{MandatoryRule, ProductInfo};
use seller_replenish_aps::domain::sales::SalesRecord;
use seller_replenish_aps::domain::stock::StockRecord;
use seller_replenish_aps::domain::types::StockScheme;

pub const SELLER: &str = "seller-1";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = seller_replenish_aps::db::open_sqlite_connection(&db_path)?;
    seller_replenish_aps::db::ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    let conn = seller_replenish_aps::db::open_sqlite_connection(db_path)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// 创建测试用销售记录
pub fn make_sale(
    sku: i64,
    cluster: Option<&str>,
    quantity: i64,
    revenue: f64,
    date: NaiveDate,
) -> SalesRecord {
    SalesRecord {
        seller_id: SELLER.to_string(),
        sku,
        offer_id: format!("ART-{}", sku),
        cluster_to: cluster.map(|s| s.to_string()),
        quantity,
        revenue_amount: revenue,
        observation_date: date,
    }
}

/// 创建测试用库存快照
pub fn make_stock(sku: i64, cluster: &str, free_to_sell: i64, requested_supply: i64) -> StockRecord {
    StockRecord {
        seller_id: SELLER.to_string(),
        sku,
        cluster: cluster.to_string(),
        scheme: StockScheme::Fbo,
        free_to_sell,
        reserved: 0,
        in_transit: 0,
        requested_supply,
        observed_at: Utc::now(),
    }
}

/// 创建测试用商品参照
pub fn make_product(sku: i64, price: f64) -> ProductInfo {
    ProductInfo {
        sku,
        offer_id: format!("ART-{}", sku),
        name: format!("商品 {}", sku),
        price,
        barcode: Some(format!("460{:010}", sku)),
    }
}

/// 创建测试用必备规则
pub fn make_rule(sku: i64, required: i64) -> MandatoryRule {
    MandatoryRule {
        offer_id: format!("ART-{}", sku),
        required_total_quantity: required,
    }
}
