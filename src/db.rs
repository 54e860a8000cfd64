// ==========================================
// 卖家补货决策系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句，仓储层不各自持有 DDL
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// 说明：输入快照表按 (卖家, 维度键) 唯一；运行产出表以 run_id 归属。
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS sales_record (
            seller_id        TEXT NOT NULL,
            sku              INTEGER NOT NULL,
            offer_id         TEXT NOT NULL,
            cluster_to       TEXT,
            quantity         INTEGER NOT NULL,
            revenue_amount   REAL NOT NULL,
            observation_date TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sales_seller_date
            ON sales_record (seller_id, observation_date);

        CREATE TABLE IF NOT EXISTS stock_snapshot (
            seller_id        TEXT NOT NULL,
            sku              INTEGER NOT NULL,
            cluster          TEXT NOT NULL,
            scheme           TEXT NOT NULL,
            free_to_sell     INTEGER NOT NULL,
            reserved         INTEGER NOT NULL,
            in_transit       INTEGER NOT NULL,
            requested_supply INTEGER NOT NULL,
            observed_at      TEXT NOT NULL,
            PRIMARY KEY (seller_id, sku, cluster, scheme)
        );

        CREATE TABLE IF NOT EXISTS product_info (
            seller_id TEXT NOT NULL,
            sku       INTEGER NOT NULL,
            offer_id  TEXT NOT NULL,
            name      TEXT NOT NULL,
            price     REAL NOT NULL,
            barcode   TEXT,
            PRIMARY KEY (seller_id, sku)
        );

        CREATE TABLE IF NOT EXISTS mandatory_rule (
            seller_id               TEXT NOT NULL,
            offer_id                TEXT NOT NULL,
            required_total_quantity INTEGER NOT NULL,
            PRIMARY KEY (seller_id, offer_id)
        );

        CREATE TABLE IF NOT EXISTS ad_campaign (
            seller_id   TEXT NOT NULL,
            sku         INTEGER NOT NULL,
            campaign_id TEXT NOT NULL,
            state       TEXT NOT NULL,
            PRIMARY KEY (seller_id, sku, campaign_id)
        );

        CREATE TABLE IF NOT EXISTS replenish_run (
            run_id     TEXT PRIMARY KEY,
            seller_id  TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS allocation_row (
            run_id          TEXT NOT NULL REFERENCES replenish_run(run_id) ON DELETE CASCADE,
            cluster         TEXT NOT NULL,
            sku             INTEGER NOT NULL,
            offer_id        TEXT NOT NULL,
            for_delivery    INTEGER NOT NULL,
            need_goods      REAL NOT NULL,
            turnover        REAL NOT NULL,
            avg_daily_share REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_allocation_run
            ON allocation_row (run_id);

        CREATE TABLE IF NOT EXISTS budget_row (
            run_id      TEXT NOT NULL REFERENCES replenish_run(run_id) ON DELETE CASCADE,
            sku         INTEGER NOT NULL,
            offer_id    TEXT NOT NULL,
            week_budget INTEGER NOT NULL,
            day_budget  INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_budget_run
            ON budget_row (run_id);
        "#,
    )?;
    Ok(())
}
