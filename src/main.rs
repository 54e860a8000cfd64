// ==========================================
// 跨境电商卖家补货与预算决策支持系统 - 批处理入口
// ==========================================
// 技术栈: Rust + SQLite
// 用法: seller-replenish-aps [--db <路径>] <seller_id>...
// 并发: 卖家之间天然并行（各自只读自己的快照、只写自己的运行）
// ==========================================

use std::sync::{Arc, Mutex};

use seller_replenish_aps::api::PlannerApi;
use seller_replenish_aps::config::ConfigManager;
use seller_replenish_aps::db;
use seller_replenish_aps::engine::PlannerRepositories;
use seller_replenish_aps::logging;

/// 默认数据库路径（数据目录下）
fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    base.join("seller-replenish-aps")
        .join("aps.db")
        .display()
        .to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", seller_replenish_aps::APP_NAME);
    tracing::info!("系统版本: {}", seller_replenish_aps::VERSION);
    tracing::info!("==================================================");

    // 参数解析: [--db <路径>] <seller_id>...
    let mut args = std::env::args().skip(1);
    let mut db_path = get_default_db_path();
    let mut sellers: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--db" {
            db_path = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("--db 需要指定路径"))?;
        } else {
            sellers.push(arg);
        }
    }
    if sellers.is_empty() {
        anyhow::bail!("至少指定一个 seller_id");
    }

    tracing::info!("使用数据库: {}", db_path);

    // 初始化数据库与仓储
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_sqlite_connection(&db_path)?;
    db::ensure_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let config = Arc::new(ConfigManager::from_connection(conn.clone()).map_err(|e| {
        anyhow::anyhow!("配置管理器初始化失败: {}", e)
    })?);
    let repos = PlannerRepositories::from_connection(conn);
    let api = Arc::new(PlannerApi::new(config, repos));

    // 卖家级并行: 每个卖家一次独立的规划运行
    let mut handles = Vec::new();
    for seller_id in sellers {
        let api = api.clone();
        handles.push(tokio::spawn(async move {
            match api.run_for_seller(&seller_id).await {
                Ok(report) => {
                    tracing::info!(
                        seller_id = %report.seller_id,
                        run_id = %report.run_id,
                        allocation_rows = report.plan.allocation_rows.len(),
                        "卖家规划完成"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(seller_id = %seller_id, error = %e, "卖家规划失败");
                    Err(e)
                }
            }
        }));
    }

    let mut failed = 0usize;
    for joined in futures::future::join_all(handles).await {
        if joined?.is_err() {
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} 个卖家规划失败", failed);
    }

    tracing::info!("全部卖家规划完成");
    Ok(())
}
