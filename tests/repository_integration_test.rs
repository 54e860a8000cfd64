// ==========================================
// 仓储层集成测试
// ==========================================
// 职责: 验证各仓储对 SQLite 的读写往返,
//       以及 PlannerApi 端到端闭环
// ==========================================

mod test_helpers;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use seller_replenish_aps::api::PlannerApi;
use seller_replenish_aps::config::{config_keys, ConfigManager, PlannerConfigReader};
use seller_replenish_aps::domain::types::AllocationMode;
use seller_replenish_aps::engine::PlannerRepositories;
use seller_replenish_aps::repository::{
    CampaignRepository, MandatoryRuleRepository, ProductInfoRepository, ReplenishRunRepository,
    SalesRecordRepository, StockSnapshotRepository,
};
use test_helpers::{
    create_test_db, make_product, make_rule, make_sale, make_stock, open_test_connection, SELLER,
};

// ==========================================
// 单仓储往返
// ==========================================

#[test]
fn test_sales_repo_window_query() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repo = SalesRecordRepository::from_connection(conn);

    let in_window = NaiveDate::from_ymd_opt(2026, 7, 10).unwrap();
    let out_of_window = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    repo.insert_batch(&[
        make_sale(100, Some("Москва"), 3, 300.0, in_window),
        make_sale(100, Some("Москва"), 2, 200.0, out_of_window),
    ])
    .unwrap();

    let found = repo
        .find_by_seller_and_window(
            SELLER,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
        )
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].quantity, 3);
    assert_eq!(found[0].cluster_to.as_deref(), Some("Москва"));
}

#[test]
fn test_stock_repo_replace_semantics() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repo = StockSnapshotRepository::from_connection(conn);

    repo.replace_for_seller(SELLER, &[make_stock(100, "Москва", 5, 10)])
        .unwrap();
    // 第二次替换整体覆盖第一次
    repo.replace_for_seller(SELLER, &[make_stock(200, "Сибирь", 7, 0)])
        .unwrap();

    let found = repo.find_by_seller(SELLER).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sku, 200);
    assert_eq!(found[0].free_to_sell, 7);
}

#[test]
fn test_product_and_rule_repos_roundtrip() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let product_repo = ProductInfoRepository::from_connection(conn.clone());
    let rule_repo = MandatoryRuleRepository::from_connection(conn);

    product_repo
        .upsert_batch(SELLER, &[make_product(100, 150.0)])
        .unwrap();
    // UPSERT 更新价格
    let mut updated = make_product(100, 150.0);
    updated.price = 180.0;
    product_repo.upsert_batch(SELLER, &[updated]).unwrap();

    let products = product_repo.find_by_seller(SELLER).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, 180.0);

    rule_repo
        .replace_for_seller(SELLER, &[make_rule(100, 40)])
        .unwrap();
    let rules = rule_repo.find_by_seller(SELLER).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].required_total_quantity, 40);
}

#[test]
fn test_campaign_repo_reads_only_active_states() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();

    {
        let guard = conn.lock().unwrap();
        guard
            .execute_batch(
                r#"
                INSERT INTO ad_campaign (seller_id, sku, campaign_id, state)
                VALUES ('seller-1', 100, 'c1', 'ACTIVE'),
                       ('seller-1', 200, 'c2', 'STOPPED'),
                       ('seller-1', 300, 'c3', 'RUNNING');
                "#,
            )
            .unwrap();
    }

    let repo = CampaignRepository::from_connection(conn);
    let skus = repo.find_campaigned_skus(SELLER).unwrap();

    assert!(skus.contains(&100));
    assert!(skus.contains(&300));
    assert!(!skus.contains(&200));
}

#[test]
fn test_run_repo_save_and_load() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repo = ReplenishRunRepository::from_connection(conn);

    let row = seller_replenish_aps::AllocationRow {
        cluster: "Москва".to_string(),
        sku: 100,
        offer_id: "ART-100".to_string(),
        for_delivery: 10,
        need_goods: 10.0,
        turnover: 30.0,
        avg_daily_share: 1.0,
    };
    let budget = seller_replenish_aps::BudgetAllocation::from_week_budget(100, "ART-100", 700);

    repo.save_run("run-1", SELLER, Utc::now(), &[row], &[budget])
        .unwrap();
    repo.save_run("run-2", SELLER, Utc::now() + Duration::seconds(1), &[], &[])
        .unwrap();

    assert_eq!(
        repo.find_latest_run_id(SELLER).unwrap(),
        Some("run-2".to_string())
    );

    let rows = repo.load_allocation_rows("run-1").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].for_delivery, 10);

    let budget_rows = repo.load_budget_rows("run-1").unwrap();
    assert_eq!(budget_rows.len(), 1);
    assert_eq!(budget_rows[0].day_budget, 100);
}

// ==========================================
// 配置管理器
// ==========================================

#[tokio::test]
async fn test_config_manager_scope_fallback_and_locale_numbers() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let config = ConfigManager::from_connection(conn).unwrap();

    // global 作用域 + 卖家级覆写
    config
        .set_config_value("global", config_keys::LOOKBACK_DAYS, "14")
        .unwrap();
    config
        .set_config_value(SELLER, config_keys::SUPPLY_PERIOD_DAYS, "21")
        .unwrap();
    // 本地化数字串: 逗号小数点 + 不间断空格千分位
    config
        .set_config_value(SELLER, config_keys::SHARE_THRESHOLD, "0,25")
        .unwrap();
    config
        .set_config_value(SELLER, config_keys::WEEK_BUDGET, "12\u{a0}000")
        .unwrap();
    config
        .set_config_value(SELLER, config_keys::ALLOCATION_MODE, "WEIGHTED")
        .unwrap();

    let settings = config.load_planner_settings(SELLER).await.unwrap();

    assert_eq!(settings.lookback_days, 14); // global 回落
    assert_eq!(settings.supply_period_days, 21); // 卖家覆写
    assert_eq!(settings.share_threshold, 0.25);
    assert_eq!(settings.week_budget, 12_000);
    assert_eq!(settings.allocation_mode, AllocationMode::Weighted);
    // 未配置键回落文档化默认值
    assert_eq!(settings.min_budget, 500);
    assert_eq!(settings.abc_a_share, 0.8);
}

#[test]
fn test_config_snapshot_merges_global_and_seller_scope() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let config = ConfigManager::from_connection(conn).unwrap();

    config
        .set_config_value("global", config_keys::LOOKBACK_DAYS, "14")
        .unwrap();
    config
        .set_config_value(SELLER, config_keys::LOOKBACK_DAYS, "30")
        .unwrap();
    config
        .set_config_value("global", config_keys::MIN_BUDGET, "600")
        .unwrap();

    let snapshot = config.get_config_snapshot(SELLER).unwrap();
    let parsed: std::collections::HashMap<String, String> =
        serde_json::from_str(&snapshot).unwrap();

    // 卖家级覆写 global,未覆写的键保留 global 值
    assert_eq!(parsed.get("lookback_days").map(String::as_str), Some("30"));
    assert_eq!(parsed.get("min_budget").map(String::as_str), Some("600"));
}

#[tokio::test]
async fn test_config_manager_malformed_value_falls_back_to_default() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let config = ConfigManager::from_connection(conn).unwrap();

    config
        .set_config_value(SELLER, config_keys::LOOKBACK_DAYS, "不是数字")
        .unwrap();

    let settings = config.load_planner_settings(SELLER).await.unwrap();
    assert_eq!(settings.lookback_days, 30); // 解析失败 → 默认值,不中断
}

// ==========================================
// PlannerApi 端到端
// ==========================================

#[tokio::test]
async fn test_planner_api_end_to_end() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();

    // 准备数据: 近窗口内的销售 + 库存 + 参照
    let repos = PlannerRepositories::from_connection(conn.clone());
    let today = Utc::now().date_naive();
    repos
        .sales_repo
        .insert_batch(&[
            make_sale(100, Some("Москва"), 30, 3000.0, today - Duration::days(3)),
            make_sale(200, Some("Сибирь"), 10, 9000.0, today - Duration::days(5)),
        ])
        .unwrap();
    repos
        .stock_repo
        .replace_for_seller(SELLER, &[make_stock(200, "Сибирь", 50, 0)])
        .unwrap();
    repos
        .product_repo
        .upsert_batch(SELLER, &[make_product(100, 100.0), make_product(200, 900.0)])
        .unwrap();

    let config = Arc::new(ConfigManager::from_connection(conn).unwrap());
    config
        .set_config_value(SELLER, config_keys::WEEK_BUDGET, "2000")
        .unwrap();
    config
        .set_config_value(SELLER, config_keys::BUDGET_FILTER_STOCK, "0")
        .unwrap();

    let api = PlannerApi::new(config, repos.clone());
    let report = api.run_for_seller(SELLER).await.unwrap();

    // 结果落库可回读
    assert_eq!(
        repos.run_repo.find_latest_run_id(SELLER).unwrap(),
        Some(report.run_id.clone())
    );
    let persisted = repos.run_repo.load_allocation_rows(&report.run_id).unwrap();
    assert_eq!(persisted.len(), report.plan.allocation_rows.len());

    // 报表行: 表头 + 数据行
    let allocation_table = report.allocation_table();
    assert_eq!(allocation_table[0].len(), 7);
    assert_eq!(allocation_table.len(), 1 + report.plan.allocation_rows.len());

    let abc_table = report.abc_table();
    assert_eq!(abc_table.len(), 1 + report.plan.abc_rows.len());

    let budget_table = report.budget_table();
    assert_eq!(budget_table.len(), 1 + report.plan.budget.rows().len());
    assert!(!report.plan.budget.rows().is_empty());
}

#[tokio::test]
async fn test_planner_api_rejects_blank_seller() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let config = Arc::new(ConfigManager::from_connection(conn.clone()).unwrap());
    let repos = PlannerRepositories::from_connection(conn);

    let api = PlannerApi::new(config, repos);
    assert!(api.run_for_seller("  ").await.is_err());
}
