// ==========================================
// 引擎间集成测试
// ==========================================
// 职责: 验证指标聚合 → 周转过滤 → 补货计算 → 必备再分配
//       的协作与数据流转
// ==========================================

mod test_helpers;

use std::collections::HashSet;

use chrono::NaiveDate;
use seller_replenish_aps::config::PlannerSettings;
use seller_replenish_aps::domain::types::{AllocationMode, SortKey};
use seller_replenish_aps::engine::ReplenishOrchestrator;
use test_helpers::{make_product, make_rule, make_sale, make_stock};

fn obs_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
}

// ==========================================
// 参考场景
// ==========================================

#[test]
fn test_reference_scenario_single_cluster_even() {
    // days=30, Москва 集群 SKU 100 销量 30 (日均 1), 库存 0,
    // EVEN, 备货期 10, 1 个集群 → need = 10, for_delivery = 10
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        allocation_mode: AllocationMode::Even,
        ..Default::default()
    };

    let sales = vec![make_sale(100, Some("Москва"), 30, 3000.0, obs_date())];
    let products = vec![make_product(100, 100.0)];

    let result = orchestrator.execute(&sales, &[], &products, &[], &HashSet::new(), &settings);

    assert_eq!(result.cluster_count, 1);
    assert_eq!(result.allocation_rows.len(), 1);
    let row = &result.allocation_rows[0];
    assert_eq!(row.cluster, "Москва");
    assert_eq!(row.need_goods, 10.0);
    assert_eq!(row.for_delivery, 10);
    assert_eq!(result.summary.total_for("ART-100"), 10);
}

// ==========================================
// 必备商品性质
// ==========================================

#[test]
fn test_mandatory_floor_holds_end_to_end() {
    // SKU 200: 库存合计 5, 必备要求 60 → 缺口 55 跨集群分摊
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        ..Default::default()
    };

    let sales = vec![
        make_sale(200, Some("Москва"), 20, 8000.0, obs_date()),
        make_sale(200, Some("Сибирь"), 10, 2000.0, obs_date()),
    ];
    let stocks = vec![make_stock(200, "Москва", 3, 0), make_stock(200, "Сибирь", 2, 0)];
    let products = vec![make_product(200, 100.0)];
    let rules = vec![make_rule(200, 60)];

    let result =
        orchestrator.execute(&sales, &stocks, &products, &rules, &HashSet::new(), &settings);

    let delivered: i64 = result
        .allocation_rows
        .iter()
        .filter(|r| r.sku == 200)
        .map(|r| r.for_delivery)
        .sum();
    let touched = result
        .allocation_rows
        .iter()
        .filter(|r| r.sku == 200)
        .count() as i64;

    // 每个命中集群允许 1 件取整容差
    assert!(delivered + 5 >= 60 - touched);
}

#[test]
fn test_pipeline_is_idempotent_for_same_snapshot() {
    // 同一快照重复执行,产出完全一致（含必备再分配）
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        ..Default::default()
    };

    let sales = vec![
        make_sale(100, Some("Москва"), 30, 3000.0, obs_date()),
        make_sale(200, Some("Сибирь"), 15, 4500.0, obs_date()),
    ];
    let stocks = vec![make_stock(200, "Сибирь", 2, 0)];
    let products = vec![make_product(100, 100.0), make_product(200, 300.0)];
    let rules = vec![make_rule(200, 30)];

    let first =
        orchestrator.execute(&sales, &stocks, &products, &rules, &HashSet::new(), &settings);
    let second =
        orchestrator.execute(&sales, &stocks, &products, &rules, &HashSet::new(), &settings);

    let fingerprint = |rows: &[seller_replenish_aps::AllocationRow]| -> Vec<(String, i64, i64)> {
        rows.iter()
            .map(|r| (r.cluster.clone(), r.sku, r.for_delivery))
            .collect()
    };
    assert_eq!(
        fingerprint(&first.allocation_rows),
        fingerprint(&second.allocation_rows)
    );
}

#[test]
fn test_mandatory_sufficient_stock_keeps_standard_allocation() {
    // 库存已满足必备要求 → 标准分配结果不被覆写
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        ..Default::default()
    };

    let sales = vec![make_sale(100, Some("Москва"), 30, 3000.0, obs_date())];
    let stocks = vec![make_stock(100, "Сибирь", 100, 0)];
    let products = vec![make_product(100, 100.0)];
    let rules = vec![make_rule(100, 50)];

    let with_rule =
        orchestrator.execute(&sales, &stocks, &products, &rules, &HashSet::new(), &settings);
    let without_rule =
        orchestrator.execute(&sales, &stocks, &products, &[], &HashSet::new(), &settings);

    // 库存 100 ≥ 要求 50: 正向行集合一致
    let positive = |result: &seller_replenish_aps::engine::PlanResult| -> Vec<(String, i64)> {
        result
            .allocation_rows
            .iter()
            .filter(|r| r.for_delivery > 0)
            .map(|r| (r.cluster.clone(), r.for_delivery))
            .collect()
    };
    assert_eq!(positive(&with_rule), positive(&without_rule));
}

// ==========================================
// 过滤与排序
// ==========================================

#[test]
fn test_turnover_band_excludes_overstocked_sku_end_to_end() {
    // SKU 100: 周转 60 天 > 上限 45 → 整个 SKU 无建议行
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        max_turnover: Some(45.0),
        include_all: true,
        ..Default::default()
    };

    let sales = vec![make_sale(100, Some("Москва"), 30, 3000.0, obs_date())];
    let stocks = vec![make_stock(100, "Москва", 60, 0)];
    let products = vec![make_product(100, 100.0)];

    let result =
        orchestrator.execute(&sales, &stocks, &products, &[], &HashSet::new(), &settings);
    assert!(result.allocation_rows.is_empty());
}

#[test]
fn test_price_band_and_exclusion_list_applied_at_selection() {
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        price_min: Some(50.0),
        price_max: Some(500.0),
        excluded_offer_ids: vec!["ART-300".to_string()],
        ..Default::default()
    };

    let sales = vec![
        make_sale(100, Some("Москва"), 30, 3000.0, obs_date()), // 价内
        make_sale(200, Some("Москва"), 30, 30000.0, obs_date()), // 价格超带
        make_sale(300, Some("Москва"), 30, 3000.0, obs_date()), // 显式排除
    ];
    let products = vec![
        make_product(100, 100.0),
        make_product(200, 1000.0),
        make_product(300, 100.0),
    ];

    let result = orchestrator.execute(&sales, &[], &products, &[], &HashSet::new(), &settings);

    let skus: HashSet<i64> = result.allocation_rows.iter().map(|r| r.sku).collect();
    assert!(skus.contains(&100));
    assert!(!skus.contains(&200));
    assert!(!skus.contains(&300));
}

#[test]
fn test_rows_sorted_descending_by_revenue_key() {
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings {
        lookback_days: 30,
        supply_period_days: 10,
        sort_key: SortKey::Revenue,
        ..Default::default()
    };

    let sales = vec![
        make_sale(100, Some("Москва"), 10, 1000.0, obs_date()),
        make_sale(200, Some("Москва"), 10, 9000.0, obs_date()),
        make_sale(300, Some("Москва"), 10, 5000.0, obs_date()),
    ];
    let products = vec![
        make_product(100, 100.0),
        make_product(200, 900.0),
        make_product(300, 500.0),
    ];

    let result = orchestrator.execute(&sales, &[], &products, &[], &HashSet::new(), &settings);

    let skus: Vec<i64> = result.allocation_rows.iter().map(|r| r.sku).collect();
    assert_eq!(skus, vec![200, 300, 100]);
}

#[test]
fn test_empty_snapshot_yields_empty_plan_not_error() {
    let orchestrator = ReplenishOrchestrator::new();
    let settings = PlannerSettings::default();

    let result = orchestrator.execute(&[], &[], &[], &[], &HashSet::new(), &settings);

    assert!(result.allocation_rows.is_empty());
    assert!(result.abc_rows.is_empty());
    assert!(result.budget.rows().is_empty());
    assert_eq!(result.cluster_count, 0);
}
