// ==========================================
// 卖家补货决策系统 - 引擎编排器
// ==========================================
// 用途: 协调指标聚合、周转过滤、补货计算、必备再分配、
//       ABC 分级与预算分配的执行顺序
// 红线: 纯同步批计算,单卖家快照,不做 I/O
// ==========================================

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::config::planner_settings::PlannerSettings;
use crate::domain::allocation::{AllocationRow, AllocationSummary};
use crate::domain::budget::{AbcRow, BudgetOutcome};
use crate::domain::product::{MandatoryRule, ProductInfo};
use crate::domain::sales::SalesRecord;
use crate::domain::stock::StockRecord;
use crate::domain::types::SortKey;
use crate::engine::abc::AbcClassifier;
use crate::engine::budget::{BudgetAllocator, BudgetCandidate};
use crate::engine::mandatory::MandatoryRedistributor;
use crate::engine::metrics::{MetricAggregator, SellerMetrics};
use crate::engine::replenish::{ReplenishCalculator, ReplenishInput};
use crate::engine::turnover::{TurnoverBand, TurnoverFilter};

// ==========================================
// PlanResult - 规划结果
// ==========================================

#[derive(Debug, Clone)]
pub struct PlanResult {
    // 补货输出
    pub allocation_rows: Vec<AllocationRow>,
    pub summary: AllocationSummary,
    pub cluster_count: usize,

    // ABC 输出
    pub abc_rows: Vec<AbcRow>,

    // 预算输出
    pub budget: BudgetOutcome,
}

// ==========================================
// ReplenishOrchestrator - 引擎编排器
// ==========================================

pub struct ReplenishOrchestrator {
    aggregator: MetricAggregator,
    turnover_filter: TurnoverFilter,
    calculator: ReplenishCalculator,
    redistributor: MandatoryRedistributor,
    classifier: AbcClassifier,
    budget_allocator: BudgetAllocator,
}

impl ReplenishOrchestrator {
    /// 创建新的编排器实例
    pub fn new() -> Self {
        Self {
            aggregator: MetricAggregator::new(),
            turnover_filter: TurnoverFilter::new(),
            calculator: ReplenishCalculator::new(),
            redistributor: MandatoryRedistributor::new(),
            classifier: AbcClassifier::new(),
            budget_allocator: BudgetAllocator::new(),
        }
    }

    /// 执行完整规划流程（单卖家快照）
    ///
    /// # 参数
    /// - sales: 追溯窗口内的销售记录
    /// - stocks: 当前库存快照
    /// - products: 商品参照列表
    /// - mandatory_rules: 必备商品规则
    /// - campaigned_skus: 已有在投广告活动的 SKU（外部只读视图）
    /// - settings: 规划配置快照
    ///
    /// # 返回
    /// 规划结果（补货行 + 汇总 + ABC 表 + 预算表）
    pub fn execute(
        &self,
        sales: &[SalesRecord],
        stocks: &[StockRecord],
        products: &[ProductInfo],
        mandatory_rules: &[MandatoryRule],
        campaigned_skus: &HashSet<i64>,
        settings: &PlannerSettings,
    ) -> PlanResult {
        info!(
            sales_count = sales.len(),
            stock_count = stocks.len(),
            products_count = products.len(),
            mode = %settings.allocation_mode,
            "开始执行规划流程"
        );

        // ==========================================
        // 步骤1: Metric Aggregator - 指标聚合
        // ==========================================
        debug!("步骤1: 执行指标聚合");

        let metrics = self.aggregator.aggregate(sales, stocks);

        info!(
            cluster_count = metrics.cluster_count(),
            sku_count = metrics.active_skus().len(),
            total_revenue = metrics.total_revenue,
            "指标聚合完成"
        );

        // ==========================================
        // 步骤2: 商品选择 - 价格带与排除清单
        // ==========================================
        debug!("步骤2: 执行商品选择");

        let eligible = self.select_products(products, settings);

        // ==========================================
        // 步骤3: Turnover Filter - 周转过滤
        // ==========================================
        debug!("步骤3: 执行周转过滤");

        let band = TurnoverBand {
            min_turnover: settings.min_turnover,
            max_turnover: settings.max_turnover,
            min_required_stock: settings.min_required_stock,
        };
        let surviving = self.turnover_filter.filter(
            &metrics,
            eligible.keys().copied(),
            settings.lookback_days,
            &band,
        );

        info!(
            eligible_count = eligible.len(),
            surviving_count = surviving.len(),
            "周转过滤完成"
        );

        // ==========================================
        // 步骤4: Replenish Calculator - 补货计算
        // ==========================================
        debug!("步骤4: 执行补货计算");

        let mandatory_skus: HashSet<i64> = {
            let sku_by_offer: HashMap<&str, i64> = eligible
                .values()
                .map(|p| (p.offer_id.as_str(), p.sku))
                .collect();
            mandatory_rules
                .iter()
                .filter_map(|rule| sku_by_offer.get(rule.offer_id.as_str()).copied())
                .collect()
        };

        let mut allocation_rows = self.calculator.calculate(&ReplenishInput {
            metrics: &metrics,
            products: &eligible,
            turnover: &surviving,
            mandatory_skus: &mandatory_skus,
            settings,
        });

        info!(rows_count = allocation_rows.len(), "补货计算完成");

        // ==========================================
        // 步骤5: Mandatory Redistributor - 必备商品再分配
        // ==========================================
        debug!("步骤5: 执行必备商品再分配");

        self.redistributor
            .redistribute(&mut allocation_rows, mandatory_rules, &eligible, &metrics);

        // ==========================================
        // 步骤6: 结果排序与汇总
        // ==========================================
        self.sort_rows(&mut allocation_rows, &metrics, settings.sort_key);
        let summary = AllocationSummary::from_rows(&allocation_rows);

        // ==========================================
        // 步骤7: ABC Classifier - 营收分级
        // ==========================================
        debug!("步骤7: 执行 ABC 分级");

        let abc_rows = self.classify_abc(&metrics, &eligible, settings);

        // ==========================================
        // 步骤8: Budget Allocator - 预算分配
        // ==========================================
        debug!("步骤8: 执行预算分配");

        let budget =
            self.allocate_budget(&abc_rows, &metrics, &eligible, campaigned_skus, settings);

        info!(
            allocation_rows = allocation_rows.len(),
            abc_rows = abc_rows.len(),
            budget_rows = budget.rows().len(),
            "规划流程执行完成"
        );

        PlanResult {
            allocation_rows,
            summary,
            cluster_count: metrics.cluster_count(),
            abc_rows,
            budget,
        }
    }

    // ==========================================
    // 分步方法
    // ==========================================

    /// 商品选择: 价格带 + 排除货号清单
    ///
    /// # 返回
    /// SKU → 商品参照 (入选集)
    pub fn select_products(
        &self,
        products: &[ProductInfo],
        settings: &PlannerSettings,
    ) -> HashMap<i64, ProductInfo> {
        products
            .iter()
            .filter(|p| settings.price_in_band(p.price))
            .filter(|p| !settings.excluded_offer_ids.contains(&p.offer_id))
            .map(|p| (p.sku, p.clone()))
            .collect()
    }

    /// ABC 分级: 卖家级追溯营收口径
    ///
    /// 只对有销售活动的入选商品分级。
    pub fn classify_abc(
        &self,
        metrics: &SellerMetrics,
        eligible: &HashMap<i64, ProductInfo>,
        settings: &PlannerSettings,
    ) -> Vec<AbcRow> {
        // 出现顺序固定为 SKU 升序,保证同营收并列时结果稳定
        let mut items: Vec<(i64, f64)> = eligible
            .keys()
            .filter(|sku| metrics.product_qty.contains_key(*sku))
            .map(|&sku| (sku, metrics.total_revenue_for(sku)))
            .collect();
        items.sort_by_key(|(sku, _)| *sku);

        let labeled = self
            .classifier
            .classify(&items, settings.abc_a_share, settings.abc_b_share);

        labeled
            .into_iter()
            .filter_map(|(sku, revenue, label)| {
                let product = eligible.get(&sku)?;
                let units = metrics.total_quantity_for(sku);
                let avg_price = if units == 0 {
                    0.0
                } else {
                    revenue / units as f64
                };
                Some(AbcRow {
                    offer_id: product.offer_id.clone(),
                    sku,
                    revenue,
                    units,
                    avg_price,
                    label,
                })
            })
            .collect()
    }

    /// 预算分配: ABC 排名顺序 + 三项独立筛选开关
    pub fn allocate_budget(
        &self,
        abc_rows: &[AbcRow],
        metrics: &SellerMetrics,
        eligible: &HashMap<i64, ProductInfo>,
        campaigned_skus: &HashSet<i64>,
        settings: &PlannerSettings,
    ) -> BudgetOutcome {
        let candidates: Vec<BudgetCandidate> = abc_rows
            .iter()
            .filter(|row| {
                if settings.budget_filter_price {
                    let in_band = eligible
                        .get(&row.sku)
                        .map(|p| settings.price_in_band(p.price))
                        .unwrap_or(false);
                    if !in_band {
                        return false;
                    }
                }
                if settings.budget_filter_stock {
                    let stock = metrics.total_stock_for(row.sku);
                    if stock <= 0 || stock < settings.min_required_stock {
                        return false;
                    }
                }
                if settings.budget_filter_campaigned && campaigned_skus.contains(&row.sku) {
                    return false;
                }
                true
            })
            .map(|row| BudgetCandidate {
                sku: row.sku,
                offer_id: row.offer_id.clone(),
                revenue: row.revenue,
            })
            .collect();

        self.budget_allocator.allocate(
            &candidates,
            settings.week_budget,
            settings.min_budget,
            settings.max_items,
            settings.budget_mode,
        )
    }

    /// 按调用方指定口径降序排序补货行
    fn sort_rows(&self, rows: &mut [AllocationRow], metrics: &SellerMetrics, sort_key: SortKey) {
        rows.sort_by(|a, b| {
            let key = |row: &AllocationRow| -> f64 {
                match sort_key {
                    SortKey::Quantity => metrics.sales_quantity(&row.cluster, row.sku) as f64,
                    SortKey::Revenue => metrics.sales_revenue(&row.cluster, row.sku),
                    SortKey::Recommendation => {
                        metrics.recommendation(&row.cluster, row.sku) as f64
                    }
                }
            };
            key(b).total_cmp(&key(a))
        });
    }
}

impl Default for ReplenishOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
