use std::collections::{HashMap, HashSet};

use crate::config::planner_settings::PlannerSettings;
use crate::domain::allocation::AllocationRow;
use crate::domain::product::ProductInfo;
use crate::domain::types::AllocationMode;
use crate::engine::metrics::SellerMetrics;

// ==========================================
// ReplenishInput - 补货计算输入
// ==========================================
pub struct ReplenishInput<'a> {
    /// 聚合指标
    pub metrics: &'a SellerMetrics,
    /// SKU → 商品参照 (缺失参照的 SKU 被静默跳过)
    pub products: &'a HashMap<i64, ProductInfo>,
    /// 存活 SKU → 展示口径周转值 (周转过滤引擎的输出)
    pub turnover: &'a HashMap<i64, f64>,
    /// 必备商品 SKU 集 (非正行保留给再分配引擎处理)
    pub mandatory_skus: &'a HashSet<i64>,
    /// 规划配置快照
    pub settings: &'a PlannerSettings,
}

// ==========================================
// ReplenishCalculator - 补货计算引擎
// ==========================================
pub struct ReplenishCalculator {
    // 无状态引擎,不需要注入依赖
}

impl ReplenishCalculator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算全部 (集群, SKU) 的补货建议行
    ///
    /// 模式口径 (按行评估):
    /// - EVEN:     need = (销量/天数) * 备货期 / 集群数
    /// - WEIGHTED: 份额 ≥ 阈值 → need = (销量/天数) * 备货期 * 份额
    ///             份额 < 阈值 → need = (销量/天数) * 备货期 * 阈值
    /// - CLUSTER_RECOMMENDATION: need = 平台集群供货建议
    ///
    /// for_delivery = round(need - 集群库存),只在此处取整。
    ///
    /// # 返回
    /// 建议行列表; 除非 include_all,取整后 ≤ 0 的行被丢弃,
    /// 但必备商品的行无条件保留
    pub fn calculate(&self, input: &ReplenishInput<'_>) -> Vec<AllocationRow> {
        let metrics = input.metrics;
        let settings = input.settings;
        let cluster_count = metrics.cluster_count();

        let mut rows: Vec<AllocationRow> = Vec::new();

        // SKU 升序遍历,保证同快照重复运行产出顺序一致
        let mut skus: Vec<i64> = input.turnover.keys().copied().collect();
        skus.sort_unstable();

        for sku in skus {
            let turnover = input.turnover[&sku];
            // 缺失商品参照 → 无法产出行,静默跳过
            let product = match input.products.get(&sku) {
                Some(p) => p,
                None => continue,
            };

            let qty_total = metrics.total_quantity_for(sku);
            let revenue_total = metrics.total_revenue_for(sku);
            let avg_daily = if settings.lookback_days == 0 {
                0.0
            } else {
                qty_total as f64 / settings.lookback_days as f64
            };

            for cluster in &metrics.clusters {
                let metric = metrics.cluster_metric(cluster, sku);

                let need_goods = match settings.allocation_mode {
                    AllocationMode::Even => {
                        if cluster_count == 0 {
                            0.0
                        } else {
                            avg_daily * settings.supply_period_days as f64 / cluster_count as f64
                        }
                    }
                    AllocationMode::Weighted => {
                        let share = if revenue_total == 0.0 {
                            0.0
                        } else {
                            metric.revenue / revenue_total
                        };
                        let factor = if share >= settings.share_threshold {
                            share
                        } else {
                            settings.share_threshold
                        };
                        avg_daily * settings.supply_period_days as f64 * factor
                    }
                    AllocationMode::ClusterRecommendation => {
                        metrics.recommendation(cluster, sku) as f64
                    }
                };

                let for_delivery = (need_goods - metric.cluster_stock as f64).round() as i64;

                if for_delivery <= 0
                    && !settings.include_all
                    && !input.mandatory_skus.contains(&sku)
                {
                    continue;
                }

                let avg_daily_share = if qty_total == 0 {
                    0.0
                } else {
                    metric.quantity_sold as f64 / qty_total as f64
                };

                rows.push(AllocationRow {
                    cluster: cluster.clone(),
                    sku,
                    offer_id: product.offer_id.clone(),
                    for_delivery,
                    need_goods,
                    turnover,
                    avg_daily_share,
                });
            }
        }

        rows
    }
}

impl Default for ReplenishCalculator {
    fn default() -> Self {
        Self::new()
    }
}
