// ==========================================
// 卖家补货决策系统 - 指标聚合引擎
// ==========================================
// 职责: 把平铺的销售/库存记录聚合为集群级指标
// 输入: 单卖家追溯窗口内的 SalesRecord / StockRecord
// 输出: SellerMetrics (全部派生量,每次运行全量重算)
// 红线: 空输入产出空指标,不是错误; 下游除法必须零保护
// ==========================================

use std::collections::{BTreeSet, HashMap};

use crate::domain::allocation::{ClusterMetric, ClusterSku};
use crate::domain::sales::SalesRecord;
use crate::domain::stock::StockRecord;

// ==========================================
// SalesAgg - (集群, SKU) 销售聚合
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesAgg {
    pub quantity: i64, // 销量
    pub revenue: f64,  // 营收
}

// ==========================================
// SellerMetrics - 卖家级派生指标
// ==========================================
// 生命周期: 单次运行内有效,纯粹由输入快照推导
#[derive(Debug, Clone, Default)]
pub struct SellerMetrics {
    /// (集群, SKU) → 销售聚合
    pub sales: HashMap<ClusterSku, SalesAgg>,
    /// SKU → 全集群销量合计
    pub product_qty: HashMap<i64, i64>,
    /// SKU → 全集群营收合计
    pub product_revenue: HashMap<i64, f64>,
    /// (集群, SKU) → 集群库存 (命名计数器合并后)
    pub stock: HashMap<ClusterSku, i64>,
    /// SKU → 全集群库存合计
    pub total_stock: HashMap<i64, i64>,
    /// (集群, SKU) → 平台供货建议量
    pub requested_supply: HashMap<ClusterSku, i64>,
    /// 集群 → 卖家营收合计 (必备商品再分配的权重来源)
    pub cluster_revenue: HashMap<String, f64>,
    /// 卖家营收总计
    pub total_revenue: f64,
    /// 有任意销售或库存活动的集群 (有序,保证遍历稳定)
    pub clusters: BTreeSet<String>,
}

impl SellerMetrics {
    /// 本轮活跃集群数 (EVEN 模式的除数)
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// 集群级销量
    pub fn sales_quantity(&self, cluster: &str, sku: i64) -> i64 {
        self.sales
            .get(&ClusterSku::new(cluster, sku))
            .map(|agg| agg.quantity)
            .unwrap_or(0)
    }

    /// 集群级营收
    pub fn sales_revenue(&self, cluster: &str, sku: i64) -> f64 {
        self.sales
            .get(&ClusterSku::new(cluster, sku))
            .map(|agg| agg.revenue)
            .unwrap_or(0.0)
    }

    /// 集群级库存
    pub fn cluster_stock(&self, cluster: &str, sku: i64) -> i64 {
        self.stock
            .get(&ClusterSku::new(cluster, sku))
            .copied()
            .unwrap_or(0)
    }

    /// SKU 全集群库存
    pub fn total_stock_for(&self, sku: i64) -> i64 {
        self.total_stock.get(&sku).copied().unwrap_or(0)
    }

    /// SKU 全集群销量
    pub fn total_quantity_for(&self, sku: i64) -> i64 {
        self.product_qty.get(&sku).copied().unwrap_or(0)
    }

    /// SKU 全集群营收
    pub fn total_revenue_for(&self, sku: i64) -> f64 {
        self.product_revenue.get(&sku).copied().unwrap_or(0.0)
    }

    /// 集群供货建议量
    pub fn recommendation(&self, cluster: &str, sku: i64) -> i64 {
        self.requested_supply
            .get(&ClusterSku::new(cluster, sku))
            .copied()
            .unwrap_or(0)
    }

    /// (集群, SKU) 的完整派生指标视图
    pub fn cluster_metric(&self, cluster: &str, sku: i64) -> ClusterMetric {
        ClusterMetric {
            quantity_sold: self.sales_quantity(cluster, sku),
            revenue: self.sales_revenue(cluster, sku),
            cluster_stock: self.cluster_stock(cluster, sku),
            total_stock_all_clusters: self.total_stock_for(sku),
        }
    }

    /// 出现过活动的 SKU 全集 (销售 ∪ 库存)
    pub fn active_skus(&self) -> BTreeSet<i64> {
        let mut skus: BTreeSet<i64> = self.product_qty.keys().copied().collect();
        skus.extend(self.total_stock.keys().copied());
        skus
    }
}

// ==========================================
// MetricAggregator - 指标聚合引擎
// ==========================================
pub struct MetricAggregator {
    // 无状态引擎,不需要注入依赖
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合销售与库存记录
    ///
    /// # 参数
    /// - `sales`: 追溯窗口内的销售记录（窗口过滤由仓储查询完成）
    /// - `stocks`: 当前库存快照
    ///
    /// # 返回
    /// 卖家级派生指标；空输入得到空指标
    pub fn aggregate(&self, sales: &[SalesRecord], stocks: &[StockRecord]) -> SellerMetrics {
        let mut metrics = SellerMetrics::default();

        for record in sales {
            let cluster = record.cluster_key();
            let key = ClusterSku::new(cluster.clone(), record.sku);

            let agg = metrics.sales.entry(key).or_default();
            agg.quantity += record.quantity;
            agg.revenue += record.revenue_amount;

            *metrics.product_qty.entry(record.sku).or_insert(0) += record.quantity;
            *metrics.product_revenue.entry(record.sku).or_insert(0.0) += record.revenue_amount;
            *metrics.cluster_revenue.entry(cluster.clone()).or_insert(0.0) +=
                record.revenue_amount;
            metrics.total_revenue += record.revenue_amount;
            metrics.clusters.insert(cluster);
        }

        for record in stocks {
            let key = ClusterSku::new(record.cluster.clone(), record.sku);

            *metrics.stock.entry(key.clone()).or_insert(0) += record.total();
            *metrics.total_stock.entry(record.sku).or_insert(0) += record.total();
            *metrics.requested_supply.entry(key).or_insert(0) += record.requested_supply;
            metrics.clusters.insert(record.cluster.clone());
        }

        metrics
    }
}

impl Default for MetricAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{StockScheme, NO_CLUSTER};
    use chrono::{NaiveDate, Utc};

    fn sale(sku: i64, cluster: Option<&str>, quantity: i64, revenue: f64) -> SalesRecord {
        SalesRecord {
            seller_id: "seller-1".to_string(),
            sku,
            offer_id: format!("ART-{}", sku),
            cluster_to: cluster.map(|s| s.to_string()),
            quantity,
            revenue_amount: revenue,
            observation_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        }
    }

    fn stock(sku: i64, cluster: &str, scheme: StockScheme, free: i64, supply: i64) -> StockRecord {
        StockRecord {
            seller_id: "seller-1".to_string(),
            sku,
            cluster: cluster.to_string(),
            scheme,
            free_to_sell: free,
            reserved: 0,
            in_transit: 0,
            requested_supply: supply,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_metrics() {
        let aggregator = MetricAggregator::new();
        let metrics = aggregator.aggregate(&[], &[]);

        assert_eq!(metrics.cluster_count(), 0);
        assert_eq!(metrics.total_revenue, 0.0);
        assert!(metrics.active_skus().is_empty());
    }

    #[test]
    fn test_sales_aggregation_per_cluster() {
        let aggregator = MetricAggregator::new();
        let metrics = aggregator.aggregate(
            &[
                sale(100, Some("Москва"), 3, 300.0),
                sale(100, Some("Москва"), 2, 200.0),
                sale(100, Some("Сибирь"), 5, 450.0),
            ],
            &[],
        );

        assert_eq!(metrics.sales_quantity("Москва", 100), 5);
        assert_eq!(metrics.sales_revenue("Москва", 100), 500.0);
        assert_eq!(metrics.total_quantity_for(100), 10);
        assert_eq!(metrics.total_revenue_for(100), 950.0);
        assert_eq!(metrics.total_revenue, 950.0);
        assert_eq!(metrics.cluster_count(), 2);
    }

    #[test]
    fn test_missing_cluster_buckets_under_sentinel() {
        let aggregator = MetricAggregator::new();
        let metrics = aggregator.aggregate(&[sale(100, None, 4, 100.0)], &[]);

        assert_eq!(metrics.sales_quantity(NO_CLUSTER, 100), 4);
        assert!(metrics.clusters.contains(NO_CLUSTER));
    }

    #[test]
    fn test_stock_merges_schemes_and_keeps_recommendation() {
        let aggregator = MetricAggregator::new();
        let metrics = aggregator.aggregate(
            &[],
            &[
                stock(100, "Москва", StockScheme::Fbo, 7, 20),
                stock(100, "Москва", StockScheme::Fbs, 3, 0),
                stock(100, "Сибирь", StockScheme::Fbo, 5, 15),
            ],
        );

        // FBO/FBS 合并进集群库存
        assert_eq!(metrics.cluster_stock("Москва", 100), 10);
        assert_eq!(metrics.total_stock_for(100), 15);
        assert_eq!(metrics.recommendation("Москва", 100), 20);
        // 只有库存活动的集群也计入集群全集
        assert_eq!(metrics.cluster_count(), 2);
    }
}
