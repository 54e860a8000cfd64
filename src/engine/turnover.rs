// ==========================================
// 卖家补货决策系统 - 周转过滤引擎
// ==========================================
// 职责: 按周转天数带过滤 SKU,并产出展示口径的周转值
// 口径: turnover = 全集群库存 / 日均销量 (零保护)
// 红线: min_required_stock 只影响展示值,不会把已排除的
//       SKU 重新放回
// ==========================================

use std::collections::HashMap;

use crate::engine::metrics::SellerMetrics;

// ==========================================
// TurnoverBand - 周转带配置
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnoverBand {
    pub min_turnover: Option<f64>, // 配置时生效: turnover < min 则排除
    pub max_turnover: Option<f64>, // 配置时生效: turnover > max 则排除
    pub min_required_stock: i64,   // 低于此库存时展示周转强制为 0
}

// ==========================================
// TurnoverFilter - 周转过滤引擎
// ==========================================
pub struct TurnoverFilter {
    // 无状态引擎,不需要注入依赖
}

impl TurnoverFilter {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算单 SKU 周转天数
    ///
    /// # 参数
    /// - `metrics`: 聚合指标
    /// - `sku`: 平台 SKU
    /// - `days`: 追溯天数
    ///
    /// # 返回
    /// 库存 / 日均销量; days 为 0 或无销量时为 0
    pub fn turnover_for(&self, metrics: &SellerMetrics, sku: i64, days: i64) -> f64 {
        if days == 0 {
            return 0.0;
        }
        let avg_daily = metrics.total_quantity_for(sku) as f64 / days as f64;
        if avg_daily == 0.0 {
            return 0.0;
        }
        metrics.total_stock_for(sku) as f64 / avg_daily
    }

    /// 过滤 SKU 集合
    ///
    /// # 参数
    /// - `metrics`: 聚合指标
    /// - `skus`: 候选 SKU（价格带/排除清单已在商品选择步骤应用）
    /// - `days`: 追溯天数
    /// - `band`: 周转带配置
    ///
    /// # 返回
    /// 存活 SKU → 展示口径周转值
    pub fn filter(
        &self,
        metrics: &SellerMetrics,
        skus: impl IntoIterator<Item = i64>,
        days: i64,
        band: &TurnoverBand,
    ) -> HashMap<i64, f64> {
        let mut surviving: HashMap<i64, f64> = HashMap::new();

        for sku in skus {
            let turnover = self.turnover_for(metrics, sku, days);

            if let Some(max) = band.max_turnover {
                if turnover > max {
                    continue;
                }
            }
            if let Some(min) = band.min_turnover {
                if turnover < min {
                    continue;
                }
            }

            // 库存低于下限时展示周转置 0（仅展示口径,不改变过滤结论）
            let display = if band.min_required_stock > metrics.total_stock_for(sku) {
                0.0
            } else {
                turnover
            };

            surviving.insert(sku, display);
        }

        surviving
    }
}

impl Default for TurnoverFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::ClusterSku;

    /// 构造 sku=100: 30 天销量 30 件,库存 60 → 周转 60 天
    fn metrics_with_turnover_60() -> SellerMetrics {
        let mut metrics = SellerMetrics::default();
        metrics.product_qty.insert(100, 30);
        metrics.total_stock.insert(100, 60);
        metrics
            .stock
            .insert(ClusterSku::new("Москва", 100), 60);
        metrics.clusters.insert("Москва".to_string());
        metrics
    }

    #[test]
    fn test_turnover_computation() {
        let filter = TurnoverFilter::new();
        let metrics = metrics_with_turnover_60();

        assert_eq!(filter.turnover_for(&metrics, 100, 30), 60.0);
    }

    #[test]
    fn test_zero_guards() {
        let filter = TurnoverFilter::new();
        let metrics = metrics_with_turnover_60();

        // days = 0
        assert_eq!(filter.turnover_for(&metrics, 100, 0), 0.0);
        // 无销量的 SKU
        assert_eq!(filter.turnover_for(&metrics, 999, 30), 0.0);
    }

    #[test]
    fn test_max_band_excludes() {
        let filter = TurnoverFilter::new();
        let metrics = metrics_with_turnover_60();
        let band = TurnoverBand {
            max_turnover: Some(45.0),
            ..Default::default()
        };

        let surviving = filter.filter(&metrics, [100], 30, &band);
        assert!(surviving.is_empty());
    }

    #[test]
    fn test_min_band_excludes() {
        let filter = TurnoverFilter::new();
        let metrics = metrics_with_turnover_60();
        let band = TurnoverBand {
            min_turnover: Some(90.0),
            ..Default::default()
        };

        let surviving = filter.filter(&metrics, [100], 30, &band);
        assert!(surviving.is_empty());
    }

    #[test]
    fn test_unconfigured_band_keeps_all() {
        let filter = TurnoverFilter::new();
        let metrics = metrics_with_turnover_60();

        let surviving = filter.filter(&metrics, [100], 30, &TurnoverBand::default());
        assert_eq!(surviving.get(&100), Some(&60.0));
    }

    #[test]
    fn test_min_required_stock_zeroes_display_only() {
        let filter = TurnoverFilter::new();
        let metrics = metrics_with_turnover_60();
        let band = TurnoverBand {
            min_required_stock: 100, // 高于库存 60
            ..Default::default()
        };

        let surviving = filter.filter(&metrics, [100], 30, &band);
        // SKU 仍然存活,但展示周转被置 0
        assert_eq!(surviving.get(&100), Some(&0.0));
    }
}
