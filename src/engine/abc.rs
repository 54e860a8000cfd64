// ==========================================
// 卖家补货决策系统 - ABC 分级引擎
// ==========================================
// 职责: 按追溯营收把商品切分为 A/B/C 三档
// 口径: 卖家级营收,单次左到右线性扫描,不按集群重算
// 红线: 降序排序必须稳定 (同营收按出现顺序)
// ==========================================

use crate::domain::types::AbcLabel;

// ==========================================
// AbcClassifier - ABC 分级引擎
// ==========================================
pub struct AbcClassifier {
    // 无状态引擎,不需要注入依赖
}

impl AbcClassifier {
    pub fn new() -> Self {
        Self {}
    }

    /// 对 (SKU, 追溯营收) 列表分级
    ///
    /// 算法:
    /// 1. 按营收降序稳定排序 (同值保持出现顺序)
    /// 2. a_cap = total * a_share; ab_cap = a_cap + total * b_share
    /// 3. 左到右扫描,比较发生在累加当前项之前:
    ///    cum ≤ a_cap → A; cum ≤ ab_cap → B; 否则 C
    ///
    /// 比较先于累加意味着排名第一的商品恒为 A,且 A 档累计
    /// 营收最多超出 a_cap 一个商品的营收。
    ///
    /// # 参数
    /// - `items`: (SKU, 营收) 对
    /// - `a_share` / `b_share`: A/B 档营收份额 (C 为剩余,不参与计算)
    ///
    /// # 返回
    /// 按营收降序排列的 (SKU, 营收, 标签),每个商品恰好一个标签
    pub fn classify(
        &self,
        items: &[(i64, f64)],
        a_share: f64,
        b_share: f64,
    ) -> Vec<(i64, f64, AbcLabel)> {
        let mut ranked: Vec<(i64, f64)> = items.to_vec();
        // sort_by 是稳定排序,同营收保持出现顺序
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let total: f64 = ranked.iter().map(|(_, revenue)| revenue).sum();
        let a_cap = total * a_share;
        let ab_cap = a_cap + total * b_share;

        let mut cum = 0.0;
        let mut labeled = Vec::with_capacity(ranked.len());
        for (sku, revenue) in ranked {
            let label = if cum <= a_cap {
                AbcLabel::A
            } else if cum <= ab_cap {
                AbcLabel::B
            } else {
                AbcLabel::C
            };
            cum += revenue;
            labeled.push((sku, revenue, label));
        }

        labeled
    }
}

impl Default for AbcClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_product_gets_exactly_one_label() {
        let classifier = AbcClassifier::new();
        let items: Vec<(i64, f64)> = (0..20).map(|i| (i, (20 - i) as f64 * 100.0)).collect();

        let labeled = classifier.classify(&items, 0.8, 0.15);
        assert_eq!(labeled.len(), 20);
    }

    #[test]
    fn test_labels_are_monotonic_in_rank_order() {
        let classifier = AbcClassifier::new();
        let items: Vec<(i64, f64)> = (0..50).map(|i| (i, (50 - i) as f64 * 37.0)).collect();

        let labeled = classifier.classify(&items, 0.7, 0.2);
        for pair in labeled.windows(2) {
            assert!(pair[0].2 <= pair[1].2, "标签沿排名必须单调不减");
        }
    }

    #[test]
    fn test_top_product_is_always_a() {
        let classifier = AbcClassifier::new();
        // 头部商品独占 95% 营收,a_share 只有 0.5
        let labeled = classifier.classify(&[(1, 9500.0), (2, 500.0)], 0.5, 0.3);

        assert_eq!(labeled[0].0, 1);
        assert_eq!(labeled[0].2, AbcLabel::A);
    }

    #[test]
    fn test_a_tier_cumulative_bound() {
        let classifier = AbcClassifier::new();
        let items: Vec<(i64, f64)> = (0..30).map(|i| (i, (30 - i) as f64 * 113.0)).collect();
        let total: f64 = items.iter().map(|(_, r)| r).sum();
        let a_share = 0.6;

        let labeled = classifier.classify(&items, a_share, 0.25);
        let a_revenue: f64 = labeled
            .iter()
            .filter(|(_, _, label)| *label == AbcLabel::A)
            .map(|(_, revenue, _)| revenue)
            .sum();
        let max_item: f64 = items.iter().map(|(_, r)| *r).fold(0.0, f64::max);

        // A 档累计 ≤ a_cap + 一个商品的营收 (边界项允许略超)
        assert!(a_revenue <= total * a_share + max_item);
    }

    #[test]
    fn test_descending_order_with_stable_ties() {
        let classifier = AbcClassifier::new();
        let labeled = classifier.classify(&[(7, 100.0), (3, 500.0), (9, 100.0)], 0.8, 0.15);

        assert_eq!(labeled[0].0, 3);
        // 同营收: 7 先出现,排在 9 前
        assert_eq!(labeled[1].0, 7);
        assert_eq!(labeled[2].0, 9);
    }

    #[test]
    fn test_empty_input() {
        let classifier = AbcClassifier::new();
        assert!(classifier.classify(&[], 0.8, 0.15).is_empty());
    }

    #[test]
    fn test_zero_total_revenue_labels_head_then_tail() {
        let classifier = AbcClassifier::new();
        // 全零营收: caps 均为 0,cum 恒为 0 ≤ a_cap → 全部 A
        let labeled = classifier.classify(&[(1, 0.0), (2, 0.0)], 0.8, 0.15);
        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0].2, AbcLabel::A);
        assert_eq!(labeled[1].2, AbcLabel::A);
    }
}
