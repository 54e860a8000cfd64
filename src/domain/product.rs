// ==========================================
// 卖家补货决策系统 - 商品参照数据
// ==========================================
// 引擎只读; 缺失参照数据的 SKU 不参与分配
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductInfo - 商品参照信息
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub sku: i64,                // 平台 SKU
    pub offer_id: String,        // 卖家货号
    pub name: String,            // 商品名称
    pub price: f64,              // 售价
    pub barcode: Option<String>, // 条码
}

// ==========================================
// MandatoryRule - 必备商品规则
// ==========================================
// 卖家配置: 该货号跨集群合计最低备货量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandatoryRule {
    pub offer_id: String,             // 卖家货号
    pub required_total_quantity: i64, // 跨集群合计最低量
}
