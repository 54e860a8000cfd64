// ==========================================
// 卖家补货决策系统 - 领域类型定义
// ==========================================
// 红线: 分配模式为封闭枚举,禁止哨兵值分支
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ABC 分级标签 (ABC Label)
// ==========================================
// A: 累计营收头部, B: 中部, C: 尾部
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcLabel {
    A, // 头部商品
    B, // 中部商品
    C, // 尾部商品
}

impl fmt::Display for AbcLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcLabel::A => write!(f, "A"),
            AbcLabel::B => write!(f, "B"),
            AbcLabel::C => write!(f, "C"),
        }
    }
}

// ==========================================
// 补货分配模式 (Allocation Mode)
// ==========================================
// 红线: 加权模式的"阈值上/下"是同一配置在行级的两个分支,
//       不是两个独立布尔开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationMode {
    Even,                  // 均分: 总需求 / 集群数
    Weighted,              // 按集群营收份额加权 (带份额阈值托底)
    ClusterRecommendation, // 直接采用平台集群供货建议值
}

impl AllocationMode {
    /// 从配置字符串解析分配模式
    ///
    /// 未识别的值回落到默认 EVEN（文档化默认,不静默置零）
    pub fn from_config_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "EVEN" => AllocationMode::Even,
            "WEIGHTED" => AllocationMode::Weighted,
            "CLUSTER_RECOMMENDATION" => AllocationMode::ClusterRecommendation,
            _ => AllocationMode::Even, // 默认 EVEN
        }
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMode::Even => write!(f, "EVEN"),
            AllocationMode::Weighted => write!(f, "WEIGHTED"),
            AllocationMode::ClusterRecommendation => write!(f, "CLUSTER_RECOMMENDATION"),
        }
    }
}

impl Default for AllocationMode {
    fn default() -> Self {
        AllocationMode::Even
    }
}

// ==========================================
// 预算分配模式 (Budget Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetMode {
    Even,     // 均分周预算
    Weighted, // 按商品营收份额加权
}

impl BudgetMode {
    /// 从配置字符串解析预算模式
    pub fn from_config_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "WEIGHTED" => BudgetMode::Weighted,
            _ => BudgetMode::Even, // 默认 EVEN
        }
    }
}

impl fmt::Display for BudgetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetMode::Even => write!(f, "EVEN"),
            BudgetMode::Weighted => write!(f, "WEIGHTED"),
        }
    }
}

// ==========================================
// 输出排序键 (Sort Key)
// ==========================================
// 调用方指定补货结果的降序排序口径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortKey {
    Quantity,       // 按销量
    Revenue,        // 按营收
    Recommendation, // 按平台供货建议
}

impl SortKey {
    /// 从配置字符串解析排序键
    pub fn from_config_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "REVENUE" => SortKey::Revenue,
            "RECOMMENDATION" => SortKey::Recommendation,
            _ => SortKey::Quantity, // 默认按销量
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Quantity => write!(f, "QUANTITY"),
            SortKey::Revenue => write!(f, "REVENUE"),
            SortKey::Recommendation => write!(f, "RECOMMENDATION"),
        }
    }
}

// ==========================================
// 履约方案 (Stock Scheme)
// ==========================================
// FBO: 平台仓履约, FBS: 卖家仓履约
// 库存与销量分开采集,周转/分配口径合并使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockScheme {
    Fbo, // 平台仓
    Fbs, // 卖家仓
}

impl fmt::Display for StockScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockScheme::Fbo => write!(f, "FBO"),
            StockScheme::Fbs => write!(f, "FBS"),
        }
    }
}

// ==========================================
// 无集群哨兵 (No-Cluster Sentinel)
// ==========================================
// 销售记录缺失目的集群时的归桶键
pub const NO_CLUSTER: &str = "no-cluster";
