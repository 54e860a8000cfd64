// ==========================================
// 卖家补货决策系统 - 广告预算分配引擎
// ==========================================
// 职责: 把固定周预算分配到入选商品,保证对账一致
// 算法: 贪心选取 + 最低投放托底 + 最大余数对账
// 红线: 一次运行是原子计算,不对外暴露中间态
// ==========================================

mod core;


pub use core::{BudgetAllocator, BudgetCandidate, RECONCILIATION_THRESHOLD};
