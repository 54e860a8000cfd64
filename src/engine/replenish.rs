// ==========================================
// 卖家补货决策系统 - 补货计算引擎
// ==========================================
// 职责: 按分配模式计算每个 (集群, SKU) 的目标需求与建议发货量
// 输入: 聚合指标 + 存活 SKU + 规划配置
// 输出: AllocationRow 列表 (未经必备商品再分配)
// 红线: 分配模式为封闭枚举; 取整只发生在产出行时
// ==========================================

mod core;


pub use core::{ReplenishCalculator, ReplenishInput};
