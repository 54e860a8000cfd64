// ==========================================
// 卖家补货决策系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL; 引擎为纯同步批计算
// ==========================================

pub mod abc;
pub mod budget;
pub mod mandatory;
pub mod metrics;
pub mod orchestrator;
pub mod replenish;
pub mod repositories;
pub mod turnover;

// 重导出核心引擎
pub use abc::AbcClassifier;
pub use budget::{BudgetAllocator, BudgetCandidate, RECONCILIATION_THRESHOLD};
pub use mandatory::MandatoryRedistributor;
pub use metrics::{MetricAggregator, SalesAgg, SellerMetrics};
pub use orchestrator::{PlanResult, ReplenishOrchestrator};
pub use replenish::{ReplenishCalculator, ReplenishInput};
pub use repositories::PlannerRepositories;
pub use turnover::{TurnoverBand, TurnoverFilter};
