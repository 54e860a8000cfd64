// ==========================================
// 卖家补货决策系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod campaign_repo;
pub mod error;
pub mod plan_repo;
pub mod product_repo;
pub mod sales_repo;
pub mod stock_repo;

// 重导出核心仓储
pub use campaign_repo::CampaignRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use plan_repo::ReplenishRunRepository;
pub use product_repo::{MandatoryRuleRepository, ProductInfoRepository};
pub use sales_repo::SalesRecordRepository;
pub use stock_repo::StockSnapshotRepository;
