// ==========================================
// 卖家补货决策系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合规划流程所需的所有 Repository
// 目标: 减少 PlannerApi 的构造函数参数数量
// ==========================================

use std::sync::Arc;

use crate::repository::{
    CampaignRepository, MandatoryRuleRepository, ProductInfoRepository, ReplenishRunRepository,
    SalesRecordRepository, StockSnapshotRepository,
};

/// 规划流程仓储集合
///
/// 聚合规划流程所需的所有 Repository,简化依赖注入。
#[derive(Clone)]
pub struct PlannerRepositories {
    /// 销售记录仓储
    pub sales_repo: Arc<SalesRecordRepository>,
    /// 库存快照仓储
    pub stock_repo: Arc<StockSnapshotRepository>,
    /// 商品参照仓储
    pub product_repo: Arc<ProductInfoRepository>,
    /// 必备规则仓储
    pub mandatory_repo: Arc<MandatoryRuleRepository>,
    /// 广告活动仓储（只读视图）
    pub campaign_repo: Arc<CampaignRepository>,
    /// 规划运行仓储
    pub run_repo: Arc<ReplenishRunRepository>,
}

impl PlannerRepositories {
    /// 创建新的仓储集合
    pub fn new(
        sales_repo: Arc<SalesRecordRepository>,
        stock_repo: Arc<StockSnapshotRepository>,
        product_repo: Arc<ProductInfoRepository>,
        mandatory_repo: Arc<MandatoryRuleRepository>,
        campaign_repo: Arc<CampaignRepository>,
        run_repo: Arc<ReplenishRunRepository>,
    ) -> Self {
        Self {
            sales_repo,
            stock_repo,
            product_repo,
            mandatory_repo,
            campaign_repo,
            run_repo,
        }
    }

    /// 从共享连接构建全套仓储
    pub fn from_connection(
        conn: Arc<std::sync::Mutex<rusqlite::Connection>>,
    ) -> Self {
        Self {
            sales_repo: Arc::new(SalesRecordRepository::from_connection(conn.clone())),
            stock_repo: Arc::new(StockSnapshotRepository::from_connection(conn.clone())),
            product_repo: Arc::new(ProductInfoRepository::from_connection(conn.clone())),
            mandatory_repo: Arc::new(MandatoryRuleRepository::from_connection(conn.clone())),
            campaign_repo: Arc::new(CampaignRepository::from_connection(conn.clone())),
            run_repo: Arc::new(ReplenishRunRepository::from_connection(conn)),
        }
    }
}
