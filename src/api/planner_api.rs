// ==========================================
// 卖家补货决策系统 - 规划 API
// ==========================================
// 职责: 单卖家一次完整规划: 装配配置 → 取数 → 引擎计算
//       → 运行落库 → 产出报表行
// 红线: 引擎本体不做 I/O; 本层负责全部取数与落库
// ==========================================

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::report;
use crate::config::config_reader_trait::PlannerConfigReader;
use crate::engine::orchestrator::{PlanResult, ReplenishOrchestrator};
use crate::engine::repositories::PlannerRepositories;

// ==========================================
// PlannerRunReport - 一次规划运行的产出
// ==========================================
#[derive(Debug, Clone)]
pub struct PlannerRunReport {
    pub run_id: String,
    pub seller_id: String,
    pub plan: PlanResult,
}

impl PlannerRunReport {
    /// 补货建议表（含表头的有序定宽行）
    pub fn allocation_table(&self) -> Vec<Vec<String>> {
        let mut table = vec![report::ALLOCATION_HEADER
            .iter()
            .map(|s| s.to_string())
            .collect()];
        table.extend(self.plan.allocation_rows.iter().map(report::allocation_to_row));
        table
    }

    /// 汇总表（货号 → 跨集群合计）
    pub fn summary_table(&self) -> Vec<Vec<String>> {
        let mut table = vec![report::SUMMARY_HEADER
            .iter()
            .map(|s| s.to_string())
            .collect()];
        table.extend(report::summary_to_rows(&self.plan.summary));
        table
    }

    /// ABC 分级表
    pub fn abc_table(&self) -> Vec<Vec<String>> {
        let mut table = vec![report::ABC_HEADER.iter().map(|s| s.to_string()).collect()];
        table.extend(self.plan.abc_rows.iter().map(report::abc_to_row));
        table
    }

    /// 预算分配表
    pub fn budget_table(&self) -> Vec<Vec<String>> {
        let mut table = vec![report::BUDGET_HEADER.iter().map(|s| s.to_string()).collect()];
        table.extend(self.plan.budget.rows().iter().map(report::budget_to_row));
        table
    }
}

// ==========================================
// PlannerApi - 规划 API
// ==========================================

/// 规划API
///
/// 职责:
/// 1. 装配卖家配置快照
/// 2. 按追溯窗口取销售/库存/参照数据
/// 3. 调用引擎编排器执行纯计算
/// 4. 运行结果落库（uuid run_id 归属）
pub struct PlannerApi<C>
where
    C: PlannerConfigReader,
{
    config: Arc<C>,
    repos: PlannerRepositories,
    orchestrator: ReplenishOrchestrator,
}

impl<C> PlannerApi<C>
where
    C: PlannerConfigReader,
{
    /// 创建新的PlannerApi实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - repos: 仓储集合
    pub fn new(config: Arc<C>, repos: PlannerRepositories) -> Self {
        Self {
            config,
            repos,
            orchestrator: ReplenishOrchestrator::new(),
        }
    }

    /// 执行单卖家的完整规划运行
    ///
    /// # 参数
    /// - seller_id: 卖家账号
    ///
    /// # 返回
    /// 运行产出（run_id + 结构化结果 + 报表行视图）
    pub async fn run_for_seller(&self, seller_id: &str) -> ApiResult<PlannerRunReport> {
        if seller_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("seller_id 不能为空".to_string()));
        }

        // 1. 配置快照
        let settings = self
            .config
            .load_planner_settings(seller_id)
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        // 2. 追溯窗口取数
        let to_date = Utc::now().date_naive();
        let from_date = to_date - Duration::days(settings.lookback_days);

        let sales = self
            .repos
            .sales_repo
            .find_by_seller_and_window(seller_id, from_date, to_date)?;
        let stocks = self.repos.stock_repo.find_by_seller(seller_id)?;
        let products = self.repos.product_repo.find_by_seller(seller_id)?;
        let rules = self.repos.mandatory_repo.find_by_seller(seller_id)?;
        let campaigned = self.repos.campaign_repo.find_campaigned_skus(seller_id)?;

        // 3. 引擎计算（纯同步）
        let plan = self.orchestrator.execute(
            &sales,
            &stocks,
            &products,
            &rules,
            &campaigned,
            &settings,
        );

        // 4. 运行落库
        let run_id = Uuid::new_v4().to_string();
        self.repos.run_repo.save_run(
            &run_id,
            seller_id,
            Utc::now(),
            &plan.allocation_rows,
            plan.budget.rows(),
        )?;

        info!(
            seller_id,
            run_id = %run_id,
            allocation_rows = plan.allocation_rows.len(),
            abc_rows = plan.abc_rows.len(),
            budget_rows = plan.budget.rows().len(),
            "规划运行已落库"
        );

        Ok(PlannerRunReport {
            run_id,
            seller_id: seller_id.to_string(),
            plan,
        })
    }
}
