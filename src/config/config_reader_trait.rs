// ==========================================
// 卖家补货决策系统 - 规划配置读取 Trait
// ==========================================
// 职责: 定义规划流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

use crate::config::planner_settings::PlannerSettings;

// ==========================================
// PlannerConfigReader Trait
// ==========================================
// 用途: PlannerApi 所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PlannerConfigReader: Send + Sync {
    /// 装配卖家的规划配置快照
    ///
    /// # 参数
    /// - seller_id: 卖家账号（逐键回落到 global 作用域,再回落到文档化默认值）
    ///
    /// # 返回
    /// 完整配置快照,保证每个字段都有可用值
    async fn load_planner_settings(
        &self,
        seller_id: &str,
    ) -> Result<PlannerSettings, Box<dyn Error>>;
}
