// ==========================================
// 卖家补货决策系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持卖家级覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod numeric;
pub mod planner_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::PlannerConfigReader;
pub use planner_settings::PlannerSettings;
