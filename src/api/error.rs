// ==========================================
// 卖家补货决策系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换仓储/配置错误为可解释的错误消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
