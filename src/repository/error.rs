// ==========================================
// 装饰印花车间排产系统 - 协作方端口错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 持久化/审计为外部协作方, 错误在此统一建模
// ==========================================

use thiserror::Error;

/// 协作方端口错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("持久化调用失败: {0}")]
    PersistenceFailed(String),

    #[error("协作方不可用: {0}")]
    Unavailable(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
