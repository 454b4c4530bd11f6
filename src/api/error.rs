// ==========================================
// 校园服务聚合网关 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把下层错误转换为调用方能理解的错误
// 红线: 页面解析失败与上游 401 一律视为会话过期（两者无法可靠区分）
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use crate::upstream::error::UpstreamError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 会话与输入
    // ==========================================
    #[error("会话已过期，请重新登录: {0}")]
    SessionExpired(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 上游错误
    // ==========================================
    #[error("上游服务不可用: {0}")]
    UpstreamUnavailable(String),

    #[error("上游请求超时: {0}")]
    UpstreamTimeout(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 错误代码（返回给调用方）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::SessionExpired(_) => "SESSION_EXPIRED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            ApiError::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::SessionExpired(_) => 401,
            ApiError::InvalidInput(_) => 400,
            ApiError::UpstreamUnavailable(_) => 502,
            ApiError::UpstreamTimeout(_) => 504,
            _ => 500,
        }
    }
}

// ==========================================
// 从下层错误转换
// ==========================================
impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unauthorized { .. } => ApiError::SessionExpired(err.to_string()),
            UpstreamError::Unavailable { .. } => ApiError::UpstreamUnavailable(err.to_string()),
            UpstreamError::Timeout { .. } => ApiError::UpstreamTimeout(err.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UpstreamParseFailure(e) => ApiError::SessionExpired(e.to_string()),
            EngineError::Upstream(e) => e.into(),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::PayloadError { .. } => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
