// ==========================================
// 校园服务聚合网关 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("开学日期格式错误 (term={term}): {value}")]
    InvalidTermDate { term: String, value: String },

    #[error("学期号格式错误: {0}")]
    InvalidTermCode(String),

    #[error("配置库锁获取失败: {0}")]
    LockError(String),

    #[error("配置库访问失败: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
