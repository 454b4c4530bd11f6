// ==========================================
// 校园服务聚合网关 - 页面解析错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 页面解析错误类型
///
/// 页面关键标记缺失时，通常是上游会话过期被重定向到了登录页，
/// 也可能是页面结构变化；两者无法可靠区分，调用方统一按会话过期处理。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("页面标记缺失: {field}")]
    ParseFailure { field: &'static str },

    #[error("字段格式错误 (field={field}): {value}")]
    FieldFormat { field: &'static str, value: String },
}

impl ExtractError {
    pub fn missing(field: &'static str) -> Self {
        ExtractError::ParseFailure { field }
    }
}

/// 解析结果类型别名
pub type ExtractResult<T> = Result<T, ExtractError>;
