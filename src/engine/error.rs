// ==========================================
// 校园服务聚合网关 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::extractor::error::ExtractError;
use crate::upstream::error::UpstreamError;
use thiserror::Error;

/// 引擎层错误类型
///
/// 对账本身没有致命错误；这里只有抓取与页面解析失败
#[derive(Error, Debug)]
pub enum EngineError {
    /// 页面关键标记缺失（多为上游会话过期）
    #[error("上游页面解析失败: {0}")]
    UpstreamParseFailure(#[from] ExtractError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub type EngineResult<T> = Result<T, EngineError>;
