// ==========================================
// 校园服务聚合网关 - 上游抓取错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    /// 上游返回 401/403，会话已失效
    #[error("上游会话已失效 (status={status}): {url}")]
    Unauthorized { status: u16, url: String },

    /// 连接失败、读取失败或上游返回非 2xx
    #[error("上游服务不可用: {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("上游请求超时: {url}")]
    Timeout { url: String },
}

impl UpstreamError {
    /// 由 reqwest 错误转换（区分超时与其他传输错误）
    pub fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                url: url.to_string(),
            }
        } else {
            UpstreamError::Unavailable {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;
