// ==========================================
// 校园服务聚合网关 - 上游抓取 Trait
// ==========================================
// 职责: 定义引擎所需的上游页面抓取接口（不包含实现）
// 红线: 不包含页面解析，不包含重试
// ==========================================

use crate::upstream::error::UpstreamResult;
use async_trait::async_trait;

// ==========================================
// UpstreamSession - 已认证的上游会话
// ==========================================
// 由外部认证层准备；cookie 原样放入 Cookie 请求头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSession {
    /// 一卡通号（教师为 1 开头的九位数）
    pub identifier: String,
    pub cookie: String,
}

impl UpstreamSession {
    pub fn new(identifier: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            cookie: cookie.into(),
        }
    }
}

// ==========================================
// UpstreamFetcher Trait
// ==========================================
// 实现者: HttpFetcher（reqwest）；测试中使用 MockFetcher
#[async_trait]
pub trait UpstreamFetcher: Send + Sync {
    /// GET 页面，返回解码后的正文
    async fn get(&self, session: &UpstreamSession, url: &str) -> UpstreamResult<String>;

    /// POST 表单，返回解码后的正文
    ///
    /// 字段按给定顺序编码
    async fn post_form(
        &self,
        session: &UpstreamSession,
        url: &str,
        fields: &[(String, String)],
    ) -> UpstreamResult<String>;
}
