// ==========================================
// 校园服务聚合网关 - reqwest 上游抓取实现
// ==========================================
// 职责: 携带会话 Cookie 抓取上游页面
// 红线: 401/403 一律视为会话失效；不做自动重试
// ==========================================

use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::upstream::fetcher_trait::{UpstreamFetcher, UpstreamSession};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// 创建抓取器
    ///
    /// # 参数
    /// - timeout: 单次上游请求超时
    pub fn new(timeout: Duration) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Unavailable {
                url: String::new(),
                reason: format!("HTTP 客户端初始化失败: {}", e),
            })?;
        Ok(Self { http })
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> UpstreamResult<String> {
        let resp = request
            .send()
            .await
            .map_err(|e| UpstreamError::from_transport(url, e))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(url, status = status.as_u16(), "上游拒绝会话");
            return Err(UpstreamError::Unauthorized {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(UpstreamError::Unavailable {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        // 按响应头中的 charset 解码
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamError::from_transport(url, e))?;
        debug!(url, bytes = body.len(), "上游页面抓取完成");
        Ok(body)
    }
}

#[async_trait]
impl UpstreamFetcher for HttpFetcher {
    async fn get(&self, session: &UpstreamSession, url: &str) -> UpstreamResult<String> {
        let request = self.http.get(url).header(COOKIE, &session.cookie);
        self.send(url, request).await
    }

    async fn post_form(
        &self,
        session: &UpstreamSession,
        url: &str,
        fields: &[(String, String)],
    ) -> UpstreamResult<String> {
        let request = self
            .http
            .post(url)
            .header(COOKIE, &session.cookie)
            .form(fields);
        self.send(url, request).await
    }
}
