// ==========================================
// Mock 上游抓取器 - 用于集成测试
// ==========================================
// 按注册顺序匹配路由（先注册先匹配），记录每一次调用
// ==========================================

use async_trait::async_trait;
use campus_gateway::upstream::{UpstreamError, UpstreamFetcher, UpstreamResult, UpstreamSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 表单字段匹配条件
#[derive(Debug, Clone)]
pub enum FieldMatch {
    Any,
    Is(String, String),
    Absent(String),
}

impl FieldMatch {
    fn matches(&self, fields: &[(String, String)]) -> bool {
        match self {
            FieldMatch::Any => true,
            FieldMatch::Is(name, value) => fields.iter().any(|(k, v)| k == name && v == value),
            FieldMatch::Absent(name) => fields.iter().all(|(k, _)| k != name),
        }
    }
}

type Responder = Arc<dyn Fn(&str) -> UpstreamResult<String> + Send + Sync>;

struct Route {
    url_fragment: String,
    field: FieldMatch,
    responder: Responder,
}

/// 一次被记录的上游调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub cookie: String,
}

impl RecordedCall {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次调用前先等待（用于请求时限测试）
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// URL 含 url_fragment 的请求返回 body
    pub fn respond(self, url_fragment: &str, body: impl Into<String>) -> Self {
        self.respond_when(url_fragment, FieldMatch::Any, body)
    }

    /// URL 含 url_fragment 且表单满足条件的请求返回 body
    pub fn respond_when(self, url_fragment: &str, field: FieldMatch, body: impl Into<String>) -> Self {
        let body = body.into();
        self.route(url_fragment, field, Arc::new(move |_| Ok(body.clone())))
    }

    /// URL 含 url_fragment 的请求返回上游 401
    pub fn unauthorized(self, url_fragment: &str) -> Self {
        self.route(
            url_fragment,
            FieldMatch::Any,
            Arc::new(|url| {
                Err(UpstreamError::Unauthorized {
                    status: 401,
                    url: url.to_string(),
                })
            }),
        )
    }

    /// URL 含 url_fragment 的请求返回连接失败
    pub fn unavailable(self, url_fragment: &str) -> Self {
        self.route(
            url_fragment,
            FieldMatch::Any,
            Arc::new(|url| {
                Err(UpstreamError::Unavailable {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                })
            }),
        )
    }

    fn route(self, url_fragment: &str, field: FieldMatch, responder: Responder) -> Self {
        self.routes.lock().unwrap().push(Route {
            url_fragment: url_fragment.to_string(),
            field,
            responder,
        });
        self
    }

    /// 已记录的全部调用
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// URL 含 url_fragment 的调用
    pub fn calls_to(&self, url_fragment: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.url.contains(url_fragment))
            .collect()
    }

    /// 同时在途请求数的峰值
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn dispatch(
        &self,
        method: &'static str,
        session: &UpstreamSession,
        url: &str,
        fields: &[(String, String)],
    ) -> UpstreamResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            fields: fields.to_vec(),
            cookie: session.cookie.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let responder = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| url.contains(&r.url_fragment) && r.field.matches(fields))
            .map(|r| r.responder.clone());

        match responder {
            Some(responder) => responder(url),
            None => Err(UpstreamError::Unavailable {
                url: url.to_string(),
                reason: "no mock route".to_string(),
            }),
        }
    }
}

#[async_trait]
impl UpstreamFetcher for MockFetcher {
    async fn get(&self, session: &UpstreamSession, url: &str) -> UpstreamResult<String> {
        self.dispatch("GET", session, url, &[]).await
    }

    async fn post_form(
        &self,
        session: &UpstreamSession,
        url: &str,
        fields: &[(String, String)],
    ) -> UpstreamResult<String> {
        self.dispatch("POST", session, url, fields).await
    }
}
