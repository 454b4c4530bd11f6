// ==========================================
// 校园服务聚合网关 - 上游抓取层
// ==========================================
// 职责: 与教务处、一卡通系统通信
// 红线: 只负责传输，不解析页面
// ==========================================

pub mod endpoints;
pub mod error;
pub mod fetcher_trait;
pub mod http_fetcher;

pub use endpoints::{FormRequest, UpstreamEndpoints};
pub use error::{UpstreamError, UpstreamResult};
pub use fetcher_trait::{UpstreamFetcher, UpstreamSession};
pub use http_fetcher::HttpFetcher;
