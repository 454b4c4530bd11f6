// ==========================================
// 网关日志
// ==========================================
// 职责: 进程启动时装配 tracing 订阅器，级别走 RUST_LOG
// 红线: 只在 main 与测试中调用；库代码只打事件不装订阅器
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 切换输出格式的环境变量，取值 text / json
pub const LOG_FORMAT_ENV: &str = "CAMPUS_GATEWAY_LOG_FORMAT";

/// 未设置 RUST_LOG 时的过滤规则
const DEFAULT_FILTER: &str = "info";

/// 日志行格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人读的单行文本
    Text,
    /// 每个事件一行 JSON，给日志采集用
    Json,
}

impl LogFormat {
    /// 认不出的取值一律按 Text
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

/// 装配网关进程的全局订阅器
///
/// 事件带 target 与行号；JSON 模式下附带当前 span（请求 id 就挂在上面）
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Text => builder.init(),
    }
}

/// 测试用: debug 级别写进测试捕获输出，多次调用只有第一次生效
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("text")), LogFormat::Text);
        assert_eq!(LogFormat::parse(Some("yaml")), LogFormat::Text);
        assert_eq!(LogFormat::parse(None), LogFormat::Text);
    }

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!("订阅器重复装配不 panic");
    }
}
