// ==========================================
// 校园服务聚合网关 - 启动配置
// ==========================================
// 职责: 读取 JSON 配置文件（监听地址、上游地址、超时、缓存、校历）
// 来源: CAMPUS_GATEWAY_CONFIG 指定的文件，默认 ./config.json；文件不存在时全部取默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::TermCode;
use crate::upstream::endpoints::{DEFAULT_CURRICULUM_BASE_URL, DEFAULT_ECARD_BASE_URL};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "CAMPUS_GATEWAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

// ==========================================
// AppConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    /// 错误响应中附带完整错误链
    pub debug: bool,
    pub db_path: Option<String>,
    pub upstream: UpstreamConfig,
    /// 单个请求的总时限（含回退到长学期的第二次抓取）
    pub request_deadline_secs: u64,
    pub cache: CacheConfig,
    /// 学期号 → 开学日期（"YYYY-MM-DD" 或 RFC3339）
    pub terms: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub curriculum_base_url: String,
    pub ecard_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub curriculum_ttl_secs: u64,
    pub lecture_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7001".to_string(),
            debug: false,
            db_path: None,
            upstream: UpstreamConfig::default(),
            request_deadline_secs: 30,
            cache: CacheConfig::default(),
            terms: BTreeMap::new(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            curriculum_base_url: DEFAULT_CURRICULUM_BASE_URL.to_string(),
            ecard_base_url: DEFAULT_ECARD_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            curriculum_ttl_secs: 24 * 3600,
            lecture_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    /// 按环境变量定位配置文件并加载
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// 从指定文件加载；文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let shown = path.display().to_string();
        if !path.exists() {
            info!(path = %shown, "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;
        config.validate()?;
        info!(path = %shown, terms = config.terms.len(), "配置文件加载完成");
        Ok(config)
    }

    /// 校历条目必须是合法的学期号与日期
    pub fn validate(&self) -> ConfigResult<()> {
        self.term_starts().map(|_| ())
    }

    /// 校历（学期号 → 开学日期 epoch 毫秒）
    pub fn term_starts(&self) -> ConfigResult<Vec<(TermCode, i64)>> {
        self.terms
            .iter()
            .map(|(code, date)| {
                let term =
                    TermCode::parse(code).map_err(|e| ConfigError::InvalidTermCode(e.0))?;
                let millis = parse_term_date(code, date)?;
                Ok((term, millis))
            })
            .collect()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }

    pub fn curriculum_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.curriculum_ttl_secs)
    }

    pub fn lecture_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.lecture_ttl_secs)
    }
}

/// 解析开学日期
///
/// 只有日期时按 UTC 零点计算；带时区的 RFC3339 按其时区计算
pub fn parse_term_date(term: &str, value: &str) -> ConfigResult<i64> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp_millis());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| ConfigError::InvalidTermDate {
            term: term.to_string(),
            value: value.to_string(),
        })
}
