// ==========================================
// 校园服务聚合网关 - 配置层
// ==========================================
// 职责: 启动配置（JSON 文件）+ 运行期配置（config_kv 表）
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod error;
pub mod term_calendar_trait;

pub use app_config::{AppConfig, CacheConfig, UpstreamConfig};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use term_calendar_trait::TermCalendarReader;
