// ==========================================
// 校园服务聚合网关 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::{CurriculumApi, LectureApi};
use crate::config::{AppConfig, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{CurriculumAssembler, LectureAssembler};
use crate::repository::UserCacheRepository;
use crate::upstream::{HttpFetcher, UpstreamEndpoints, UpstreamFetcher};

pub const DB_PATH_ENV: &str = "CAMPUS_GATEWAY_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源，在 actix-web 中作为 web::Data 共享
pub struct AppState {
    /// 启动配置
    pub config: AppConfig,

    /// 数据库路径
    pub db_path: String,

    /// 课表查询API
    pub curriculum_api: Arc<CurriculumApi<ConfigManager>>,

    /// 讲座打卡API
    pub lecture_api: Arc<LectureApi>,

    /// 配置管理器（校历）
    pub config_manager: Arc<ConfigManager>,

    /// 用户缓存仓储
    pub cache_repo: Arc<UserCacheRepository>,
}

impl AppState {
    /// 创建新的AppState实例（使用 reqwest 抓取上游）
    pub fn new(config: AppConfig, db_path: String) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.upstream_timeout())
            .context("无法创建上游抓取器")?;
        Self::with_fetcher(config, db_path, Arc::new(fetcher))
    }

    /// 使用指定的上游抓取器创建AppState
    ///
    /// 该方法会：
    /// 1. 打开共享数据库连接并建表
    /// 2. 把配置文件中的校历写入 config_kv
    /// 3. 清理过期缓存
    /// 4. 创建引擎与API实例
    pub fn with_fetcher(
        config: AppConfig,
        db_path: String,
        fetcher: Arc<dyn UpstreamFetcher>,
    ) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        init_schema(&conn).context("数据库建表失败")?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化配置与Repository层
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone()).context("无法创建ConfigManager")?,
        );
        let term_starts = config.term_starts().context("校历配置无效")?;
        config_manager
            .seed_term_calendar(&term_starts)
            .context("校历写入失败")?;

        let cache_repo = Arc::new(UserCacheRepository::from_connection(conn));
        let longest_ttl = config.curriculum_ttl().max(config.lecture_ttl());
        match cache_repo.purge_expired(longest_ttl) {
            Ok(removed) => tracing::info!(removed, "已清理过期缓存"),
            Err(e) => tracing::warn!(error = %e, "清理过期缓存失败(将继续启动)"),
        }

        // ==========================================
        // 初始化Engine与API层
        // ==========================================
        let endpoints = UpstreamEndpoints::new(
            &config.upstream.curriculum_base_url,
            &config.upstream.ecard_base_url,
        );

        let curriculum_api = Arc::new(CurriculumApi::new(
            CurriculumAssembler::new(fetcher.clone(), config_manager.clone(), endpoints.clone()),
            cache_repo.clone(),
            config.curriculum_ttl(),
            config.request_deadline(),
        ));
        let lecture_api = Arc::new(LectureApi::new(
            LectureAssembler::new(fetcher, endpoints),
            cache_repo.clone(),
            config.lecture_ttl(),
            config.request_deadline(),
        ));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            config,
            db_path,
            curriculum_api,
            lecture_api,
            config_manager,
            cache_repo,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// 错误响应是否附带完整错误链
    pub fn debug_enabled(&self) -> bool {
        self.config.debug
    }
}

/// 获取默认数据库路径
///
/// # 优先级
/// 1. 环境变量 CAMPUS_GATEWAY_DB_PATH
/// 2. 配置文件 db_path
/// 3. 用户数据目录/campus-gateway/campus_gateway.db（拿不到数据目录时为当前目录）
pub fn get_default_db_path(config: &AppConfig) -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(path) = config.db_path.as_deref().map(str::trim) {
        if !path.is_empty() {
            return path.to_string();
        }
    }

    let mut path = PathBuf::from("./campus_gateway.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("campus-gateway");
        // 确保目录存在
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("campus_gateway.db");
        }
    }

    path.to_string_lossy().to_string()
}
