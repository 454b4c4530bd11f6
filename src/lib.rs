// ==========================================
// 校园服务聚合网关 - 核心库
// ==========================================
// 技术栈: actix-web + reqwest + Rust + SQLite
// 系统定位: 抓取教务处等遗留系统页面，对外提供统一的 JSON 接口
// 核心: 课表对账引擎（侧栏 + 课表格子 → 规范化的课程安排）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 页面解析层 - 上游 HTML
pub mod extractor;

// 引擎层 - 对账与学期判定
pub mod engine;

// 上游抓取层 - HTTP
pub mod upstream;

// 数据仓储层 - 用户缓存
pub mod repository;

// 配置层 - 启动配置与校历
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能日志
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 服务
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Flip, IdentityKind, TermCode};

// 领域实体
pub use domain::{
    CourseOccurrence, CurriculumResult, GridEntry, LectureAttendance, SidebarEntry, TermInfo,
    UserProfile,
};

// 引擎
pub use engine::{
    CurriculumAssembler, LectureAssembler, LectureFilter, ScheduleReconciler, SidebarIndex,
    TermResolver,
};

// API
pub use api::{ApiError, CurriculumApi, LectureApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "校园服务聚合网关";
