// ==========================================
// 校园服务聚合网关 - 应用层
// ==========================================
// 职责: actix-web 集成，连接调用方与 API 层
// ==========================================

pub mod http_routes;
pub mod state;

// 重导出
pub use http_routes::{access_log, configure};
pub use state::{get_default_db_path, AppState};
