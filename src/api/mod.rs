// ==========================================
// 校园服务聚合网关 - API 层
// ==========================================
// 职责: 面向调用方的业务接口（参数校验、缓存、时限、错误转换）
// 红线: 不解析页面、不拼 SQL
// ==========================================

mod cache_support;
pub mod curriculum_api;
pub mod error;
pub mod lecture_api;

pub use curriculum_api::{parse_term_param, CurriculumApi};
pub use error::{ApiError, ApiResult};
pub use lecture_api::LectureApi;
