// ==========================================
// 校园服务聚合网关 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod user_cache_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use user_cache_repo::{cache_scopes, CacheEntry, UserCacheRepository};
