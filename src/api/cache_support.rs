// ==========================================
// 校园服务聚合网关 - 接口缓存辅助
// ==========================================
// 红线: 缓存读写失败只记日志，不影响接口结果
// ==========================================

use crate::repository::UserCacheRepository;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// 读取未过期的用户缓存；读取失败按未命中处理
pub(crate) fn read_fresh<T: DeserializeOwned>(
    cache: &UserCacheRepository,
    cardnum: &str,
    scope: &str,
    key: &str,
    ttl: Duration,
) -> Option<T> {
    match cache.get_fresh_json(cardnum, scope, key, ttl) {
        Ok(hit) => hit,
        Err(e) => {
            warn!(cardnum, scope, key, error = %e, "读取用户缓存失败，跳过缓存");
            None
        }
    }
}

/// 写入用户缓存；写入失败只记日志
pub(crate) fn write<T: Serialize>(
    cache: &UserCacheRepository,
    cardnum: &str,
    scope: &str,
    key: &str,
    value: &T,
) {
    if let Err(e) = cache.put_json(cardnum, scope, key, value) {
        warn!(cardnum, scope, key, error = %e, "写入用户缓存失败");
    }
}
