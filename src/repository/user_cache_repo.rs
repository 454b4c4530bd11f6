// ==========================================
// 校园服务聚合网关 - 用户缓存仓储
// ==========================================
// 职责: 管理 user_cache 表（按用户隔离的上游结果缓存）
// 红线: 不含业务逻辑；缓存键必须带一卡通号，不同用户之间不共享
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// 缓存作用域
pub mod cache_scopes {
    pub const CURRICULUM: &str = "curriculum";
    pub const LECTURE: &str = "lecture";
}

/// 一条缓存记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub payload_json: String,
    pub cached_at: i64, // epoch 毫秒
}

// ==========================================
// UserCacheRepository - 用户缓存仓储
// ==========================================
pub struct UserCacheRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserCacheRepository {
    /// 创建新的 UserCacheRepository 实例（并确保表存在）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取缓存（不论新旧）
    pub fn get(
        &self,
        cardnum: &str,
        scope: &str,
        cache_key: &str,
    ) -> RepositoryResult<Option<CacheEntry>> {
        let conn = self.get_conn()?;
        let entry = conn
            .query_row(
                r#"
                SELECT payload_json, cached_at
                FROM user_cache
                WHERE cardnum = ?1 AND scope = ?2 AND cache_key = ?3
                "#,
                params![cardnum, scope, cache_key],
                |row| {
                    Ok(CacheEntry {
                        payload_json: row.get(0)?,
                        cached_at: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// 读取未过期的缓存
    ///
    /// # 返回
    /// - Ok(Some(payload)): 缓存时间距今不超过 ttl
    /// - Ok(None): 无缓存或已过期
    pub fn get_fresh(
        &self,
        cardnum: &str,
        scope: &str,
        cache_key: &str,
        ttl: Duration,
    ) -> RepositoryResult<Option<String>> {
        let now = Utc::now().timestamp_millis();
        let fresh = self
            .get(cardnum, scope, cache_key)?
            .filter(|entry| now - entry.cached_at <= ttl_millis(ttl))
            .map(|entry| entry.payload_json);
        debug!(cardnum, scope, cache_key, hit = fresh.is_some(), "读取用户缓存");
        Ok(fresh)
    }

    /// 写入缓存（存在则覆盖），缓存时间为当前时间
    pub fn put(
        &self,
        cardnum: &str,
        scope: &str,
        cache_key: &str,
        payload_json: &str,
    ) -> RepositoryResult<()> {
        self.put_at(
            cardnum,
            scope,
            cache_key,
            payload_json,
            Utc::now().timestamp_millis(),
        )
    }

    /// 以指定缓存时间写入
    pub fn put_at(
        &self,
        cardnum: &str,
        scope: &str,
        cache_key: &str,
        payload_json: &str,
        cached_at: i64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO user_cache (cardnum, scope, cache_key, payload_json, cached_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(cardnum, scope, cache_key)
            DO UPDATE SET payload_json = ?4, cached_at = ?5
            "#,
            params![cardnum, scope, cache_key, payload_json, cached_at],
        )?;
        Ok(())
    }

    /// 读取并反序列化未过期的缓存；内容无法反序列化时视为未命中
    pub fn get_fresh_json<T: DeserializeOwned>(
        &self,
        cardnum: &str,
        scope: &str,
        cache_key: &str,
        ttl: Duration,
    ) -> RepositoryResult<Option<T>> {
        let Some(raw) = self.get_fresh(cardnum, scope, cache_key, ttl)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(cardnum, scope, cache_key, error = %e, "缓存内容无法解析，视为未命中");
                Ok(None)
            }
        }
    }

    /// 序列化后写入缓存
    pub fn put_json<T: Serialize>(
        &self,
        cardnum: &str,
        scope: &str,
        cache_key: &str,
        value: &T,
    ) -> RepositoryResult<()> {
        let payload = serde_json::to_string(value).map_err(|e| RepositoryError::PayloadError {
            scope: scope.to_string(),
            message: e.to_string(),
        })?;
        self.put(cardnum, scope, cache_key, &payload)
    }

    /// 删除所有超过 ttl 的缓存
    ///
    /// # 返回
    /// 删除的记录数
    pub fn purge_expired(&self, ttl: Duration) -> RepositoryResult<usize> {
        let cutoff = Utc::now().timestamp_millis() - ttl_millis(ttl);
        let conn = self.get_conn()?;
        let removed = conn.execute("DELETE FROM user_cache WHERE cached_at < ?1", params![cutoff])?;
        Ok(removed)
    }
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}
