// ==========================================
// 校园服务聚合网关 - 配置管理器
// ==========================================
// 职责: 运行期配置查询与覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::term_calendar_trait::TermCalendarReader;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::types::TermCode;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（并确保表存在）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并建表（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global 配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ConfigResult<HashMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    // ===== 校历 =====

    /// 写入学期开学日期（epoch 毫秒）
    pub fn set_term_start(&self, term: &TermCode, start_millis: i64) -> ConfigResult<()> {
        self.set_global_config_value(&config_keys::term_start(term), &start_millis.to_string())
    }

    /// 用启动配置中的校历替换 config_kv 中的全部开学日期（单个事务）
    ///
    /// 配置中没有的学期会被删除，查询时不再带 startDate
    ///
    /// # 返回
    /// 写入的学期数
    pub fn seed_term_calendar(&self, terms: &[(TermCode, i64)]) -> ConfigResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key GLOB ?1",
            params![format!("{}*", config_keys::TERM_START_PREFIX)],
        )?;
        for (term, start) in terms {
            tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![config_keys::term_start(term), start.to_string()],
            )?;
        }
        tx.commit()?;

        info!(terms = terms.len(), removed, "校历已写入配置表");
        Ok(terms.len())
    }
}

// ==========================================
// TermCalendarReader Trait 实现
// ==========================================
#[async_trait]
impl TermCalendarReader for ConfigManager {
    async fn get_term_start(&self, term: &TermCode) -> ConfigResult<Option<i64>> {
        let key = config_keys::term_start(term);
        let Some(value) = self.get_global_config_value(&key)? else {
            return Ok(None);
        };
        match value.trim().parse::<i64>() {
            Ok(millis) => Ok(Some(millis)),
            Err(_) => {
                warn!(config_key = %key, raw_value = %value, "开学日期配置格式错误，按未配置处理");
                Ok(None)
            }
        }
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    use crate::domain::types::TermCode;

    /// 开学日期前缀: term_start/<学期号>
    pub const TERM_START_PREFIX: &str = "term_start/";

    pub fn term_start(term: &TermCode) -> String {
        format!("{}{}", TERM_START_PREFIX, term)
    }
}
