// ==========================================
// Mock 校历实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use campus_gateway::config::{ConfigError, ConfigResult, TermCalendarReader};
use campus_gateway::domain::types::TermCode;
use std::collections::HashMap;

/// Mock 校历：学期号 → 开学日期（epoch 毫秒）
#[derive(Debug, Clone, Default)]
pub struct MockCalendar {
    starts: HashMap<String, i64>,
    broken: bool,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个学期的开学日期
    pub fn with_term(mut self, term: &str, start_millis: i64) -> Self {
        self.starts.insert(term.to_string(), start_millis);
        self
    }

    /// 每次读取都返回错误
    pub fn broken() -> Self {
        Self {
            starts: HashMap::new(),
            broken: true,
        }
    }
}

#[async_trait]
impl TermCalendarReader for MockCalendar {
    async fn get_term_start(&self, term: &TermCode) -> ConfigResult<Option<i64>> {
        if self.broken {
            return Err(ConfigError::LockError("mock calendar unavailable".to_string()));
        }
        Ok(self.starts.get(term.as_str()).copied())
    }
}
