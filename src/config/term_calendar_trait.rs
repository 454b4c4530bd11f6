// ==========================================
// 校园服务聚合网关 - 校历读取 Trait
// ==========================================
// 职责: 定义课表引擎所需的开学日期读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::types::TermCode;
use async_trait::async_trait;

// ==========================================
// TermCalendarReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait TermCalendarReader: Send + Sync {
    /// 获取学期开学日期
    ///
    /// # 返回
    /// - Some(epoch 毫秒): 已配置
    /// - None: 未配置（课表结果中不带 startDate）
    async fn get_term_start(&self, term: &TermCode) -> ConfigResult<Option<i64>>;
}
