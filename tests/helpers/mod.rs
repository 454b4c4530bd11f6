// ==========================================
// 集成测试辅助模块
// ==========================================
// 职责: Mock 上游抓取器、Mock 校历、页面构造器、测试环境组装
// ==========================================

#![allow(dead_code)]

pub mod mock_calendar;
pub mod mock_fetcher;
pub mod page_builder;
pub mod test_env;
