// ==========================================
// 测试环境组装
// ==========================================
// 职责: 用 Mock 抓取器 + 内存数据库拼出编排器与 API 实例
// ==========================================

use super::mock_calendar::MockCalendar;
use super::mock_fetcher::MockFetcher;
use campus_gateway::api::{CurriculumApi, LectureApi};
use campus_gateway::db::init_schema;
use campus_gateway::engine::{CurriculumAssembler, LectureAssembler};
use campus_gateway::repository::UserCacheRepository;
use campus_gateway::upstream::{UpstreamEndpoints, UpstreamSession};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const STUDENT_ID: &str = "213150001";
pub const GRADUATE_ID: &str = "220161234";
pub const STAFF_ID: &str = "101004321";
pub const TEST_COOKIE: &str = "JSESSIONID=test-session";

pub fn session(identifier: &str) -> UpstreamSession {
    UpstreamSession::new(identifier, TEST_COOKIE)
}

/// 内存数据库上的用户缓存
pub fn memory_cache() -> Arc<UserCacheRepository> {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    Arc::new(UserCacheRepository::from_connection(Arc::new(Mutex::new(conn))))
}

pub fn curriculum_assembler(
    fetcher: Arc<MockFetcher>,
    calendar: MockCalendar,
) -> CurriculumAssembler<MockCalendar> {
    CurriculumAssembler::new(fetcher, Arc::new(calendar), UpstreamEndpoints::default())
}

pub fn curriculum_api(
    fetcher: Arc<MockFetcher>,
    calendar: MockCalendar,
    cache: Arc<UserCacheRepository>,
    deadline: Duration,
) -> CurriculumApi<MockCalendar> {
    CurriculumApi::new(
        curriculum_assembler(fetcher, calendar),
        cache,
        Duration::from_secs(3600),
        deadline,
    )
}

pub fn lecture_api(
    fetcher: Arc<MockFetcher>,
    cache: Arc<UserCacheRepository>,
    deadline: Duration,
) -> LectureApi {
    LectureApi::new(
        LectureAssembler::new(fetcher, UpstreamEndpoints::default()),
        cache,
        Duration::from_secs(3600),
        deadline,
    )
}
