// ==========================================
// 校园服务聚合网关 - 人文讲座打卡 API
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::api::cache_support;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::lecture::LectureAttendance;
use crate::engine::LectureAssembler;
use crate::perf::PerfGuard;
use crate::repository::{cache_scopes, UserCacheRepository};
use crate::upstream::UpstreamSession;

const LECTURE_CACHE_KEY: &str = "all";

pub struct LectureApi {
    assembler: LectureAssembler,
    cache: Arc<UserCacheRepository>,
    cache_ttl: Duration,
    deadline: Duration,
}

impl LectureApi {
    pub fn new(
        assembler: LectureAssembler,
        cache: Arc<UserCacheRepository>,
        cache_ttl: Duration,
        deadline: Duration,
    ) -> Self {
        Self {
            assembler,
            cache,
            cache_ttl,
            deadline,
        }
    }

    /// 查询讲座打卡记录（按时间倒序）
    #[instrument(skip(self, session), fields(cardnum = %session.identifier))]
    pub async fn get_lectures(&self, session: &UpstreamSession) -> ApiResult<Vec<LectureAttendance>> {
        let _perf = PerfGuard::new("get_lectures");

        if let Some(hit) = cache_support::read_fresh::<Vec<LectureAttendance>>(
            &self.cache,
            &session.identifier,
            cache_scopes::LECTURE,
            LECTURE_CACHE_KEY,
            self.cache_ttl,
        ) {
            debug!("讲座打卡命中缓存");
            return Ok(hit);
        }

        let lectures = tokio::time::timeout(self.deadline, self.assembler.get_lectures(session))
            .await
            .map_err(|_| {
                ApiError::UpstreamTimeout(format!("讲座查询超过 {} 秒", self.deadline.as_secs()))
            })??;

        cache_support::write(
            &self.cache,
            &session.identifier,
            cache_scopes::LECTURE,
            LECTURE_CACHE_KEY,
            &lectures,
        );
        Ok(lectures)
    }
}
