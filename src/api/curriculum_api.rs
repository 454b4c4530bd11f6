// ==========================================
// 校园服务聚合网关 - 课表查询 API
// ==========================================
// 职责: 参数校验、用户缓存、请求时限、调用课表编排器
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::api::cache_support;
use crate::api::error::{ApiError, ApiResult};
use crate::config::TermCalendarReader;
use crate::domain::curriculum::CurriculumResult;
use crate::domain::types::TermCode;
use crate::engine::CurriculumAssembler;
use crate::perf::PerfGuard;
use crate::repository::{cache_scopes, UserCacheRepository};
use crate::upstream::UpstreamSession;

/// 未指定学期时的缓存键
pub const CURRENT_TERM_CACHE_KEY: &str = "current";

// ==========================================
// CurriculumApi - 课表查询 API
// ==========================================
pub struct CurriculumApi<C>
where
    C: TermCalendarReader,
{
    assembler: CurriculumAssembler<C>,
    cache: Arc<UserCacheRepository>,
    cache_ttl: Duration,
    deadline: Duration,
}

impl<C> CurriculumApi<C>
where
    C: TermCalendarReader,
{
    /// 创建新的CurriculumApi实例
    ///
    /// # 参数
    /// - cache_ttl: 课表缓存有效期
    /// - deadline: 单个请求的总时限（含回退抓取）
    pub fn new(
        assembler: CurriculumAssembler<C>,
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

    /// 查询课表
    ///
    /// # 参数
    /// - session: 已认证的上游会话
    /// - term: 学期号（YY-YY-N）；不填则为教务处设定的当前学期
    ///
    /// # 返回
    /// - Ok(CurriculumResult): 课表
    /// - Err(ApiError::InvalidInput): 学期号格式错误
    /// - Err(ApiError::SessionExpired): 上游会话失效或页面无法解析
    /// - Err(ApiError::UpstreamTimeout): 超出请求时限（不返回部分结果）
    #[instrument(skip(self, session), fields(cardnum = %session.identifier))]
    pub async fn get_curriculum(
        &self,
        session: &UpstreamSession,
        term: Option<&str>,
    ) -> ApiResult<CurriculumResult> {
        let _perf = PerfGuard::new("get_curriculum");

        let requested = parse_term_param(term)?;
        let cache_key = requested
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| CURRENT_TERM_CACHE_KEY.to_string());

        if let Some(hit) = cache_support::read_fresh::<CurriculumResult>(
            &self.cache,
            &session.identifier,
            cache_scopes::CURRICULUM,
            &cache_key,
            self.cache_ttl,
        ) {
            debug!(cache_key = %cache_key, "课表命中缓存");
            return Ok(hit);
        }

        let result = tokio::time::timeout(
            self.deadline,
            self.assembler.get_curriculum(session, requested),
        )
        .await
        .map_err(|_| {
            ApiError::UpstreamTimeout(format!("课表查询超过 {} 秒", self.deadline.as_secs()))
        })??;

        cache_support::write(
            &self.cache,
            &session.identifier,
            cache_scopes::CURRICULUM,
            &cache_key,
            &result,
        );
        Ok(result)
    }
}

/// 解析学期参数；空白视为未指定
pub fn parse_term_param(term: Option<&str>) -> ApiResult<Option<TermCode>> {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(raw) => TermCode::parse(raw)
            .map(Some)
            .map_err(|e| ApiError::InvalidInput(e.to_string())),
    }
}
