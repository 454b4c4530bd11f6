// ==========================================
// 校园服务聚合网关 - 引擎编排器
// ==========================================
// 用途: 协调 抓取 → 解析 → 对账 → 学期判定 的执行顺序
// 红线: 抓取严格串行（长学期只在短学期无课时才抓）；对账不跨请求共享状态
// ==========================================

use crate::config::TermCalendarReader;
use crate::domain::curriculum::CurriculumResult;
use crate::domain::lecture::LectureAttendance;
use crate::domain::types::{IdentityKind, TermCode};
use crate::engine::error::EngineResult;
use crate::engine::lecture::LectureFilter;
use crate::engine::reconciler::{ScheduleReconciler, SidebarIndex};
use crate::engine::term_resolver::{TermFetchState, TermResolver};
use crate::extractor::{
    extract_account, extract_checkin_rows, extract_grid_cells, extract_page_total,
    extract_sidebar, extract_term_code, extract_user_profile,
};
use crate::upstream::{FormRequest, UpstreamEndpoints, UpstreamFetcher, UpstreamSession};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// CurriculumAssembler - 课表编排器
// ==========================================
pub struct CurriculumAssembler<C>
where
    C: TermCalendarReader,
{
    fetcher: Arc<dyn UpstreamFetcher>,
    calendar: Arc<C>,
    endpoints: UpstreamEndpoints,
    reconciler: ScheduleReconciler,
    resolver: TermResolver,
}

impl<C> CurriculumAssembler<C>
where
    C: TermCalendarReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - fetcher: 上游抓取器
    /// - calendar: 校历读取器
    /// - endpoints: 上游地址
    pub fn new(
        fetcher: Arc<dyn UpstreamFetcher>,
        calendar: Arc<C>,
        endpoints: UpstreamEndpoints,
    ) -> Self {
        Self {
            fetcher,
            calendar,
            endpoints,
            reconciler: ScheduleReconciler::new(),
            resolver: TermResolver::new(),
        }
    }

    /// 查询课表
    ///
    /// # 参数
    /// - session: 已认证的上游会话
    /// - requested: 请求的学期；None 表示教务处设定的当前学期
    ///
    /// 短学期无课时自动改查长学期，最多两次抓取
    pub async fn get_curriculum(
        &self,
        session: &UpstreamSession,
        requested: Option<TermCode>,
    ) -> EngineResult<CurriculumResult> {
        // 老师的号码是 1 开头的九位数
        let kind = IdentityKind::from_identifier(&session.identifier);
        info!(
            identifier = %session.identifier,
            kind = %kind,
            requested = ?requested.as_ref().map(TermCode::as_str),
            "开始查询课表"
        );

        let mut query = requested.clone();
        let mut state = TermFetchState::Initial(requested);
        loop {
            let attempt = self.fetch_once(session, kind, query.as_ref()).await?;
            state = self
                .resolver
                .advance(state, &attempt.term.code, attempt.curriculum.len());

            match state.query_term() {
                Some(next) => query = next.cloned(),
                None => {
                    info!(
                        term = %attempt.term.code,
                        max_week = attempt.term.max_week,
                        courses = attempt.curriculum.len(),
                        "课表查询完成"
                    );
                    return Ok(attempt);
                }
            }
        }
    }

    /// 单次抓取 + 对账
    async fn fetch_once(
        &self,
        session: &UpstreamSession,
        kind: IdentityKind,
        term: Option<&TermCode>,
    ) -> EngineResult<CurriculumResult> {
        // ==========================================
        // 步骤1: 抓取课表页面
        // ==========================================
        let request = self.endpoints.curriculum(kind, &session.identifier, term);
        debug!(url = %request.url, term = ?term.map(TermCode::as_str), "步骤1: 抓取课表页面");
        let html = self
            .fetcher
            .post_form(session, &request.url, &request.fields)
            .await?;

        // ==========================================
        // 步骤2: 解析学期号、身份信息、侧栏、格子
        // ==========================================
        let code = extract_term_code(&html)?;
        let user = extract_user_profile(&html, kind, &session.identifier)?;
        let sidebar = SidebarIndex::from_rows(extract_sidebar(&html, kind));
        let cells = extract_grid_cells(&html);
        debug!(term = %code, sidebar = sidebar.len(), days = cells.len(), "步骤2: 页面解析完成");

        // ==========================================
        // 步骤3: 对账
        // ==========================================
        let outcome = self.reconciler.reconcile(&sidebar, &cells);
        let max_week = outcome.max_week();
        debug!(
            courses = outcome.occurrences.len(),
            consumed = outcome.consumed.len(),
            max_week,
            "步骤3: 对账完成"
        );

        // ==========================================
        // 步骤4: 开学日期与丁家桥校正
        // ==========================================
        let configured_start = match self.calendar.get_term_start(&code).await {
            Ok(start) => start,
            Err(e) => {
                warn!(term = %code, error = %e, "读取开学日期失败，按未配置处理");
                None
            }
        };
        let term = self
            .resolver
            .term_info(code, max_week, &user.cardnum, configured_start);

        Ok(CurriculumResult {
            term,
            user,
            curriculum: outcome.occurrences,
        })
    }
}

// ==========================================
// LectureAssembler - 讲座打卡编排器
// ==========================================

/// 门禁流水最多抓取的页数（超出部分忽略）
pub const MAX_CHECKIN_PAGES: u32 = 100;

/// 同时在途的流水页请求数
pub const CHECKIN_PAGE_CONCURRENCY: usize = 4;

pub struct LectureAssembler {
    fetcher: Arc<dyn UpstreamFetcher>,
    endpoints: UpstreamEndpoints,
    filter: LectureFilter,
}

impl LectureAssembler {
    pub fn new(fetcher: Arc<dyn UpstreamFetcher>, endpoints: UpstreamEndpoints) -> Self {
        Self {
            fetcher,
            endpoints,
            filter: LectureFilter::new(),
        }
    }

    /// 查询讲座打卡记录
    ///
    /// 先访问一卡通门户建立会话，再读账号与总页数，最后按页抓取
    ///
    /// 总页数来自上游页面，超过 MAX_CHECKIN_PAGES 时截断；
    /// 同时在途的请求不超过 CHECKIN_PAGE_CONCURRENCY 个，结果保持页序
    pub async fn get_lectures(&self, session: &UpstreamSession) -> EngineResult<Vec<LectureAttendance>> {
        self.fetcher
            .get(session, &self.endpoints.ecard_home())
            .await?;

        let account_page = self
            .fetcher
            .get(session, &self.endpoints.ecard_account_page())
            .await?;
        let account = extract_account(&account_page)?;

        let first = self.endpoints.ecard_checkins(&account, None);
        let first_page = self
            .fetcher
            .post_form(session, &first.url, &first.fields)
            .await?;
        let reported = extract_page_total(&first_page)?;
        let page_total = reported.min(MAX_CHECKIN_PAGES);
        if page_total < reported {
            warn!(reported, limit = MAX_CHECKIN_PAGES, "门禁流水页数过多，已截断");
        }
        debug!(page_total, "门禁流水总页数");

        let requests: Vec<FormRequest> = (1..=page_total)
            .map(|page| self.endpoints.ecard_checkins(&account, Some(page)))
            .collect();
        let pages: Vec<String> = stream::iter(&requests)
            .map(|req| self.fetcher.post_form(session, &req.url, &req.fields))
            .buffered(CHECKIN_PAGE_CONCURRENCY)
            .try_collect()
            .await?;

        let records = pages
            .iter()
            .flat_map(|html| extract_checkin_rows(html))
            .collect();
        let lectures = self.filter.filter(records);
        info!(pages = page_total, lectures = lectures.len(), "讲座打卡查询完成");
        Ok(lectures)
    }
}
