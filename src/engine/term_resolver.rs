// ==========================================
// 校园服务聚合网关 - 学期判定引擎
// ==========================================
// 职责: 决定查询哪个学期、何时回退到长学期、开学日期如何校正
// ==========================================
// 丁家桥校区多数院系不设短学期，短学期与秋季学期合并为一个 20 周的大学期，
// 而教务处系统不支持这种设定，排课老师的处理方式有三种:
// 1. 短学期 1-4 周，长学期 1-16 周: 正常课表，无需处理
// 2. 短学期为空，长学期 1-20 周: 短学期为空时转查长学期，开学日期前推 4 周
// 3. 短学期 1-4 周，长学期 5-20 周: 开学日期前推 4 周
// ==========================================

use crate::domain::curriculum::TermInfo;
use crate::domain::types::{is_graduate, TermCode};
use tracing::info;

/// 开学日期前推的毫秒数（4 周）
pub const DINGJIAQIAO_SHIFT_MS: i64 = 28 * 24 * 60 * 60 * 1000;

/// 正常长学期的周数上限
pub const REGULAR_TERM_WEEKS: u32 = 16;

// ==========================================
// TermFetchState - 抓取状态机
// ==========================================
// Initial(请求的学期) --短学期且无课--> FallbackLong(长学期) --> Done
// Initial --其他情况--> Done
// 最多两次抓取，FallbackLong 之后必然结束
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermFetchState {
    /// 首次抓取；None 表示使用教务处设定的当前学期
    Initial(Option<TermCode>),
    /// 短学期无课，改查对应的长学期
    FallbackLong(TermCode),
    Done,
}

impl TermFetchState {
    /// 本次抓取要请求的学期；Done 时没有下一次抓取
    pub fn query_term(&self) -> Option<Option<&TermCode>> {
        match self {
            TermFetchState::Initial(requested) => Some(requested.as_ref()),
            TermFetchState::FallbackLong(code) => Some(Some(code)),
            TermFetchState::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TermFetchState::Done)
    }
}

// ==========================================
// TermResolver - 学期判定
// ==========================================
pub struct TermResolver {}

impl TermResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 状态转移
    ///
    /// # 参数
    /// - state: 当前状态
    /// - resolved: 本次页面实际返回的学期号
    /// - occurrences: 本次对账得到的课程安排数
    pub fn advance(
        &self,
        state: TermFetchState,
        resolved: &TermCode,
        occurrences: usize,
    ) -> TermFetchState {
        match state {
            TermFetchState::Initial(_) if occurrences == 0 => match resolved.to_long() {
                Some(long) => {
                    info!(short = %resolved, long = %long, "短学期无课，改查长学期");
                    TermFetchState::FallbackLong(long)
                }
                None => TermFetchState::Done,
            },
            _ => TermFetchState::Done,
        }
    }

    /// 丁家桥开学日期校正
    ///
    /// 本科生和教师碰到超过 16 周的秋季学期课表时，开学日期前推 4 周；
    /// 研究生（一卡通号 22 开头）不校正；没有配置开学日期时不校正
    pub fn adjust_start_date(
        &self,
        code: &TermCode,
        max_week: u32,
        cardnum: &str,
        start_date: Option<i64>,
    ) -> Option<i64> {
        let start = start_date?;
        if max_week > REGULAR_TERM_WEEKS && !is_graduate(cardnum) && code.is_long() {
            info!(term = %code, max_week, start, "丁家桥课表，开学日期前推四周");
            Some(start - DINGJIAQIAO_SHIFT_MS)
        } else {
            Some(start)
        }
    }

    /// 组装学期信息（含开学日期校正）
    pub fn term_info(
        &self,
        code: TermCode,
        max_week: u32,
        cardnum: &str,
        configured_start: Option<i64>,
    ) -> TermInfo {
        let start_date = self.adjust_start_date(&code, max_week, cardnum, configured_start);
        TermInfo {
            code,
            max_week,
            start_date,
        }
    }
}

impl Default for TermResolver {
    fn default() -> Self {
        Self::new()
    }
}
