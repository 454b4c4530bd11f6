// ==========================================
// 校园服务聚合网关 - 引擎层
// ==========================================
// 职责: 课表对账、学期判定、讲座打卡筛选，以及它们的编排
// 红线: Engine 不拼 SQL；对账失败不致命（尽力输出完整课表）
// ==========================================

pub mod error;
pub mod grid_block;
pub mod lecture;
pub mod orchestrator;
pub mod reconciler;
pub mod term_resolver;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use grid_block::scan_cell;
pub use lecture::LectureFilter;
pub use orchestrator::{
    CurriculumAssembler, LectureAssembler, CHECKIN_PAGE_CONCURRENCY, MAX_CHECKIN_PAGES,
};
pub use reconciler::{index_entries, ReconcileOutcome, ScheduleReconciler, SidebarIndex};
pub use term_resolver::{TermFetchState, TermResolver, DINGJIAQIAO_SHIFT_MS};
