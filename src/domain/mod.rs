// ==========================================
// 校园服务聚合网关 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod curriculum;
pub mod lecture;
pub mod types;

// 重导出核心类型
pub use curriculum::{
    sidebar_key, CourseOccurrence, CurriculumResult, GridCells, GridEntry, SidebarEntry,
    SidebarRow, TermInfo, UserProfile,
};
pub use lecture::{CheckinRecord, LectureAttendance};
pub use types::{is_graduate, Flip, IdentityKind, InvalidTermCode, TermCode};
