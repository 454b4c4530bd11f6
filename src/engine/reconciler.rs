// ==========================================
// 校园服务聚合网关 - 课表对账引擎
// ==========================================
// 职责: 合并侧栏课程与课表格子，输出课程安排列表
// 输入: SidebarIndex（只读） + GridCells
// 输出: ReconcileOutcome（课程安排 + 已认领的侧栏键）
// ==========================================
// 红线:
// - 侧栏索引只读，认领状态单独记录在 consumed 集合中
// - 找不到侧栏的格子也要输出（教师为空、学分为 0），不丢课
// - 每个侧栏条目要么被认领，要么作为浮动课程恰好输出一次
// ==========================================

use crate::domain::curriculum::{CourseOccurrence, GridCells, GridEntry, SidebarEntry, SidebarRow};
use crate::engine::grid_block::scan_cell;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// SidebarIndex - 侧栏索引
// ==========================================
// 精确索引: 课程名/起始周-结束周 → 条目
// 分组索引: 课程名 → 同名条目（多位老师分段授课）
// 两者都保持侧栏中的出现顺序
#[derive(Debug, Clone, Default)]
pub struct SidebarIndex {
    rows: Vec<SidebarRow>,
    by_key: HashMap<String, usize>,
    by_course: HashMap<String, Vec<usize>>,
}

impl SidebarIndex {
    /// 由页面顺序的侧栏行构建索引
    ///
    /// 键重复时后出现的行覆盖先出现的行，位置保持不变
    pub fn from_rows(rows: impl IntoIterator<Item = SidebarRow>) -> Self {
        let mut index = Self::default();
        for row in rows {
            if let Some(&pos) = index.by_key.get(&row.key) {
                index.rows[pos] = row;
                continue;
            }
            let pos = index.rows.len();
            index.by_key.insert(row.key.clone(), pos);
            index
                .by_course
                .entry(row.entry.course_name.trim().to_string())
                .or_default()
                .push(pos);
            index.rows.push(row);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按精确键查找
    pub fn exact(&self, key: &str) -> Option<&SidebarRow> {
        self.by_key.get(key).map(|&pos| &self.rows[pos])
    }

    /// 同一课程名下的所有条目
    pub fn by_course<'a>(&'a self, course_name: &str) -> impl Iterator<Item = &'a SidebarRow> + 'a {
        self.by_course
            .get(course_name.trim())
            .into_iter()
            .flatten()
            .map(move |&pos| &self.rows[pos])
    }

    /// 全部条目（侧栏顺序）
    pub fn rows(&self) -> &[SidebarRow] {
        &self.rows
    }
}

// ==========================================
// ReconcileOutcome - 对账结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// 按星期升序的课程安排，末尾追加浮动课程
    pub occurrences: Vec<CourseOccurrence>,
    /// 被任一课程块认领过的侧栏键
    pub consumed: HashSet<String>,
}

impl ReconcileOutcome {
    pub fn is_consumed(&self, key: &str) -> bool {
        self.consumed.contains(key)
    }

    /// 所有课程安排中最大的结束周（没有课程时为 0）
    pub fn max_week(&self) -> u32 {
        self.occurrences
            .iter()
            .map(|o| o.end_week)
            .max()
            .unwrap_or(0)
    }
}

// ==========================================
// ScheduleReconciler - 对账引擎
// ==========================================
pub struct ScheduleReconciler {}

impl ScheduleReconciler {
    pub fn new() -> Self {
        Self {}
    }

    /// 对账
    ///
    /// 1. 逐日（周一到周日）扫描每个单元格中的课程块
    /// 2. 课程块先按 课程名/起止周 精确匹配侧栏；
    ///    匹配不到时取同名的全部侧栏条目，一个课程块展开为多条课程安排
    /// 3. 两者都匹配不到时按格子本身的信息输出
    /// 4. 最后按侧栏顺序追加从未被认领的条目（浮动课程）
    #[instrument(skip_all, fields(sidebar = sidebar.len(), days = cells.len()))]
    pub fn reconcile(&self, sidebar: &SidebarIndex, cells: &GridCells) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut orphaned = 0usize;

        for (&day, day_cells) in cells {
            for cell in day_cells {
                for block in scan_cell(cell, day) {
                    if !self.place_block(sidebar, &block, &mut outcome) {
                        orphaned += 1;
                    }
                }
            }
        }

        let scheduled = outcome.occurrences.len();
        let floating: Vec<CourseOccurrence> = sidebar
            .rows()
            .iter()
            .filter(|row| !outcome.consumed.contains(&row.key))
            .map(|row| CourseOccurrence::floating(&row.entry))
            .collect();
        let floating_count = floating.len();
        outcome.occurrences.extend(floating);

        debug!(scheduled, orphaned, floating = floating_count, "对账完成");
        outcome
    }

    /// 放置一个课程块；返回是否找到了侧栏条目
    fn place_block(
        &self,
        sidebar: &SidebarIndex,
        block: &GridEntry,
        outcome: &mut ReconcileOutcome,
    ) -> bool {
        let matched: Vec<&SidebarRow> = match sidebar.exact(&block.key()) {
            Some(row) => vec![row],
            None => sidebar.by_course(&block.course_name).collect(),
        };

        if matched.is_empty() {
            debug!(course = %block.course_name, day = block.day_of_week, "侧栏中找不到课程");
            outcome.occurrences.push(CourseOccurrence::orphaned(block));
            return false;
        }

        for row in matched {
            outcome.consumed.insert(row.key.clone());
            outcome
                .occurrences
                .push(CourseOccurrence::scheduled(&row.entry, block));
        }
        true
    }
}

impl Default for ScheduleReconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷函数: 由侧栏条目直接构建索引（键按起止周拼接）
pub fn index_entries(entries: impl IntoIterator<Item = SidebarEntry>) -> SidebarIndex {
    SidebarIndex::from_rows(entries.into_iter().map(SidebarRow::new))
}
