// ==========================================
// 校园服务聚合网关 - 课表格子扫描器
// ==========================================
// 职责: 从一个单元格的原始内容中扫描出所有课程块
// 输入: 单元格 HTML（td 标签可有可无） + 星期
// 输出: GridEntry 列表（保持单元格内顺序）
// ==========================================
// 课程块由三行组成:
//   课程名
//   [起始周-结束周周]起始节-结束节节
//   (单)/(双)? 上课地点
// 教师课表在第一行后可能多出一个空行
// ==========================================

use crate::domain::curriculum::GridEntry;
use crate::domain::types::Flip;
use crate::extractor::text::fragment_text;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::warn;

static COURSE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([^<>]*)<br\s*/?>(?:<br\s*/?>)?\[(\d+)-(\d+)周\](\d+)-(\d+)节<br\s*/?>(\([单双]\))?([^<>]*)",
    )
    .expect("内置正则表达式无效")
});

/// 扫描单元格中的全部课程块
pub fn scan_cell(cell: &str, day_of_week: u8) -> Vec<GridEntry> {
    COURSE_BLOCK
        .captures_iter(cell)
        .filter_map(|caps| parse_block(&caps, day_of_week))
        .collect()
}

fn parse_block(caps: &Captures<'_>, day_of_week: u8) -> Option<GridEntry> {
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let (Some(begin_week), Some(end_week), Some(begin_period), Some(end_period)) =
        (number(2), number(3), number(4), number(5))
    else {
        // 数字溢出 u32 时才会走到这里
        warn!(block = %&caps[0], "课程块数字无法解析，已跳过");
        return None;
    };

    Some(GridEntry {
        course_name: fragment_text(&caps[1]),
        begin_week,
        end_week,
        begin_period,
        end_period,
        flip: Flip::from_marker(caps.get(6).map(|m| m.as_str())),
        location: fragment_text(caps.get(7).map_or("", |m| m.as_str())),
        day_of_week,
    })
}
