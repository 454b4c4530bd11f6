// ==========================================
// 校园服务聚合网关 - 讲座打卡筛选引擎
// ==========================================
// 职责: 从门禁流水中筛出讲座打卡记录
// 输入: 所有页的 CheckinRecord
// 输出: 按时间倒序、去重后的 LectureAttendance
// ==========================================

use crate::domain::lecture::{CheckinRecord, LectureAttendance};
use tracing::debug;

/// 讲座卡机号与地点
pub const LECTURE_MACHINES: &[(u32, &str)] = &[(37, "教一-111"), (62, "教三-105")];

/// 同一卡机重复打卡的合并窗口（毫秒）
pub const DUPLICATE_WINDOW_MS: i64 = 60 * 1000;

pub struct LectureFilter {
    machines: Vec<(u32, String)>,
}

impl LectureFilter {
    pub fn new() -> Self {
        Self::with_machines(
            LECTURE_MACHINES
                .iter()
                .map(|&(id, location)| (id, location.to_string())),
        )
    }

    pub fn with_machines(machines: impl IntoIterator<Item = (u32, String)>) -> Self {
        Self {
            machines: machines.into_iter().collect(),
        }
    }

    fn location_of(&self, machine_id: u32) -> Option<&str> {
        self.machines
            .iter()
            .find(|(id, _)| *id == machine_id)
            .map(|(_, location)| location.as_str())
    }

    /// 筛选讲座打卡
    ///
    /// 只保留讲座卡机的记录，按时间倒序；
    /// 与排序后紧邻的前一条是同一卡机且相距不超过 1 分钟的记录视为重复
    pub fn filter(&self, records: Vec<CheckinRecord>) -> Vec<LectureAttendance> {
        let total = records.len();
        let mut lectures: Vec<CheckinRecord> = records
            .into_iter()
            .filter(|r| self.location_of(r.machine_id).is_some())
            .collect();
        lectures.sort_by(|a, b| b.time.cmp(&a.time));

        let result: Vec<LectureAttendance> = lectures
            .iter()
            .enumerate()
            .filter(|(i, record)| match i.checked_sub(1).map(|p| &lectures[p]) {
                Some(prev) => {
                    prev.machine_id != record.machine_id
                        || (prev.time - record.time).abs() > DUPLICATE_WINDOW_MS
                }
                None => true,
            })
            .filter_map(|(_, record)| {
                self.location_of(record.machine_id).map(|location| LectureAttendance {
                    time: record.time,
                    location: location.to_string(),
                })
            })
            .collect();

        debug!(total, kept = result.len(), "讲座打卡筛选完成");
        result
    }
}

impl Default for LectureFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(time: i64, machine_id: u32) -> CheckinRecord {
        CheckinRecord { time, machine_id }
    }

    #[test]
    fn test_filter_keeps_only_lecture_machines() {
        let result = LectureFilter::new().filter(vec![rec(1_000, 5), rec(2_000, 37), rec(3_000, 62)]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].location, "教三-105");
        assert_eq!(result[1].location, "教一-111");
    }

    #[test]
    fn test_filter_collapses_bursts() {
        let base = 1_500_000_000_000;
        let result = LectureFilter::new().filter(vec![
            rec(base, 37),
            rec(base + 40_000, 37),
            rec(base + 80_000, 37),
            rec(base + 300_000, 37),
        ]);
        // 80s/40s/0s 连续相距 40s，只保留最新的一条
        let times: Vec<i64> = result.iter().map(|a| a.time).collect();
        assert_eq!(times, vec![base + 300_000, base + 80_000]);
    }

    #[test]
    fn test_filter_different_machines_not_merged() {
        let result = LectureFilter::new().filter(vec![rec(10_000, 37), rec(20_000, 62)]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_filter_exactly_one_minute_is_duplicate() {
        let result = LectureFilter::new().filter(vec![rec(0, 62), rec(60_000, 62)]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].time, 60_000);
    }
}
