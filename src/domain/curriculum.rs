// ==========================================
// 校园服务聚合网关 - 课表领域模型
// ==========================================
// 职责: 侧栏课程、课表格子、课程安排、学期信息、用户信息
// 红线: 纯数据，不含解析与对账逻辑
// ==========================================

use crate::domain::types::{Flip, TermCode};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// 每个星期（1 ~ 7）对应的课表单元格原始 HTML
pub type GridCells = BTreeMap<u8, Vec<String>>;

// ==========================================
// SidebarEntry - 侧栏课程
// ==========================================
// 侧栏列出每门课（每位老师）的教师、学分、起止周次，与具体上课时间无关
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarEntry {
    pub course_name: String,  // 课程名
    pub teacher_name: String, // 教师名
    pub credit: f64,          // 学分（缺失或非数字时为 0）
    pub begin_week: u32,      // 起始周
    pub end_week: u32,        // 结束周
}

impl SidebarEntry {
    /// 侧栏索引键: 课程名/起始周-结束周
    pub fn key(&self) -> String {
        sidebar_key(&self.course_name, self.begin_week, self.end_week)
    }
}

// ==========================================
// SidebarRow - 侧栏中的一行（带索引键）
// ==========================================
// 周次文本能解析出起止周时键为 课程名/起始-结束，否则为 课程名/周次原文
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarRow {
    pub key: String,
    pub entry: SidebarEntry,
}

impl SidebarRow {
    pub fn new(entry: SidebarEntry) -> Self {
        Self {
            key: entry.key(),
            entry,
        }
    }
}

/// 拼接侧栏索引键
pub fn sidebar_key(course_name: &str, begin_week: u32, end_week: u32) -> String {
    format!("{}/{}-{}", course_name.trim(), begin_week, end_week)
}

// ==========================================
// GridEntry - 课表格子中的一节课
// ==========================================
// 由每个星期的单元格扫描得到，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEntry {
    pub course_name: String,
    pub begin_week: u32,
    pub end_week: u32,
    pub begin_period: u32, // 起始节次 1 ~ 13
    pub end_period: u32,
    pub flip: Flip,
    pub location: String,
    pub day_of_week: u8, // 1 ~ 7 分别表示周一到周日
}

impl GridEntry {
    /// 精确匹配用的侧栏索引键
    pub fn key(&self) -> String {
        sidebar_key(&self.course_name, self.begin_week, self.end_week)
    }
}

// ==========================================
// CourseOccurrence - 输出的课程安排
// ==========================================
// 浮动课程只有前五个字段；非浮动课程兼有上课时间与地点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOccurrence {
    pub course_name: String,
    pub teacher_name: String,
    #[serde(serialize_with = "serialize_credit")]
    pub credit: f64,
    pub begin_week: u32,
    pub end_week: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip: Option<Flip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_period: Option<u32>,
}

/// 整数学分输出为 3 而不是 3.0
fn serialize_credit<S: Serializer>(credit: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if credit.fract() == 0.0 && credit.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*credit as i64)
    } else {
        serializer.serialize_f64(*credit)
    }
}

impl CourseOccurrence {
    /// 由侧栏课程 + 课表格子生成非浮动课程
    ///
    /// 周次、教师、学分取侧栏（侧栏是每位老师各自的上课周数，格子里是总周数）
    pub fn scheduled(sidebar: &SidebarEntry, grid: &GridEntry) -> Self {
        Self {
            course_name: grid.course_name.clone(),
            teacher_name: sidebar.teacher_name.clone(),
            credit: sidebar.credit,
            begin_week: sidebar.begin_week,
            end_week: sidebar.end_week,
            day_of_week: Some(grid.day_of_week),
            flip: Some(grid.flip),
            location: Some(grid.location.clone()),
            begin_period: Some(grid.begin_period),
            end_period: Some(grid.end_period),
        }
    }

    /// 侧栏中找不到对应课程的格子：教师为空、学分为 0
    pub fn orphaned(grid: &GridEntry) -> Self {
        Self {
            course_name: grid.course_name.clone(),
            teacher_name: String::new(),
            credit: 0.0,
            begin_week: grid.begin_week,
            end_week: grid.end_week,
            day_of_week: Some(grid.day_of_week),
            flip: Some(grid.flip),
            location: Some(grid.location.clone()),
            begin_period: Some(grid.begin_period),
            end_period: Some(grid.end_period),
        }
    }

    /// 未被任何格子认领的侧栏课程
    pub fn floating(sidebar: &SidebarEntry) -> Self {
        Self {
            course_name: sidebar.course_name.clone(),
            teacher_name: sidebar.teacher_name.clone(),
            credit: sidebar.credit,
            begin_week: sidebar.begin_week,
            end_week: sidebar.end_week,
            day_of_week: None,
            flip: None,
            location: None,
            begin_period: None,
            end_period: None,
        }
    }

    pub fn is_floating(&self) -> bool {
        self.day_of_week.is_none()
    }
}

// ==========================================
// TermInfo - 学期信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermInfo {
    pub code: TermCode,
    pub max_week: u32,
    /// 开学日期（epoch 毫秒）；查不到时为空
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
}

// ==========================================
// UserProfile - 课表页面上的身份信息
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub cardnum: String,
    pub schoolnum: String, // 教师为空
    pub name: String,
    pub college_id: String,
    pub college_name: String,
    pub major_id: String, // 教师为空
    pub major_name: String,
}

// ==========================================
// CurriculumResult - 课表查询结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumResult {
    pub term: TermInfo,
    pub user: UserProfile,
    pub curriculum: Vec<CourseOccurrence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_sidebar() -> SidebarEntry {
        SidebarEntry {
            course_name: "Math".to_string(),
            teacher_name: "Li".to_string(),
            credit: 3.0,
            begin_week: 1,
            end_week: 16,
        }
    }

    #[test]
    fn test_sidebar_key_trims_name() {
        assert_eq!(sidebar_key(" Math ", 1, 16), "Math/1-16");
        assert_eq!(math_sidebar().key(), "Math/1-16");
    }

    #[test]
    fn test_floating_omits_schedule_fields() {
        let value = serde_json::to_value(CourseOccurrence::floating(&math_sidebar())).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert_eq!(obj["courseName"], "Math");
        assert_eq!(obj["teacherName"], "Li");
        assert!(!obj.contains_key("dayOfWeek"));
        assert!(!obj.contains_key("location"));
    }

    #[test]
    fn test_scheduled_takes_weeks_from_sidebar() {
        let grid = GridEntry {
            course_name: "Math".to_string(),
            begin_week: 1,
            end_week: 18,
            begin_period: 3,
            end_period: 4,
            flip: Flip::Odd,
            location: "Room101".to_string(),
            day_of_week: 2,
        };
        let occ = CourseOccurrence::scheduled(&math_sidebar(), &grid);
        assert_eq!(occ.end_week, 16);
        assert_eq!(occ.flip, Some(Flip::Odd));
        assert!(!occ.is_floating());

        let value = serde_json::to_value(&occ).unwrap();
        assert_eq!(value["flip"], "odd");
        assert_eq!(value["beginPeriod"], 3);
    }

    #[test]
    fn test_whole_credit_serialized_as_integer() {
        let occ = CourseOccurrence::floating(&math_sidebar());
        let text = serde_json::to_string(&occ).unwrap();
        assert!(text.contains("\"credit\":3,"));

        let mut half = math_sidebar();
        half.credit = 2.5;
        let value = serde_json::to_value(CourseOccurrence::floating(&half)).unwrap();
        assert_eq!(value["credit"], 2.5);

        // 缓存里读回来仍是 f64
        let back: CourseOccurrence = serde_json::from_str(&text).unwrap();
        assert_eq!(back.credit, 3.0);
    }

    #[test]
    fn test_term_info_without_start_date() {
        let info = TermInfo {
            code: TermCode::parse("17-18-2").unwrap(),
            max_week: 0,
            start_date: None,
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["code"], "17-18-2");
        assert_eq!(value["maxWeek"], 0);
        assert!(value.get("startDate").is_none());
    }
}
