// ==========================================
// 校园服务聚合网关 - 课表页面解析器
// ==========================================
// 职责: 从教务处课表页面中抽取学期号、身份信息、侧栏行、课表单元格
// 输入: 学生课表 / 教师课表 HTML（两者版式不同）
// 输出: 统一的 SidebarRow / GridCells，交给对账引擎
// 红线: 只做抽取，不做对账
// ==========================================

use crate::domain::curriculum::{GridCells, SidebarEntry, SidebarRow, UserProfile};
use crate::domain::types::{IdentityKind, TermCode};
use crate::extractor::error::{ExtractError, ExtractResult};
use crate::extractor::text::{fragment_text, numbers_in, parse_credit};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("内置正则表达式无效")
}

// ===== 学期号 =====
static TERM_CODE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)<font class="Context_title">[\s\S]*?(\d{2}-\d{2}-\d)[\s\S]*?</font>"#)
});

// ===== 学生身份信息 =====
static STUDENT_COLLEGE: LazyLock<Regex> = LazyLock::new(|| compile(r"院系:\[(\d*)\](.*?)<"));
static STUDENT_MAJOR: LazyLock<Regex> = LazyLock::new(|| compile(r"专业:\[([0-9A-Z]*)\](.*?)<"));
static STUDENT_SCHOOLNUM: LazyLock<Regex> = LazyLock::new(|| compile(r"学号:([0-9A-Z]*)"));
static STUDENT_CARDNUM: LazyLock<Regex> = LazyLock::new(|| compile(r"一卡通号:(\d*)"));
static STUDENT_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"姓名:([^<]*)"));

// ===== 教师身份信息 =====
static STAFF_COLLEGE_ID: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+)系 [^<]*课表"));
static STAFF_COLLEGE_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"院系:(.*?)<"));
static STAFF_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"系 ([^<]*)课表"));
static STAFF_TEACHER_PREFIX: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d+系 "));

// ===== 表格结构 =====
static TABLELINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)class="tableline"\s*>([\s\S]*?)</table"#));
// 学生课表行高 34，教师课表行高 38
static SIDEBAR_ROW: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)<tr height="3[48]">[\s\S]*?</tr\s*>"#));
static CELL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<td[^>]*>.*?</td\s*>"));
// 每一行最末尾的五个单元格（周一到周五）
static GRID_ROW: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?:<td[^>]*>.*?</td>[^<]*){5}</tr"));
static SATURDAY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)>周六</td>[^<]*<td[^>]*>([\s\S]*?)</td>"));
static SUNDAY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)>周日</td>[^<]*<td[^>]*>([\s\S]*?)</td>"));

/// 第 n 个捕获组（去首尾空白）；任一处缺失即视为页面解析失败
fn capture(re: &Regex, html: &str, group: usize, field: &'static str) -> ExtractResult<String> {
    re.captures(html)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
        .ok_or_else(|| ExtractError::missing(field))
}

// ==========================================
// 学期号
// ==========================================

/// 从课表页面标题抽取学期号
///
/// 抽取不到时返回 ParseFailure（常见原因是上游会话过期）
pub fn extract_term_code(html: &str) -> ExtractResult<TermCode> {
    let raw = capture(&TERM_CODE, html, 1, "term_code")?;
    TermCode::parse(&raw).map_err(|_| ExtractError::FieldFormat {
        field: "term_code",
        value: raw,
    })
}

// ==========================================
// 身份信息
// ==========================================

/// 抽取身份信息
///
/// # 参数
/// - kind: 学生 / 教师（决定页面版式）
/// - requested_identifier: 请求时使用的一卡通号；教师页面不显示一卡通号，沿用此值
pub fn extract_user_profile(
    html: &str,
    kind: IdentityKind,
    requested_identifier: &str,
) -> ExtractResult<UserProfile> {
    match kind {
        IdentityKind::Student => Ok(UserProfile {
            cardnum: capture(&STUDENT_CARDNUM, html, 1, "cardnum")?,
            schoolnum: capture(&STUDENT_SCHOOLNUM, html, 1, "schoolnum")?,
            name: capture(&STUDENT_NAME, html, 1, "name")?,
            college_id: capture(&STUDENT_COLLEGE, html, 1, "college_id")?,
            college_name: capture(&STUDENT_COLLEGE, html, 2, "college_name")?,
            major_id: capture(&STUDENT_MAJOR, html, 1, "major_id")?,
            major_name: capture(&STUDENT_MAJOR, html, 2, "major_name")?,
        }),
        // 教师没有学号和专业
        IdentityKind::Staff => Ok(UserProfile {
            cardnum: requested_identifier.to_string(),
            schoolnum: String::new(),
            name: capture(&STAFF_NAME, html, 1, "name")?,
            college_id: capture(&STAFF_COLLEGE_ID, html, 1, "college_id")?,
            college_name: capture(&STAFF_COLLEGE_NAME, html, 1, "college_name")?,
            major_id: String::new(),
            major_name: String::new(),
        }),
    }
}

// ==========================================
// 侧栏
// ==========================================

/// 抽取侧栏课程行（保持页面顺序）
///
/// 学生课表每行五格: (0)序号 (1)课程名 (2)教师 (3)学分 (4)周次
/// 教师课表: (0)序号 (1)课程名 (2)注释掉的教师名 (3)教师名 (4)课程编号
///          (5)考核 (6)课程类型 (7)学分 (8)学时 (9)周次
///
/// 课程名或周次为空的行是表格中的空白行，直接丢弃
pub fn extract_sidebar(html: &str, kind: IdentityKind) -> Vec<SidebarRow> {
    let table = match TABLELINE.captures_iter(html).next() {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
        None => {
            warn!("课表页面中没有侧栏表格");
            return Vec::new();
        }
    };

    let rows: Vec<&str> = SIDEBAR_ROW.find_iter(table).map(|m| m.as_str()).collect();
    // 去掉表头表尾
    let body = if rows.len() > 2 { &rows[1..rows.len() - 1] } else { &[][..] };

    let column_indices: [usize; 4] = match kind {
        IdentityKind::Student => [1, 2, 3, 4],
        IdentityKind::Staff => [1, 3, 7, 9],
    };

    let mut result = Vec::new();
    for row in body {
        let cells: Vec<String> = CELL
            .find_iter(row)
            .map(|m| fragment_text(m.as_str()))
            .collect();
        let pick = |i: usize| cells.get(i).cloned().unwrap_or_default();
        let [name_idx, teacher_idx, credit_idx, weeks_idx] = column_indices;

        let course_name = pick(name_idx);
        let weeks = pick(weeks_idx);
        if course_name.is_empty() || weeks.is_empty() {
            continue;
        }

        let mut teacher_name = pick(teacher_idx);
        if kind == IdentityKind::Staff {
            // 只留下名字
            teacher_name = STAFF_TEACHER_PREFIX.replace(&teacher_name, "").into_owned();
        }

        let numbers = numbers_in(&weeks);
        let entry = SidebarEntry {
            course_name: course_name.clone(),
            teacher_name,
            credit: parse_credit(&pick(credit_idx)),
            begin_week: numbers.first().copied().unwrap_or(0),
            end_week: numbers.get(1).or(numbers.first()).copied().unwrap_or(0),
        };

        let row = if numbers.is_empty() {
            // 周次无法解析时以原文作为索引
            SidebarRow {
                key: format!("{}/{}", course_name, weeks),
                entry,
            }
        } else {
            SidebarRow::new(entry)
        };
        result.push(row);
    }

    debug!(rows = result.len(), "侧栏解析完成");
    result
}

// ==========================================
// 课表单元格
// ==========================================

/// 抽取每个星期的课表单元格
///
/// 第二个大表格每行最后五格依次为周一到周五；
/// 周六、周日各有一个独立的大单元格
pub fn extract_grid_cells(html: &str) -> GridCells {
    let mut cells = GridCells::new();

    match TABLELINE.captures_iter(html).nth(1).and_then(|caps| caps.get(1)) {
        Some(grid) => {
            // 排除第一行（表头）
            for row in GRID_ROW.find_iter(grid.as_str()).skip(1) {
                let row_cells: Vec<&str> =
                    CELL.find_iter(row.as_str()).map(|m| m.as_str()).collect();
                let weekdays = &row_cells[row_cells.len().saturating_sub(5)..];
                for (i, cell) in weekdays.iter().enumerate() {
                    cells
                        .entry(i as u8 + 1)
                        .or_default()
                        .push(cell.to_string());
                }
            }
        }
        None => warn!("课表页面中没有课表格子"),
    }

    for (day, re) in [(6u8, &SATURDAY), (7u8, &SUNDAY)] {
        if let Some(content) = re.captures(html).and_then(|caps| caps.get(1)) {
            cells.entry(day).or_default().push(content.as_str().to_string());
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDENT_HEADER: &str = r#"<font class="Context_title">东南大学 17-18-2 学期 课表</font>
<td>院系:[09]计算机科学与工程学院</td><td>专业:[090]计算机科学与技术</td>
<td>学号:09015101</td><td>一卡通号:213150001</td><td>姓名:张三</td>"#;

    #[test]
    fn test_extract_term_code() {
        let code = extract_term_code(STUDENT_HEADER).unwrap();
        assert_eq!(code.as_str(), "17-18-2");
    }

    #[test]
    fn test_extract_term_code_missing() {
        let err = extract_term_code("<html>请重新登录</html>").unwrap_err();
        assert_eq!(err, ExtractError::ParseFailure { field: "term_code" });
    }

    #[test]
    fn test_extract_student_profile() {
        let user = extract_user_profile(STUDENT_HEADER, IdentityKind::Student, "213150001").unwrap();
        assert_eq!(user.cardnum, "213150001");
        assert_eq!(user.schoolnum, "09015101");
        assert_eq!(user.name, "张三");
        assert_eq!(user.college_id, "09");
        assert_eq!(user.college_name, "计算机科学与工程学院");
        assert_eq!(user.major_id, "090");
        assert_eq!(user.major_name, "计算机科学与技术");
    }

    #[test]
    fn test_extract_staff_profile() {
        let html = "<td>09系 王老师课表</td><td>院系:计算机科学与工程学院</td>";
        let user = extract_user_profile(html, IdentityKind::Staff, "101004321").unwrap();
        assert_eq!(user.cardnum, "101004321");
        assert_eq!(user.name, "王老师");
        assert_eq!(user.college_id, "09");
        assert_eq!(user.college_name, "计算机科学与工程学院");
        assert!(user.schoolnum.is_empty());
        assert!(user.major_id.is_empty());
    }

    #[test]
    fn test_extract_profile_missing_marker() {
        let err = extract_user_profile("<html></html>", IdentityKind::Student, "213150001");
        assert!(matches!(err, Err(ExtractError::ParseFailure { .. })));
    }

    #[test]
    fn test_extract_sidebar_student() {
        let html = r#"<table class="tableline">
<tr height="34"><td>序号</td><td>课程名称</td><td>教师</td><td>学分</td><td>周次</td></tr>
<tr height="34"><td>1</td><td>高等数学</td><td>李四</td><td>5</td><td>1-16</td></tr>
<tr height="34"><td>2</td><td></td><td></td><td></td><td></td></tr>
<tr height="34"><td>3</td><td>体育</td><td>赵六</td><td></td><td>2-8</td></tr>
<tr height="34"><td></td><td></td><td></td><td></td><td></td></tr>
</table>"#;
        let rows = extract_sidebar(html, IdentityKind::Student);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "高等数学/1-16");
        assert_eq!(rows[0].entry.teacher_name, "李四");
        assert_eq!(rows[0].entry.credit, 5.0);
        assert_eq!(rows[1].key, "体育/2-8");
        assert_eq!(rows[1].entry.credit, 0.0);
    }

    #[test]
    fn test_extract_sidebar_staff_columns() {
        let html = r#"<table class="tableline">
<tr height="38"><td>序号</td><td>课程名称</td><td>x</td><td>教师</td><td>编号</td><td>考核</td><td>类型</td><td>学分</td><td>学时</td><td>周次</td></tr>
<tr height="38"><td>1</td><td>编译原理</td><td><!-- 王 --></td><td>09系 王老师</td><td>B09</td><td>考试</td><td>必修</td><td>3</td><td>48</td><td>1-16</td></tr>
<tr height="38"><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>
</table>"#;
        let rows = extract_sidebar(html, IdentityKind::Staff);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.course_name, "编译原理");
        assert_eq!(rows[0].entry.teacher_name, "王老师");
        assert_eq!(rows[0].entry.credit, 3.0);
        assert_eq!((rows[0].entry.begin_week, rows[0].entry.end_week), (1, 16));
    }

    #[test]
    fn test_extract_sidebar_unparsed_weeks_uses_raw_key() {
        let html = r#"<table class="tableline">
<tr height="34"><td>序号</td><td>课程名称</td><td>教师</td><td>学分</td><td>周次</td></tr>
<tr height="34"><td>1</td><td>形势与政策</td><td>钱七</td><td>0.5</td><td>待定</td></tr>
<tr height="34"><td></td><td></td><td></td><td></td><td></td></tr>
</table>"#;
        let rows = extract_sidebar(html, IdentityKind::Student);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "形势与政策/待定");
        assert_eq!(rows[0].entry.begin_week, 0);
    }

    #[test]
    fn test_extract_grid_cells() {
        let html = r#"<table class="tableline"><tr height="34"><td>x</td></tr></table>
<table class="tableline">
<tr><td>节次</td><td>周一</td><td>周二</td><td>周三</td><td>周四</td><td>周五</td></tr>
<tr><td>上午</td><td>1</td><td class="a">Math<br>[1-16周]1-2节<br>Room101</td><td></td><td></td><td></td><td></td></tr>
</table>
<table><tr><td>&nbsp;</td><td>周六</td><td class="big">PE<br>[1-8周]1-2节<br>操场</td></tr>
<tr><td>周日</td> <td class="big"></td></tr></table>"#;
        let cells = extract_grid_cells(html);
        assert!(cells[&1][0].contains("Math"));
        assert_eq!(cells[&2].len(), 1);
        assert_eq!(cells[&5].len(), 1);
        assert!(cells[&6][0].contains("PE"));
        assert_eq!(cells[&7], vec![String::new()]);
    }

    #[test]
    fn test_extract_grid_cells_empty_page() {
        let cells = extract_grid_cells("<html></html>");
        assert!(cells.is_empty());
    }
}
