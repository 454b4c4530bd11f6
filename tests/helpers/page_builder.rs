// ==========================================
// 上游页面构造器 - 用于集成测试
// ==========================================
// 按教务处 / 一卡通系统的版式拼出最小可解析页面
// ==========================================

use campus_gateway::domain::types::IdentityKind;

/// 课程块: 课程名<br>[周]节<br>(单双)地点
pub fn block(name: &str, weeks: (u32, u32), periods: (u32, u32), flip: Option<&str>, location: &str) -> String {
    format!(
        "{}<br>[{}-{}周]{}-{}节<br>{}{}",
        name,
        weeks.0,
        weeks.1,
        periods.0,
        periods.1,
        flip.unwrap_or(""),
        location
    )
}

struct SidebarLine {
    name: String,
    teacher: String,
    credit: String,
    weeks: String,
}

pub struct CurriculumPageBuilder {
    kind: IdentityKind,
    term: String,
    cardnum: String,
    sidebar: Vec<SidebarLine>,
    // 下标 0 ~ 6 对应周一到周日
    days: [Vec<String>; 7],
}

impl CurriculumPageBuilder {
    pub fn student(term: &str, cardnum: &str) -> Self {
        Self::new(IdentityKind::Student, term, cardnum)
    }

    /// 教师课表页面不显示一卡通号
    pub fn staff(term: &str) -> Self {
        Self::new(IdentityKind::Staff, term, "")
    }

    fn new(kind: IdentityKind, term: &str, cardnum: &str) -> Self {
        Self {
            kind,
            term: term.to_string(),
            cardnum: cardnum.to_string(),
            sidebar: Vec::new(),
            days: Default::default(),
        }
    }

    /// 侧栏添加一门课
    pub fn course(mut self, name: &str, teacher: &str, credit: &str, weeks: &str) -> Self {
        self.sidebar.push(SidebarLine {
            name: name.to_string(),
            teacher: teacher.to_string(),
            credit: credit.to_string(),
            weeks: weeks.to_string(),
        });
        self
    }

    /// 在某一天放一个单元格（可含多个课程块）
    pub fn cell(mut self, day: u8, content: impl Into<String>) -> Self {
        let idx = usize::from(day.clamp(1, 7) - 1);
        self.days[idx].push(content.into());
        self
    }

    pub fn build(&self) -> String {
        let mut html = String::from("<html><body>\n");
        html.push_str(&self.header());
        html.push_str(&self.sidebar_table());
        html.push_str(&self.grid_table());
        html.push_str(&self.weekend_table());
        html.push_str("</body></html>\n");
        html
    }

    fn header(&self) -> String {
        match self.kind {
            IdentityKind::Student => format!(
                r#"<font class="Context_title">东南大学 {} 学期 学生课表</font>
<table><tr><td>院系:[09]计算机科学与工程学院</td><td>专业:[090]计算机科学与技术</td><td>学号:09015101</td><td>一卡通号:{}</td><td>姓名:张三</td></tr></table>
"#,
                self.term, self.cardnum
            ),
            IdentityKind::Staff => format!(
                r#"<font class="Context_title">东南大学 {} 学期 教师课表</font>
<table><tr><td>09系 王老师课表</td><td>院系:计算机科学与工程学院</td></tr></table>
"#,
                self.term
            ),
        }
    }

    fn sidebar_table(&self) -> String {
        let (height, columns) = match self.kind {
            IdentityKind::Student => ("34", 5),
            IdentityKind::Staff => ("38", 10),
        };

        let mut html = String::from("<table class=\"tableline\">\n");
        html.push_str(&format!(
            "<tr height=\"{}\">{}</tr>\n",
            height,
            "<td>表头</td>".repeat(columns)
        ));
        for (i, line) in self.sidebar.iter().enumerate() {
            let cells = match self.kind {
                IdentityKind::Student => vec![
                    (i + 1).to_string(),
                    line.name.clone(),
                    line.teacher.clone(),
                    line.credit.clone(),
                    line.weeks.clone(),
                ],
                IdentityKind::Staff => vec![
                    (i + 1).to_string(),
                    line.name.clone(),
                    "<!-- 注释 -->".to_string(),
                    format!("09系 {}", line.teacher),
                    "B09".to_string(),
                    "考试".to_string(),
                    "必修".to_string(),
                    line.credit.clone(),
                    "48".to_string(),
                    line.weeks.clone(),
                ],
            };
            let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
            html.push_str(&format!("<tr height=\"{}\">{}</tr>\n", height, tds));
        }
        html.push_str(&format!(
            "<tr height=\"{}\">{}</tr>\n",
            height,
            "<td></td>".repeat(columns)
        ));
        html.push_str("</table>\n");
        html
    }

    fn grid_table(&self) -> String {
        let rows = self.days[..5].iter().map(Vec::len).max().unwrap_or(0).max(1);

        let mut html = String::from("<table class=\"tableline\">\n");
        html.push_str("<tr><td>节次</td><td>周一</td><td>周二</td><td>周三</td><td>周四</td><td>周五</td></tr>\n");
        for row in 0..rows {
            html.push_str(&format!("<tr><td>第{}行</td>", row + 1));
            for day in &self.days[..5] {
                let content = day.get(row).map(String::as_str).unwrap_or("&nbsp;");
                html.push_str(&format!("<td class=\"course\">{}</td>", content));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
        html
    }

    fn weekend_table(&self) -> String {
        let joined = |idx: usize| self.days[idx].join("<br>");
        format!(
            "<table>\n<tr><td>周六</td><td class=\"weekend\">{}</td></tr>\n<tr><td>周日</td><td class=\"weekend\">{}</td></tr>\n</table>\n",
            joined(5),
            joined(6)
        )
    }
}

/// 一卡通历史流水页（含账号下拉框）
pub fn ecard_account_page(account: &str) -> String {
    format!(
        r#"<html><body><form><select id="account" name="account"><option value="{}">张三</option></select></form></body></html>"#,
        account
    )
}

/// 一页门禁流水；rows 为 (时间, 卡机号)
pub fn ecard_checkin_page(page_total: u32, rows: &[(&str, u32)]) -> String {
    let mut html = String::from("<html><body><table class=\"dangrichaxun\">\n");
    html.push_str("<tr><td>时间</td><td>地点</td><td>卡机号</td></tr>\n");
    for (time, machine) in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>门禁</td><td>{}</td></tr>\n",
            time, machine
        ));
    }
    html.push_str("<tr><td>合计</td><td></td><td></td></tr>\n</table>\n");
    html.push_str(&format!("<span id=\"pagetotal\">{}</span></body></html>\n", page_total));
    html
}
