// ==========================================
// 校园服务聚合网关 - 上游地址
// ==========================================
// 职责: 拼接教务处课表、一卡通门禁流水的地址与表单
// ==========================================

use crate::domain::types::{IdentityKind, TermCode};

pub const DEFAULT_CURRICULUM_BASE_URL: &str = "http://xk.urp.seu.edu.cn";
pub const DEFAULT_ECARD_BASE_URL: &str = "http://allinonecard.seu.edu.cn";

/// 一次表单请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub url: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    curriculum_base_url: String,
    ecard_base_url: String,
}

impl UpstreamEndpoints {
    pub fn new(curriculum_base_url: &str, ecard_base_url: &str) -> Self {
        Self {
            curriculum_base_url: curriculum_base_url.trim_end_matches('/').to_string(),
            ecard_base_url: ecard_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 课表页面请求
    ///
    /// 学生: stuCurriculum.action {queryStudentId, queryAcademicYear?}
    /// 教师: teacurriculum.action {query_teacherId, query_xnxq?}
    /// 未指定学期时不带学期字段，由教务处决定当前学期
    pub fn curriculum(
        &self,
        kind: IdentityKind,
        identifier: &str,
        term: Option<&TermCode>,
    ) -> FormRequest {
        let (path, id_field, term_field) = match kind {
            IdentityKind::Student => (
                "/jw_service/service/stuCurriculum.action",
                "queryStudentId",
                "queryAcademicYear",
            ),
            IdentityKind::Staff => (
                "/jw_service/service/teacurriculum.action",
                "query_teacherId",
                "query_xnxq",
            ),
        };

        let mut fields = vec![(id_field.to_string(), identifier.to_string())];
        if let Some(term) = term {
            fields.push((term_field.to_string(), term.to_string()));
        }

        FormRequest {
            url: format!("{}{}", self.curriculum_base_url, path),
            fields,
        }
    }

    /// 一卡通门户首页（建立一卡通系统会话）
    pub fn ecard_home(&self) -> String {
        format!("{}/ecard/dongnanportalHome.action", self.ecard_base_url)
    }

    /// 历史流水页（含账号下拉框）
    pub fn ecard_account_page(&self) -> String {
        format!("{}/accounthisTrjn.action", self.ecard_base_url)
    }

    /// 门禁流水查询；page 为 None 时查询第一页并取总页数
    pub fn ecard_checkins(&self, account: &str, page: Option<u32>) -> FormRequest {
        let mut fields = vec![
            ("account".to_string(), account.to_string()),
            ("startDate".to_string(), String::new()),
            ("endDate".to_string(), String::new()),
        ];
        if let Some(page) = page {
            fields.push(("pageno".to_string(), page.to_string()));
        }
        FormRequest {
            url: format!("{}/mjkqBrows.action", self.ecard_base_url),
            fields,
        }
    }
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_CURRICULUM_BASE_URL, DEFAULT_ECARD_BASE_URL)
    }
}
