// ==========================================
// 校园服务聚合网关 - 领域类型定义
// ==========================================
// 职责: 单双周、身份类型、学期号
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 单双周 (Flip)
// ==========================================
// 序列化格式: lowercase（与前端约定一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    Odd,  // 单周
    Even, // 双周
    None, // 全周
}

impl Flip {
    /// 将课表单元格中的括号标记转换为标准值
    ///
    /// - `(单)` → Odd
    /// - `(双)` → Even
    /// - 其他（含缺失）→ None
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker.map(str::trim) {
            Some("(单)") => Flip::Odd,
            Some("(双)") => Flip::Even,
            _ => Flip::None,
        }
    }
}

impl fmt::Display for Flip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flip::Odd => write!(f, "odd"),
            Flip::Even => write!(f, "even"),
            Flip::None => write!(f, "none"),
        }
    }
}

// ==========================================
// 身份类型 (Identity Kind)
// ==========================================
// 教师一卡通号为 1 开头的九位数，其余均按学生处理（含八位学号的情况）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityKind {
    Student,
    Staff,
}

impl IdentityKind {
    /// 根据一卡通号判断身份
    pub fn from_identifier(identifier: &str) -> Self {
        let is_staff = identifier.len() == 9
            && identifier.starts_with('1')
            && identifier.chars().all(|c| c.is_ascii_digit());
        if is_staff {
            IdentityKind::Staff
        } else {
            IdentityKind::Student
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, IdentityKind::Student)
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKind::Student => write!(f, "STUDENT"),
            IdentityKind::Staff => write!(f, "STAFF"),
        }
    }
}

/// 研究生一卡通号以 22 开头
pub fn is_graduate(identifier: &str) -> bool {
    identifier.starts_with("22")
}

// ==========================================
// 学期号 (Term Code)
// ==========================================
// 格式: YY-YY-N，例如 17-18-1（短学期）、17-18-2（秋季长学期）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermCode(String);

/// 学期号格式错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("学期号格式错误（应为 YY-YY-N）: {0}")]
pub struct InvalidTermCode(pub String);

impl TermCode {
    /// 解析学期号
    pub fn parse(raw: &str) -> Result<Self, InvalidTermCode> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[2] == b'-'
            && bytes[5] == b'-'
            && [0, 1, 3, 4, 6].iter().all(|&i| bytes[i].is_ascii_digit());
        if well_formed {
            Ok(TermCode(raw.to_string()))
        } else {
            Err(InvalidTermCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为短学期（以 -1 结尾）
    pub fn is_short(&self) -> bool {
        self.0.ends_with("-1")
    }

    /// 是否为秋季长学期（以 -2 结尾）
    pub fn is_long(&self) -> bool {
        self.0.ends_with("-2")
    }

    /// 短学期对应的长学期；非短学期返回 None
    pub fn to_long(&self) -> Option<TermCode> {
        self.0
            .strip_suffix("-1")
            .map(|prefix| TermCode(format!("{}-2", prefix)))
    }
}

impl fmt::Display for TermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TermCode {
    type Err = InvalidTermCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TermCode::parse(s)
    }
}

impl TryFrom<String> for TermCode {
    type Error = InvalidTermCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TermCode::parse(&value)
    }
}

impl From<TermCode> for String {
    fn from(code: TermCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_from_marker() {
        assert_eq!(Flip::from_marker(Some("(单)")), Flip::Odd);
        assert_eq!(Flip::from_marker(Some("(双)")), Flip::Even);
        assert_eq!(Flip::from_marker(None), Flip::None);
        assert_eq!(Flip::from_marker(Some("")), Flip::None);
    }

    #[test]
    fn test_flip_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Flip::Even).unwrap(), "\"even\"");
        assert_eq!(serde_json::to_string(&Flip::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_identity_kind() {
        assert_eq!(IdentityKind::from_identifier("101004321"), IdentityKind::Staff);
        assert_eq!(IdentityKind::from_identifier("213150000"), IdentityKind::Student);
        // 八位学号
        assert_eq!(IdentityKind::from_identifier("10000000"), IdentityKind::Student);
        assert_eq!(IdentityKind::from_identifier("1010043210"), IdentityKind::Student);
        assert!(is_graduate("220161234"));
        assert!(!is_graduate("213150000"));
    }

    #[test]
    fn test_term_code_parse() {
        let code = TermCode::parse("17-18-1").unwrap();
        assert!(code.is_short());
        assert!(!code.is_long());
        assert_eq!(code.to_long().unwrap().as_str(), "17-18-2");

        let long = TermCode::parse(" 17-18-2 ").unwrap();
        assert!(long.is_long());
        assert!(long.to_long().is_none());

        assert!(TermCode::parse("2017-18-1").is_err());
        assert!(TermCode::parse("17-18").is_err());
        assert!(TermCode::parse("ab-cd-1").is_err());
    }

    #[test]
    fn test_term_code_serde() {
        let code: TermCode = serde_json::from_str("\"18-19-3\"").unwrap();
        assert_eq!(code.as_str(), "18-19-3");
        assert!(serde_json::from_str::<TermCode>("\"bad\"").is_err());
    }
}
