// ==========================================
// 校园服务聚合网关 - HTML 文本工具
// ==========================================

use scraper::Html;

/// 取 HTML 片段的纯文本（去标签、解码实体、首尾去空白）
pub fn fragment_text(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    let text: String = doc.root_element().text().collect();
    text.trim().to_string()
}

/// 从文本中依次取出所有非负整数
pub fn numbers_in(text: &str) -> Vec<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// 学分等数值：缺失或非数字时为 0
pub fn parse_credit(text: &str) -> f64 {
    let trimmed = text.trim();
    // 兼容 "3.0学分" 这类带单位的写法：取最长的数字前缀
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}
