// ==========================================
// 校园服务聚合网关 - 一卡通页面解析器
// ==========================================
// 职责: 从一卡通门禁流水页面中抽取账号、总页数、打卡记录
// 红线: 不做筛选与去重（由讲座引擎负责）
// ==========================================

use crate::domain::lecture::CheckinRecord;
use crate::extractor::error::{ExtractError, ExtractResult};
use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("内置选择器无效")
}

static ACCOUNT_OPTION: LazyLock<Selector> = LazyLock::new(|| selector("#account option"));
static PAGE_TOTAL: LazyLock<Selector> = LazyLock::new(|| selector("#pagetotal"));
static RECORD_ROW: LazyLock<Selector> = LazyLock::new(|| selector(".dangrichaxun tr"));
static TD: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// 一卡通系统使用北京时间
const CAMPUS_UTC_OFFSET_SECS: i32 = 8 * 3600;

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// 门禁流水查询用的账号（#account 下拉框第一项）
pub fn extract_account(html: &str) -> ExtractResult<String> {
    let doc = Html::parse_document(html);
    doc.select(&ACCOUNT_OPTION)
        .next()
        .and_then(|opt| opt.value().attr("value"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExtractError::missing("account"))
}

/// 门禁流水总页数
pub fn extract_page_total(html: &str) -> ExtractResult<u32> {
    let doc = Html::parse_document(html);
    let raw = doc
        .select(&PAGE_TOTAL)
        .next()
        .map(element_text)
        .ok_or_else(|| ExtractError::missing("pagetotal"))?;
    raw.parse::<u32>().map_err(|_| ExtractError::FieldFormat {
        field: "pagetotal",
        value: raw,
    })
}

/// 解析流水时间 "YYYY-MM-DD HH:MM:SS"（北京时间）为 epoch 毫秒
pub fn parse_campus_time(text: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S").ok()?;
    let offset = FixedOffset::east_opt(CAMPUS_UTC_OFFSET_SECS)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp_millis())
}

/// 抽取一页门禁流水
///
/// 表格首行是表头、末行是合计，均丢弃；第 0 列为时间、第 2 列为卡机号。
/// 时间或卡机号无法解析的行跳过。
pub fn extract_checkin_rows(html: &str) -> Vec<CheckinRecord> {
    let doc = Html::parse_document(html);
    let rows: Vec<ElementRef<'_>> = doc.select(&RECORD_ROW).collect();
    if rows.len() <= 2 {
        return Vec::new();
    }

    let mut records = Vec::new();
    for row in &rows[1..rows.len() - 1] {
        let cells: Vec<String> = row.select(&TD).map(element_text).collect();
        let time = cells.first().and_then(|t| parse_campus_time(t));
        let machine_id = cells.get(2).and_then(|m| m.parse::<u32>().ok());
        match (time, machine_id) {
            (Some(time), Some(machine_id)) => records.push(CheckinRecord { time, machine_id }),
            _ => debug!(?cells, "跳过无法解析的流水行"),
        }
    }
    records
}
