//! 日期工具模块
//!
//! 后端返回的交易日期格式并不统一：
//! - ISO 日期：`2025-01-14`、`2025-01-14T08:30:00`
//! - HTTP 日期（Flask jsonify 的默认格式）：`Tue, 14 Jan 2025 00:00:00 GMT`
//!
//! 这里统一解析为 `NaiveDate`，并提供按月分组用的 `MonthKey`。

use chrono::{DateTime, Datelike, Month, NaiveDate, NaiveDateTime};
use std::fmt;

/// 解析交易日期，无法识别时返回 `None`
pub fn parse_transaction_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }

    // 兜底：取前 10 个字符按 ISO 日期再试一次
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// 长日期标签，如 `Tuesday, January 14, 2025`
pub fn long_date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

// =========================================================
// MonthKey - 按月分组的键
// =========================================================

/// 年月键，按时间先后排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// `month` 取值 1..=12，越界返回 `None`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 解析 `2025-01`，也接受任意可识别的完整日期
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some((year, month)) = raw.split_once('-') {
            if let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) {
                return Self::new(year, month);
            }
        }
        parse_transaction_date(raw).map(Self::from_date)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// 显示用标签，如 `January 2025`
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        format!("{} {}", name, self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_backend_date_formats() {
        assert_eq!(parse_transaction_date("2025-01-14"), Some(ymd(2025, 1, 14)));
        assert_eq!(
            parse_transaction_date("2025-01-14T08:30:00"),
            Some(ymd(2025, 1, 14))
        );
        assert_eq!(
            parse_transaction_date("Tue, 14 Jan 2025 00:00:00 GMT"),
            Some(ymd(2025, 1, 14))
        );
        assert_eq!(
            parse_transaction_date("2025-01-14T08:30:00+02:00"),
            Some(ymd(2025, 1, 14))
        );
        assert_eq!(parse_transaction_date("yesterday"), None);
        assert_eq!(parse_transaction_date(""), None);
    }

    #[test]
    fn month_key_labels_and_orders() {
        let jan = MonthKey::parse("2025-01").unwrap();
        let dec = MonthKey::parse("2024-12").unwrap();
        assert_eq!(jan.label(), "January 2025");
        assert_eq!(jan.to_string(), "2025-01");
        assert!(dec < jan);
        assert_eq!(MonthKey::parse("2025-13"), None);
        assert_eq!(
            MonthKey::parse("Tue, 14 Jan 2025 00:00:00 GMT"),
            Some(jan)
        );
    }

    #[test]
    fn long_label_spells_out_the_day() {
        assert_eq!(long_date_label(ymd(2025, 1, 14)), "Tuesday, January 14, 2025");
    }
}
