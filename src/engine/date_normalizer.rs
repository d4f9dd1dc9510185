// ==========================================
// DTC 日历转换系统 - 日期标准化
// ==========================================
// 职责: 多格式日期文本 → 规范日期 (MM/DD/YYYY)
// 策略: 解析失败静默返回 None（"TBD" 等自由文本属正常情况）
// ==========================================

use crate::domain::CANONICAL_DATE_FORMAT;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

/// 带时间的格式（按顺序尝试）
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M", "%m/%d/%Y %I:%M %p"];

/// 纯日期格式（按顺序尝试）
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y"];

/// 截止日期相对发送日期的提前天数
pub const DUE_DATE_LEAD_DAYS: i64 = 14;

// 标题中的 M/D 或 M/D/YY(YY)
static HEADER_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?").expect("合法的正则"));

/// 解析日期文本
///
/// # 支持格式
/// - YYYY-MM-DD HH:MM:SS
/// - MM/DD/YYYY
/// - MM/DD/YYYY HH:MM
/// - MM/DD/YYYY HH:MM AM/PM
/// - YYYY-MM-DD
/// - MM-DD-YYYY
///
/// # 返回
/// - None: 所有格式均不匹配
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })?;

    // %Y 接受 1-3 位年份,这里只认四位年
    if parsed.year() < 1000 {
        return None;
    }
    Some(parsed)
}

/// 格式化为规范文本
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// 解析并输出规范文本
pub fn normalize_date(text: &str) -> Option<String> {
    parse_date(text).map(format_date)
}

/// 发送日期前 14 天
///
/// # 示例
/// - "02/17/2024" → 02/03/2024
pub fn due_date_two_weeks_before(date_text: &str) -> Option<NaiveDate> {
    parse_date(date_text).and_then(due_date_two_weeks_before_date)
}

/// 同上,入参为已解析日期
pub fn due_date_two_weeks_before_date(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(DUE_DATE_LEAD_DAYS))
}

/// 从标题文本提取截止日期（年份缺省为当前年）
///
/// # 示例
/// - "DUE 2/3 10 AM CT" → 当年 02/03
/// - "DUE 2/3/24 10 AM CT" → 02/03/2024
pub fn parse_due_date_from_header(text: &str) -> Option<NaiveDate> {
    parse_due_date_from_header_in_year(text, Local::now().year())
}

/// 同上,年份缺省值由调用方指定
pub fn parse_due_date_from_header_in_year(text: &str, default_year: i32) -> Option<NaiveDate> {
    let caps = HEADER_DATE_RE.captures(text)?;

    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year: i32 = match caps.get(3).map(|m| m.as_str()) {
        None => default_year,
        Some(y) if y.len() == 2 => format!("20{}", y).parse().ok()?,
        Some(y) => y.parse().ok()?,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// 星期名（英文全称）
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// 文本是否为星期名（Mon / Monday 等）
pub fn is_weekday_name(text: &str) -> bool {
    text.trim().parse::<Weekday>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_every_supported_format() {
        let expected = ymd(2025, 2, 20);
        let samples = [
            "2025-02-20 00:00:00",
            "02/20/2025",
            "2/20/2025",
            "02/20/2025 14:30",
            "02/20/2025 10:00 AM",
            "2025-02-20",
            "02-20-2025",
        ];
        for sample in samples {
            assert_eq!(parse_date(sample), Some(expected), "格式: {}", sample);
        }
    }

    #[test]
    fn test_round_trip_through_each_format() {
        let date = ymd(2024, 11, 5);
        let rendered: Vec<String> = DATE_FORMATS
            .iter()
            .map(|f| date.format(f).to_string())
            .chain(
                DATETIME_FORMATS
                    .iter()
                    .map(|f| date.and_hms_opt(9, 15, 0).unwrap().format(f).to_string()),
            )
            .collect();

        for text in rendered {
            assert_eq!(normalize_date(&text), Some("11/05/2024".to_string()), "{}", text);
        }
    }

    #[test]
    fn test_parse_rejects_free_text() {
        assert_eq!(parse_date("TBD"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("13/45/2025"), None);
        assert_eq!(parse_date("2/3/25"), None);
    }

    #[test]
    fn test_due_date_two_weeks_before() {
        assert_eq!(due_date_two_weeks_before("02/17/2024"), Some(ymd(2024, 2, 3)));
        assert_eq!(due_date_two_weeks_before("03/10/2024"), Some(ymd(2024, 2, 25)));
        assert_eq!(due_date_two_weeks_before("not a date"), None);
    }

    #[test]
    fn test_header_due_date() {
        assert_eq!(
            parse_due_date_from_header_in_year("DUE 2/3 10 AM CT", 2025),
            Some(ymd(2025, 2, 3))
        );
        assert_eq!(
            parse_due_date_from_header_in_year("DUE 2/3/24 10 AM CT", 2025),
            Some(ymd(2024, 2, 3))
        );
        assert_eq!(
            parse_due_date_from_header_in_year("due 12/31/2026", 2025),
            Some(ymd(2026, 12, 31))
        );
    }

    #[test]
    fn test_header_due_date_invalid() {
        assert_eq!(parse_due_date_from_header_in_year("DUE 2/32", 2025), None);
        assert_eq!(parse_due_date_from_header_in_year("DUE 13/1", 2025), None);
        assert_eq!(parse_due_date_from_header_in_year("DUE next week", 2025), None);
    }

    #[test]
    fn test_header_due_date_defaults_to_current_year() {
        let date = parse_due_date_from_header("DUE 1/15").unwrap();
        assert_eq!(date.year(), Local::now().year());
    }

    #[test]
    fn test_weekday_helpers() {
        assert_eq!(weekday_name(ymd(2025, 2, 20)), "Thursday");
        assert!(is_weekday_name("Thursday"));
        assert!(is_weekday_name("thu"));
        assert!(!is_weekday_name("10 AM"));
    }
}
