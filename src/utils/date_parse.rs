//! 宽松的日期 / 时间解析
//!
//! 模型被要求用 ISO 8601 回答日期和时间，但实际输出经常是 "March 5, 2024"、
//! "5th March 2024"、"2:30 PM" 之类的自然语言写法，这里依次尝试常见格式。
//! 没有年份的日期使用参考日期的年份；时间只取钟点，忽略时区偏移。

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
    "%A, %d %B %Y",
    "%Y %B %d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M",
    "%H:%M:%S",
    "%H:%M:%S%.f",
    "%I:%M %p",
    "%I:%M%p",
    "%I:%M:%S %p",
    "%H.%M",
];

fn ordinal_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("静态正则"))
}

fn four_digit_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").expect("静态正则"))
}

/// "9AM" / "9 PM"
fn hour_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})\s*([AP])\.?M\.?$").expect("静态正则"))
}

/// 末尾的 "Z" 或 "+02:00" / "-0500"
fn utc_offset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d)\s*(?:Z|[+-]\d{2}:?\d{2})$").expect("静态正则"))
}

/// 统一空白、去掉序数词后缀（"5th" → "5"）
fn normalize(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    ordinal_suffix().replace_all(&collapsed, "$1").into_owned()
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

fn parse_with_formats(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// 解析日期，失败返回 None
///
/// `reference` 只提供缺省的年份（"5 March"、"Mar 5"、"03/05"）。
pub fn parse_date(input: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let text = normalize(input);
    if text.is_empty() {
        return None;
    }
    let parsed = parse_with_formats(&text).or_else(|| parse_datetime(&text).map(|dt| dt.date()));
    if parsed.is_some() {
        return parsed;
    }
    if four_digit_year().is_match(&text) {
        return None;
    }

    let year = reference.year();
    let trimmed = text.trim_end_matches(',');
    parse_with_formats(&format!("{} {}", trimmed, year))
        .or_else(|| parse_with_formats(&format!("{}/{}", trimmed, year)))
}

/// 解析一天中的时间，失败返回 None
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let text = normalize(input).to_uppercase();
    let text = text.strip_prefix('T').unwrap_or(&text);
    let stripped = utc_offset().replace(text, "$1");
    let text = &*stripped;
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = hour_only().captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let hour = hour % 12 + if &caps[2] == "P" { 12 } else { 0 };
        return NaiveTime::from_hms_opt(hour, 0, 0);
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        .or_else(|| parse_datetime(text).map(|dt| dt.time()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse_date(input: &str) -> Option<NaiveDate> {
        super::parse_date(input, ymd(2024, 6, 1))
    }

    #[test]
    fn test_parse_date_iso_and_variants() {
        assert_eq!(parse_date("2024-03-05"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date(" 2024/03/05 "), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("03/05/2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("March 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("5th March 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("Mar 5 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05T09:30:00"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05T09:30:00+02:00"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_date_without_year_uses_reference_year() {
        assert_eq!(parse_date("5 March"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("Mar 5"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("March 5th,"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("12/25"), Some(ymd(2024, 12, 25)));
        assert_eq!(super::parse_date("29 February", ymd(2023, 1, 1)), None);
    }

    #[test]
    fn test_parse_date_failures() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("sometime next week"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_parse_time_variants() {
        let t = parse_time("14:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (14, 30));
        let t = parse_time("2:30 pm").unwrap();
        assert_eq!((t.hour(), t.minute()), (14, 30));
        let t = parse_time("9:05AM").unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 5));
        let t = parse_time("T08:05:00Z").unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 5));
        let t = parse_time("2024-03-05T18:45:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (18, 45));
    }

    #[test]
    fn test_parse_time_hour_only() {
        let t = parse_time("9am").unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 0));
        let t = parse_time("9 PM").unwrap();
        assert_eq!((t.hour(), t.minute()), (21, 0));
        let t = parse_time("12 a.m.").unwrap();
        assert_eq!(t.hour(), 0);
        assert_eq!(parse_time("13pm"), None);
    }

    #[test]
    fn test_parse_time_with_offset_keeps_clock_time() {
        let t = parse_time("14:30:00+02:00").unwrap();
        assert_eq!((t.hour(), t.minute()), (14, 30));
        let t = parse_time("14:30Z").unwrap();
        assert_eq!((t.hour(), t.minute()), (14, 30));
        let t = parse_time("07:15-0500").unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 15));
    }

    #[test]
    fn test_parse_time_failures() {
        assert_eq!(parse_time("N/A"), None);
        assert_eq!(parse_time("25:99"), None);
        assert_eq!(parse_time("   "), None);
    }
}
