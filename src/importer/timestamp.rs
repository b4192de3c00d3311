// ==========================================
// 历史库 CSV 批量清洗工具 - 时间戳解析与归一化
// ==========================================
// 职责: 文本 → NaiveDateTime（解析失败返回 None）
//       按时间粒度归一化（15 分钟就近取整 / 1 分钟向下截断）
// ==========================================

use crate::domain::{Cell, Interval};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Timelike};

/// 支持的日期时间格式（按常见程度排列）
const DATETIME_FORMATS: &[&str] = &[
    // 美式 12 小时制（历史库导出默认格式）
    "%m/%d/%Y %I:%M:%S%.f %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    // 美式 24 小时制
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    // ISO 8601
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    // 15-Jan-2024 09:00:00
    "%d-%b-%Y %H:%M:%S%.f",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
];

/// 仅日期格式（按零点处理）
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y"];

/// 解析时间戳文本
///
/// # 返回
/// - Some(NaiveDateTime): 解析成功（带时区偏移的取其本地挂钟时间）
/// - None: 无法解析
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// 解析时间戳单元格
///
/// 仅文本单元格可作为时间戳; 数值与空单元格一律视为无效
pub fn parse_timestamp_cell(cell: &Cell) -> Option<NaiveDateTime> {
    cell.as_text().and_then(parse_timestamp)
}

/// 按时间粒度归一化
///
/// # 规则
/// - FifteenMinute: 舍弃分钟余数、秒与亚秒; 舍弃量 ≥ 7.5 分钟时进位 15 分钟
/// - OneMinute: 截断秒与亚秒
pub fn normalize(ts: NaiveDateTime, interval: Interval) -> NaiveDateTime {
    let minute_start = truncate_to_minute(ts);
    match interval {
        Interval::OneMinute => minute_start,
        Interval::FifteenMinute => {
            let discard = Duration::minutes(i64::from(ts.minute() % 15))
                + (ts - minute_start);
            let floored = ts - discard;
            if discard >= Duration::seconds(450) {
                floored + Duration::minutes(15)
            } else {
                floored
            }
        }
    }
}

/// 时间粒度对应的网格步长
pub fn grid_step(interval: Interval) -> Duration {
    match interval {
        Interval::FifteenMinute => Duration::minutes(15),
        Interval::OneMinute => Duration::minutes(1),
    }
}

fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn test_parse_us_12h_format() {
        assert_eq!(parse_timestamp("1/15/2024 9:07:30 AM"), Some(dt(9, 7, 30, 0)));
        assert_eq!(parse_timestamp("01/15/2024 09:07:30.250 PM"), Some(dt(21, 7, 30, 250)));
    }

    #[test]
    fn test_parse_iso_and_date_only() {
        assert_eq!(parse_timestamp("2024-01-15 09:07:30"), Some(dt(9, 7, 30, 0)));
        assert_eq!(parse_timestamp("2024-01-15T09:07"), Some(dt(9, 7, 0, 0)));
        assert_eq!(parse_timestamp("2024-01-15T09:07:30+08:00"), Some(dt(9, 7, 30, 0)));
        assert_eq!(parse_timestamp("15-Jan-2024 09:07:30"), Some(dt(9, 7, 30, 0)));
        assert_eq!(parse_timestamp("2024-01-15"), Some(dt(0, 0, 0, 0)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("Bad Data"), None);
        assert_eq!(parse_timestamp("13/45/2024 10:00"), None);
        assert_eq!(parse_timestamp_cell(&Cell::Number(45000.0)), None);
    }

    #[test]
    fn test_fifteen_minute_rounds_to_nearest() {
        let f = Interval::FifteenMinute;
        assert_eq!(normalize(dt(9, 7, 29, 999), f), dt(9, 0, 0, 0));
        // 恰好 7.5 分钟进位
        assert_eq!(normalize(dt(9, 7, 30, 0), f), dt(9, 15, 0, 0));
        assert_eq!(normalize(dt(9, 52, 31, 0), f), dt(10, 0, 0, 0));
        assert_eq!(normalize(dt(9, 15, 0, 0), f), dt(9, 15, 0, 0));
    }

    #[test]
    fn test_fifteen_minute_rolls_over_day() {
        let late = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(23, 53, 0)
            .unwrap();
        let next = NaiveDate::from_ymd_opt(2024, 1, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(normalize(late, Interval::FifteenMinute), next);
    }

    #[test]
    fn test_one_minute_floors() {
        let o = Interval::OneMinute;
        assert_eq!(normalize(dt(9, 7, 59, 999), o), dt(9, 7, 0, 0));
        assert_eq!(normalize(dt(9, 7, 0, 0), o), dt(9, 7, 0, 0));
    }

    #[test]
    fn test_fifteen_minute_properties_over_a_day() {
        let start = dt(0, 0, 0, 0);
        for step in 0..(24 * 60 * 4) {
            let t = start + Duration::seconds(step * 15 + 7);
            let n = normalize(t, Interval::FifteenMinute);
            assert_eq!(n.minute() % 15, 0);
            assert_eq!(n.second(), 0);
            assert_eq!(n.nanosecond(), 0);
            let distance = (n - t).num_milliseconds().abs();
            assert!(distance <= 450_000, "{} -> {}", t, n);
            if (t - n).num_milliseconds() == 450_000 {
                panic!("7.5 分钟余数必须进位: {}", t);
            }
        }
    }

    #[test]
    fn test_one_minute_properties_over_an_hour() {
        let start = dt(9, 0, 0, 0);
        for step in 0..3600 {
            let t = start + Duration::milliseconds(step * 1_001);
            let n = normalize(t, Interval::OneMinute);
            assert_eq!(n.second(), 0);
            assert_eq!(n.nanosecond(), 0);
            assert_eq!(n.hour(), t.hour());
            assert_eq!(n.minute(), t.minute());
        }
    }
}
