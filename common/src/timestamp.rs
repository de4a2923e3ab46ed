//! タイムスタンプ型
//!
//! ダッシュボードの日時は `YYYY-MM-DD HH:MM:SS` 形式の文字列で保持されている。
//! 比較・ソートのために `NaiveDateTime` に変換して扱う。

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 表示・シリアライズ用フォーマット
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 受け付ける入力フォーマット（先頭から順に試す）
const INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn is_fraction(digits: &str) -> bool {
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// 秒精度の日時
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// 文字列から変換
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_end_matches('Z');
        // ISO形式の小数秒は切り捨てる。末尾の Z 以外のオフセットは受け付けない
        let trimmed = match trimmed.split_once('.') {
            Some((head, fraction)) if is_fraction(fraction) => head,
            Some(_) => return Err(Error::InvalidTimestamp(s.to_string())),
            None => trimmed,
        };

        for format in INPUT_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self(dt));
            }
        }

        // 日付のみは0時として扱う
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| Error::InvalidTimestamp(s.to_string()))
    }

    /// 現在時刻（UTC、秒精度）
    pub fn now() -> Self {
        let now = Utc::now().naive_utc();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// エポックミリ秒
    pub fn timestamp_millis(&self) -> i64 {
        self.0.and_utc().timestamp_millis()
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_format() {
        let ts = Timestamp::parse("2025-01-08 10:45:00").expect("パース失敗");
        assert_eq!(ts.to_string(), "2025-01-08 10:45:00");
    }

    #[test]
    fn test_parse_iso_format() {
        let ts = Timestamp::parse("2025-01-08T10:45:00.123Z").expect("パース失敗");
        assert_eq!(ts.to_string(), "2025-01-08 10:45:00");
    }

    #[test]
    fn test_parse_rejects_utc_offset() {
        for input in [
            "2025-01-08T10:45:00.123+09:00",
            "2025-01-08T10:45:00.5-05:00",
            "2025-01-08T10:45:00+09:00",
            "2025-01-08 10:45:00.",
        ] {
            let err = Timestamp::parse(input).unwrap_err();
            assert!(matches!(err, Error::InvalidTimestamp(_)), "{}", input);
        }
    }

    #[test]
    fn test_parse_drops_fraction() {
        let ts = Timestamp::parse("2025-01-08 10:45:00.999").expect("パース失敗");
        assert_eq!(ts.to_string(), "2025-01-08 10:45:00");
    }

    #[test]
    fn test_parse_date_only() {
        let ts = Timestamp::parse("2024-12-31").expect("パース失敗");
        assert_eq!(ts.to_string(), "2024-12-31 00:00:00");
    }

    #[test]
    fn test_parse_invalid() {
        let err = Timestamp::parse("yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp(_)));
    }

    #[test]
    fn test_ordering_is_chronological() {
        let earlier = Timestamp::parse("2025-01-08 09:15:00").unwrap();
        let later = Timestamp::parse("2025-01-08 10:30:00").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_serde_uses_display_format() {
        let ts = Timestamp::parse("2025-01-08 07:30:00").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-01-08 07:30:00\"");

        let restored: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ts);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let result = serde_json::from_str::<Timestamp>("\"not a date\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_now_has_no_subsecond_part() {
        let now = Timestamp::now();
        assert_eq!(now.as_naive().nanosecond(), 0);
    }
}
