//! 共通の列挙型とフィルタ・ソート指定
//!
//! - Variant: 閉じた列挙型（文字列表現つき）の共通トレイト
//! - Choice: フィルタ1次元分の「すべて / 特定の値」
//! - SortSpec: ソートキーと方向

use std::fmt;
use std::str::FromStr;

/// 文字列表現を持つ閉じた列挙型
pub trait Variant: Copy + PartialEq + 'static {
    /// 全バリアント（表示順）
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// 大文字小文字と `-`/`_` の違いを無視して変換
    fn parse_variant(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|v| v.as_str() == normalized)
    }
}

/// 有効な値の一覧を含むエラーメッセージ
pub fn unknown_variant_message<T: Variant>(s: &str) -> String {
    let valid: Vec<&str> = T::ALL.iter().map(|v| v.as_str()).collect();
    format!("Unknown value: {}. Use {}", s, valid.join(", "))
}

/// 列挙型の定義と Variant / Display / FromStr / serde を一括で実装する
macro_rules! variant_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $crate::types::Variant for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::types::Variant::as_str(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                <Self as $crate::types::Variant>::parse_variant(s)
                    .ok_or_else(|| $crate::types::unknown_variant_message::<Self>(s))
            }
        }
    };
}

pub(crate) use variant_enum;

variant_enum! {
    /// 優先度
    pub enum Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

impl Priority {
    /// ソート用の順位（high=3, medium=2, low=1）
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

variant_enum! {
    /// 重大度（セキュリティイベント）
    pub enum Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

impl Severity {
    /// ソート用の順位（critical=4 … low=1）
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }
}

variant_enum! {
    /// 既読状態（通知フィルタ用）
    pub enum ReadState {
        Read => "read",
        Unread => "unread",
    }
}

impl ReadState {
    pub fn of(read: bool) -> Self {
        if read { ReadState::Read } else { ReadState::Unread }
    }
}

variant_enum! {
    /// ソートキー
    pub enum SortKey {
        Timestamp => "timestamp",
        Priority => "priority",
        Type => "type",
    }
}

variant_enum! {
    /// ソート方向
    pub enum SortDirection {
        Ascending => "asc",
        Descending => "desc",
    }
}

variant_enum! {
    /// フィルタ変更時に非表示になった選択をどう扱うか
    pub enum SelectionPolicy {
        /// 非表示になっても選択を保持する
        Keep => "keep",
        /// 表示中のレコードだけを選択に残す
        PruneHidden => "prune_hidden",
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::PruneHidden
    }
}

/// ソート指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortKey::Timestamp, SortDirection::Descending)
    }
}

/// フィルタ1次元分の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    /// 絞り込みなし
    All,
    /// 指定値と一致するものだけ
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T: Variant> FromStr for Choice<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Choice::All);
        }
        T::parse_variant(trimmed)
            .map(Choice::Only)
            .ok_or_else(|| unknown_variant_message::<T>(trimmed))
    }
}

impl<T: Variant> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(v) => f.write_str(v.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn test_variant_parse_is_lenient_on_case_and_dash() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("prune-hidden".parse::<SelectionPolicy>(), Ok(SelectionPolicy::PruneHidden));
    }

    #[test]
    fn test_variant_parse_error_lists_values() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err, "Unknown value: urgent. Use high, medium, low");
    }

    #[test]
    fn test_variant_serde_uses_text() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(back, SortDirection::Ascending);
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!("all".parse::<Choice<Priority>>(), Ok(Choice::All));
        assert_eq!("".parse::<Choice<Priority>>(), Ok(Choice::All));
        assert_eq!("low".parse::<Choice<Priority>>(), Ok(Choice::Only(Priority::Low)));
        assert!("lowest".parse::<Choice<Priority>>().is_err());
    }

    #[test]
    fn test_choice_admits() {
        let only_high = Choice::Only(Priority::High);
        assert!(only_high.admits(&Priority::High));
        assert!(!only_high.admits(&Priority::Low));
        assert!(Choice::<Priority>::All.admits(&Priority::Low));
    }

    #[test]
    fn test_choice_display() {
        assert_eq!(Choice::Only(ReadState::Unread).to_string(), "unread");
        assert_eq!(Choice::<ReadState>::All.to_string(), "all");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(SortSpec::default().key, SortKey::Timestamp);
        assert_eq!(SortSpec::default().direction, SortDirection::Descending);
        assert_eq!(SelectionPolicy::default(), SelectionPolicy::PruneHidden);
    }
}
