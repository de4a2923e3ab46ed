//! レコード共通トレイト
//!
//! アラート・通知・データソース・セキュリティイベント・ジョブは
//! すべて同じ一覧操作（検索・絞り込み・ソート・一括操作）で扱う。
//! 種別ごとの違いはこのトレイトの実装に閉じ込める。

use crate::timestamp::Timestamp;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::str::FromStr;

/// 一覧に表示されるレコード
pub trait Record: Clone + Debug + Serialize + DeserializeOwned {
    /// 種別ごとの状態遷移
    type Transition: Copy + Debug + FromStr<Err = String>;

    /// 種別ごとのカテゴリフィルタ
    type Filter: RecordFilter<Self> + Default + Clone + Debug;

    /// 種別名（ログ・表示用）
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// ソート用の日時（未設定のレコードは昇順で先頭）
    fn timestamp(&self) -> Option<Timestamp>;

    /// 部分一致検索の対象フィールド
    fn searchable_text(&self) -> Vec<&str>;

    /// 優先度の順位（持たない種別は0）
    fn priority_rank(&self) -> u8 {
        0
    }

    /// 種類・重大度の順位（持たない種別は0）
    fn type_rank(&self) -> u8 {
        0
    }

    /// 状態遷移を適用し、変化があれば true を返す
    fn apply_transition(&mut self, transition: Self::Transition, ctx: &ActionContext) -> bool;
}

/// カテゴリフィルタ
pub trait RecordFilter<R> {
    /// すべての有効な条件を満たすか
    fn admits(&self, record: &R) -> bool;

    /// いずれかの条件が指定されているか
    fn is_active(&self) -> bool;
}

/// 一括操作
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action<T> {
    /// 状態遷移
    Transition(T),
    /// 一覧から削除（状態に関係なく）
    Delete,
}

impl<T: FromStr<Err = String>> FromStr for Action<T> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("delete") {
            Ok(Action::Delete)
        } else {
            s.parse::<T>().map(Action::Transition)
        }
    }
}

/// 状態遷移の実行者と時刻
#[derive(Debug, Clone, PartialEq)]
pub struct ActionContext {
    pub actor: String,
    pub now: Timestamp,
}

impl ActionContext {
    pub fn new(actor: impl Into<String>, now: Timestamp) -> Self {
        Self { actor: actor.into(), now }
    }

    /// 現在時刻で作成
    pub fn now(actor: impl Into<String>) -> Self {
        Self::new(actor, Timestamp::now())
    }
}

/// 検索語とカテゴリフィルタの組
#[derive(Debug, Clone, Default)]
pub struct Query<F> {
    pub search: String,
    pub filter: F,
}

impl<F> Query<F> {
    pub fn new(search: impl Into<String>, filter: F) -> Self {
        Self { search: search.into(), filter }
    }

    /// 検索語とフィルタの両方を満たすか
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Filter = F>,
        F: RecordFilter<R>,
    {
        search_matches(&record.searchable_text(), &self.search) && self.filter.admits(record)
    }
}

/// 検索語が空、またはいずれかのフィールドに部分一致（大文字小文字を無視）
pub fn search_matches(fields: &[&str], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_empty_term_matches_everything() {
        assert!(search_matches(&["anything"], ""));
        assert!(search_matches(&[], ""));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let fields = ["LED Screen Offline", "Mall Plaza - Main Entrance"];
        assert!(search_matches(&fields, "screen"));
        assert!(search_matches(&fields, "MALL"));
        assert!(!search_matches(&fields, "airport"));
    }

    #[test]
    fn test_search_without_fields_never_matches_term() {
        assert!(!search_matches(&[], "x"));
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Dummy {
        Go,
    }

    impl FromStr for Dummy {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "go" => Ok(Dummy::Go),
                _ => Err(format!("Unknown action: {}", s)),
            }
        }
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("delete".parse::<Action<Dummy>>(), Ok(Action::Delete));
        assert_eq!("DELETE".parse::<Action<Dummy>>(), Ok(Action::Delete));
        assert_eq!("go".parse::<Action<Dummy>>(), Ok(Action::Transition(Dummy::Go)));
        assert!("stop".parse::<Action<Dummy>>().is_err());
    }
}
