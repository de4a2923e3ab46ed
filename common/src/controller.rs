//! レコード一覧コントローラ
//!
//! 1画面につき1つ所有されるレコード集合を保持し、
//! 検索・絞り込み・ソートで派生ビューを作り、選択したレコードに一括操作を適用する。
//!
//! - 絞り込みとソートは元の集合を変更しない（ビューは毎回導出する）
//! - ソートは安定ソート（同順位は格納順を維持）
//! - 存在しないIDへの操作は黙って無視する

use crate::error::{Error, Result};
use crate::record::{Action, ActionContext, Query, Record};
use crate::types::{SelectionPolicy, SortDirection, SortKey, SortSpec};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

/// 一括操作の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    /// 対象として見つかったレコード数
    pub matched: usize,
    /// 状態が変化したレコード数
    pub changed: usize,
    /// 削除されたレコード数
    pub removed: usize,
    /// 見つからなかったID
    pub ignored: Vec<String>,
}

/// レコード一覧の状態
#[derive(Debug, Clone)]
pub struct RecordListController<R: Record> {
    records: Vec<R>,
    query: Query<R::Filter>,
    sort: Option<SortSpec>,
    selection: BTreeSet<String>,
    selection_policy: SelectionPolicy,
}

impl<R: Record> RecordListController<R> {
    /// シードデータから作成（IDの重複はエラー）
    pub fn new(records: Vec<R>) -> Result<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(Error::DuplicateId(record.id().to_string()));
            }
        }

        tracing::debug!(kind = R::KIND, count = records.len(), "controller seeded");

        Ok(Self {
            records,
            query: Query::default(),
            sort: None,
            selection: BTreeSet::new(),
            selection_policy: SelectionPolicy::default(),
        })
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn count_where<F: Fn(&R) -> bool>(&self, pred: F) -> usize {
        self.records.iter().filter(|r| pred(r)).count()
    }

    // =============================================
    // 絞り込み・ソート
    // =============================================

    pub fn query(&self) -> &Query<R::Filter> {
        &self.query
    }

    /// 検索語とカテゴリフィルタをまとめて設定
    pub fn set_filter(&mut self, query: Query<R::Filter>) {
        self.query = query;
        self.on_filter_changed();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
        self.on_filter_changed();
    }

    pub fn set_categories(&mut self, filter: R::Filter) {
        self.query.filter = filter;
        self.on_filter_changed();
    }

    fn on_filter_changed(&mut self) {
        if self.selection_policy == SelectionPolicy::PruneHidden {
            let dropped = self.retain_visible_selection();
            if dropped > 0 {
                tracing::debug!(kind = R::KIND, dropped, "hidden records removed from selection");
            }
        }
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = Some(SortSpec::new(key, direction));
    }

    /// ソートを解除（格納順で表示）
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// 絞り込み・ソート済みのビュー
    pub fn view(&self) -> Vec<&R> {
        let mut visible: Vec<&R> = self.records.iter().filter(|r| self.query.matches(*r)).collect();
        if let Some(spec) = self.sort {
            // sort_by は安定ソート
            visible.sort_by(|a, b| compare(*a, *b, spec));
        }
        visible
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.view().into_iter().map(|r| r.id()).collect()
    }

    fn is_visible(&self, id: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.id() == id && self.query.matches(r))
    }

    // =============================================
    // 選択
    // =============================================

    /// 選択を切り替え、切り替え後に選択されていれば true
    ///
    /// 存在しないIDは無視する。
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.selection.remove(id) {
            false
        } else {
            self.selection.insert(id.to_string());
            true
        }
    }

    pub fn select_all_visible(&mut self) {
        let ids: Vec<String> = self.visible_ids().into_iter().map(str::to_string).collect();
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> Vec<&str> {
        self.selection.iter().map(String::as_str).collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.selection_policy
    }

    /// 現在のビューに表示されていない選択を外し、外した件数を返す
    pub fn retain_visible_selection(&mut self) -> usize {
        let before = self.selection.len();
        let hidden: Vec<String> = self
            .selection
            .iter()
            .filter(|id| !self.is_visible(id))
            .cloned()
            .collect();
        for id in &hidden {
            self.selection.remove(id);
        }
        before - self.selection.len()
    }

    // =============================================
    // 操作
    // =============================================

    /// 指定IDのレコードに操作を適用し、選択をクリアする
    pub fn apply<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        action: Action<R::Transition>,
        ctx: &ActionContext,
    ) -> ActionReport {
        let targets: BTreeSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
        let mut report = ActionReport {
            ignored: targets
                .iter()
                .filter(|id| !self.contains(id))
                .map(|id| id.to_string())
                .collect(),
            ..Default::default()
        };

        match action {
            Action::Delete => {
                let before = self.records.len();
                self.records.retain(|r| !targets.contains(r.id()));
                report.removed = before - self.records.len();
                report.matched = report.removed;
            }
            Action::Transition(transition) => {
                for record in self.records.iter_mut().filter(|r| targets.contains(r.id())) {
                    report.matched += 1;
                    if record.apply_transition(transition, ctx) {
                        report.changed += 1;
                    }
                }
            }
        }

        self.selection.clear();

        tracing::debug!(
            kind = R::KIND,
            ?action,
            matched = report.matched,
            changed = report.changed,
            removed = report.removed,
            ignored = report.ignored.len(),
            "action applied"
        );

        report
    }

    /// 現在の選択に一括操作を適用
    pub fn apply_to_selection(
        &mut self,
        action: Action<R::Transition>,
        ctx: &ActionContext,
    ) -> ActionReport {
        let ids: Vec<String> = self.selection.iter().cloned().collect();
        self.apply(&ids, action, ctx)
    }

    /// ユーザーが作成したレコードを先頭に追加
    pub fn insert_front(&mut self, record: R) -> Result<()> {
        if self.contains(record.id()) {
            return Err(Error::DuplicateId(record.id().to_string()));
        }
        self.records.insert(0, record);
        Ok(())
    }
}

/// ソート指定に従って2件を比較
pub fn compare<R: Record>(a: &R, b: &R, spec: SortSpec) -> Ordering {
    let ordering = match spec.key {
        SortKey::Timestamp => a.timestamp().cmp(&b.timestamp()),
        SortKey::Priority => a.priority_rank().cmp(&b.priority_rank()),
        SortKey::Type => a.type_rank().cmp(&b.type_rank()),
    };
    match spec.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::alert::{
        Alert, AlertCategory, AlertFilter, AlertStatus, AlertTransition, AlertType,
    };
    use crate::types::{Choice, Priority};
    use crate::Timestamp;

    fn alert(id: &str, priority: Priority, status: AlertStatus, ts: &str) -> Alert {
        let mut alert = Alert::new(
            id,
            AlertType::Info,
            AlertCategory::System,
            format!("Alert {}", id),
            priority,
            Timestamp::parse(ts).unwrap(),
        );
        alert.status = status;
        alert
    }

    fn ctx() -> ActionContext {
        ActionContext::new("Current User", Timestamp::parse("2025-01-08 12:00:00").unwrap())
    }

    fn three_alerts() -> RecordListController<Alert> {
        RecordListController::new(vec![
            alert("1", Priority::Low, AlertStatus::Active, "2025-01-08 10:00:00"),
            alert("2", Priority::High, AlertStatus::Active, "2025-01-08 09:00:00"),
            alert("3", Priority::Medium, AlertStatus::Resolved, "2025-01-08 11:00:00"),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let result = RecordListController::new(vec![
            alert("1", Priority::Low, AlertStatus::Active, "2025-01-08 10:00:00"),
            alert("1", Priority::High, AlertStatus::Active, "2025-01-08 09:00:00"),
        ]);
        assert!(matches!(result, Err(Error::DuplicateId(id)) if id == "1"));
    }

    #[test]
    fn test_view_without_sort_keeps_insertion_order() {
        let controller = three_alerts();
        assert_eq!(controller.visible_ids(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sort_priority_descending() {
        let mut controller = three_alerts();
        controller.set_sort(SortKey::Priority, SortDirection::Descending);
        assert_eq!(controller.visible_ids(), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_sort_timestamp_ascending() {
        let mut controller = three_alerts();
        controller.set_sort(SortKey::Timestamp, SortDirection::Ascending);
        assert_eq!(controller.visible_ids(), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_sort_ties_keep_insertion_order_in_both_directions() {
        let mut controller = RecordListController::new(vec![
            alert("a", Priority::High, AlertStatus::Active, "2025-01-08 10:00:00"),
            alert("b", Priority::Low, AlertStatus::Active, "2025-01-08 10:00:00"),
            alert("c", Priority::High, AlertStatus::Active, "2025-01-08 10:00:00"),
        ])
        .unwrap();

        controller.set_sort(SortKey::Priority, SortDirection::Descending);
        assert_eq!(controller.visible_ids(), vec!["a", "c", "b"]);

        controller.set_sort(SortKey::Priority, SortDirection::Ascending);
        assert_eq!(controller.visible_ids(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_does_not_reorder_storage() {
        let mut controller = three_alerts();
        controller.set_sort(SortKey::Priority, SortDirection::Descending);
        let _ = controller.view();
        let stored: Vec<&str> = controller.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(stored, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_toggle_selection_unknown_id_is_ignored() {
        let mut controller = three_alerts();
        assert!(!controller.toggle_selection("99"));
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn test_toggle_selection_twice_deselects() {
        let mut controller = three_alerts();
        assert!(controller.toggle_selection("1"));
        assert!(controller.is_selected("1"));
        assert!(!controller.toggle_selection("1"));
        assert!(!controller.is_selected("1"));
    }

    #[test]
    fn test_prune_hidden_selection_on_filter_change() {
        let mut controller = three_alerts();
        controller.toggle_selection("1");
        controller.toggle_selection("3");

        controller.set_categories(AlertFilter {
            status: Choice::Only(AlertStatus::Active),
            ..Default::default()
        });

        assert_eq!(controller.selection(), vec!["1"]);
    }

    #[test]
    fn test_keep_policy_retains_hidden_selection() {
        let mut controller = three_alerts().with_selection_policy(SelectionPolicy::Keep);
        controller.toggle_selection("3");
        controller.set_search("nothing matches this");
        assert_eq!(controller.selection(), vec!["3"]);

        assert_eq!(controller.retain_visible_selection(), 1);
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn test_apply_reports_ignored_ids_and_clears_selection() {
        let mut controller = three_alerts();
        controller.toggle_selection("1");

        let report = controller.apply(
            &["1", "42"],
            Action::Transition(AlertTransition::Acknowledge),
            &ctx(),
        );

        assert_eq!(report.matched, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(report.ignored, vec!["42".to_string()]);
        assert!(controller.selection().is_empty());
        assert_eq!(controller.get("1").unwrap().status, AlertStatus::Acknowledged);
    }

    #[test]
    fn test_delete_removes_regardless_of_status() {
        let mut controller = three_alerts();
        let report = controller.apply(&["2", "3"], Action::Delete, &ctx());
        assert_eq!(report.removed, 2);
        assert_eq!(controller.len(), 1);
        assert!(controller.contains("1"));
    }

    #[test]
    fn test_delete_with_repeated_ids_removes_once() {
        let mut controller = three_alerts();
        let report = controller.apply(&["2", "2"], Action::Delete, &ctx());
        assert_eq!(report.removed, 1);
        assert_eq!(controller.len(), 2);
    }

    #[test]
    fn test_insert_front() {
        let mut controller = three_alerts();
        controller
            .insert_front(alert("0", Priority::Low, AlertStatus::Active, "2025-01-08 12:00:00"))
            .unwrap();
        assert_eq!(controller.records()[0].id, "0");

        let duplicate = controller.insert_front(alert(
            "2",
            Priority::Low,
            AlertStatus::Active,
            "2025-01-08 12:00:00",
        ));
        assert!(matches!(duplicate, Err(Error::DuplicateId(_))));
        assert_eq!(controller.len(), 4);
    }

    #[test]
    fn test_count_where() {
        let controller = three_alerts();
        assert_eq!(controller.count_where(|a| a.status == AlertStatus::Active), 2);
    }
}
