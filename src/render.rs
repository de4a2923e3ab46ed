//! 端末への一覧表示

use crate::dashboard::{CliRecord, DashboardSummary};
use hapo_intel_common::settings::EnabledCount;
use hapo_intel_common::{ActionReport, RecordFilter, RecordListController};

/// 1セルの最大表示幅
const MAX_CELL_WIDTH: usize = 36;

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        cell.to_string()
    } else {
        let head: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", head)
    }
}

/// 表を文字列に整形（先頭列は選択マーク）
pub fn format_table(columns: &[&str], rows: &[Vec<String>], selected: &[bool]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|c| truncate(c)).collect())
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(text.chars().count());
        format!("{}{}", text, " ".repeat(fill))
    };

    let mut out = String::new();
    let header: Vec<String> = columns.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
    out.push_str(&format!("   {}\n", header.join("  ").trim_end()));

    for (i, row) in cells.iter().enumerate() {
        let mark = if selected.get(i).copied().unwrap_or(false) { "*" } else { " " };
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        out.push_str(&format!(" {} {}\n", mark, line.join("  ").trim_end()));
    }
    out
}

/// ビュー見出し（件数・選択・ソート・絞り込みの有無）
pub fn view_header<R: CliRecord>(controller: &RecordListController<R>) -> String {
    let sort = controller
        .sort()
        .map(|s| format!("{} {}", s.key, s.direction))
        .unwrap_or_else(|| "なし".to_string());
    let query = controller.query();
    let filtered = !query.search.is_empty() || query.filter.is_active();

    let mut header = format!(
        "{} - 表示 {}/{}件  選択 {}件  ソート: {}",
        R::TITLE,
        controller.view().len(),
        controller.len(),
        controller.selection().len(),
        sort
    );
    if filtered {
        header.push_str("  [絞り込み中]");
    }
    header
}

/// 現在のビューを表示
pub fn print_view<R: CliRecord>(controller: &RecordListController<R>) {
    let view = controller.view();
    let rows: Vec<Vec<String>> = view.iter().map(|r| r.row()).collect();
    let selected: Vec<bool> = view.iter().map(|r| controller.is_selected(r.id())).collect();

    println!("{}", view_header(controller));
    if view.is_empty() {
        println!("  (該当するレコードがありません)");
    } else {
        print!("{}", format_table(R::columns(), &rows, &selected));
    }
}

pub fn format_report(report: &ActionReport) -> String {
    let mut line = format!(
        "対象 {}件 / 変更 {}件 / 削除 {}件",
        report.matched, report.changed, report.removed
    );
    if !report.ignored.is_empty() {
        line.push_str(&format!(" / 不明なID: {}", report.ignored.join(", ")));
    }
    line
}

fn enabled_line(label: &str, count: EnabledCount) -> String {
    format!("  {}: {}/{} 有効", label, count.enabled, count.total)
}

pub fn print_summary(summary: &DashboardSummary) {
    let alerts = &summary.alerts;
    println!("アラート:");
    println!(
        "  合計: {}  未対応: {}  重大(未対応): {}",
        alerts.total, alerts.active, alerts.critical_active
    );

    let notifications = &summary.notifications;
    println!("通知:");
    println!(
        "  合計: {}  未読: {}  スター: {}",
        notifications.total, notifications.unread, notifications.starred
    );

    let sources = &summary.data_sources;
    println!("データソース:");
    println!(
        "  合計: {}  稼働中: {}  容量: {:.1} GB  レコード: {}",
        sources.total,
        sources.active,
        sources.total_size_mb / 1024.0,
        sources.total_records
    );
    for breakdown in sources.by_type.iter().filter(|b| b.count > 0) {
        println!(
            "    {:<10} {}件  {:.1} MB",
            breakdown.source_type, breakdown.count, breakdown.size_mb
        );
    }

    let security = &summary.security;
    println!("セキュリティ:");
    println!(
        "  合計: {}  重大(未対応): {}  高(未対応): {}",
        security.total, security.critical_active, security.high_active
    );

    let sessions = &summary.sessions;
    println!("セッション:");
    println!(
        "  合計: {}  アクティブ: {}  アイドル: {}",
        sessions.total, sessions.active, sessions.idle
    );

    let exports = &summary.exports;
    println!("エクスポート:");
    println!(
        "  合計: {}  完了: {}  処理中: {}  失敗: {}",
        exports.total, exports.completed, exports.processing, exports.failed
    );

    let backups = &summary.backups;
    println!("バックアップ:");
    println!(
        "  合計: {}  実行中: {}  失敗: {}",
        backups.total, backups.running, backups.failed
    );

    let settings = &summary.settings;
    println!("設定:");
    println!("{}", enabled_line("セキュリティポリシー", settings.security_policies));
    println!("{}", enabled_line("データポリシー", settings.data_policies));
    println!("{}", enabled_line("通知チャネル", settings.channels));
    println!("{}", enabled_line("通知ルール", settings.rules));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::load_controller;
    use hapo_intel_common::kinds::alert::AlertStatus;
    use hapo_intel_common::kinds::{Alert, AlertFilter};
    use hapo_intel_common::{Choice, SelectionPolicy};

    #[test]
    fn test_truncate_long_cell() {
        let long = "x".repeat(50);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_format_table_aligns_and_marks() {
        let rows = vec![
            vec!["1".to_string(), "LED Screen Offline".to_string()],
            vec!["22".to_string(), "Fan".to_string()],
        ];
        let table = format_table(&["ID", "Title"], &rows, &[false, true]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "   ID  Title");
        assert_eq!(lines[1], "   1   LED Screen Offline");
        assert_eq!(lines[2], " * 22  Fan");
    }

    #[test]
    fn test_view_header_marks_filtered_view() {
        let mut controller = load_controller::<Alert>(None, SelectionPolicy::PruneHidden).unwrap();
        let header = view_header(&controller);
        assert!(header.starts_with("Alerts - 表示 6/6件  選択 0件"));
        assert!(!header.contains("絞り込み中"));

        controller.set_categories(AlertFilter {
            status: Choice::Only(AlertStatus::Active),
            ..Default::default()
        });
        assert!(view_header(&controller).contains("表示 3/6件"));
        assert!(view_header(&controller).ends_with("[絞り込み中]"));

        controller.set_categories(AlertFilter::default());
        controller.set_search("mall");
        assert!(view_header(&controller).ends_with("[絞り込み中]"));
    }

    #[test]
    fn test_enabled_line() {
        let count = EnabledCount { enabled: 3, total: 5 };
        assert_eq!(enabled_line("通知チャネル", count), "  通知チャネル: 3/5 有効");
    }

    #[test]
    fn test_format_report_lists_ignored() {
        let report = ActionReport {
            matched: 2,
            changed: 1,
            removed: 0,
            ignored: vec!["99".into()],
        };
        assert_eq!(format_report(&report), "対象 2件 / 変更 1件 / 削除 0件 / 不明なID: 99");
    }
}
