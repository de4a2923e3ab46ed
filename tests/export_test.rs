//! CSV/JSON/Excel出力の統合テスト
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成

use hapo_intel::cli::{FilterArgs, OutputFormat, SortArgs};
use hapo_intel::dashboard::{apply_sort_args, build_query, load_controller};
use hapo_intel::export::export_records;
use hapo_intel_common::kinds::{Alert, BackupJob, SecurityEvent};
use hapo_intel_common::{SelectionPolicy, SortDirection, SortKey};
use tempfile::tempdir;

#[test]
fn test_csv_export_follows_sorted_view() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller =
        load_controller::<SecurityEvent>(None, SelectionPolicy::PruneHidden).unwrap();
    apply_sort_args(
        &mut controller,
        &SortArgs {
            sort: Some(SortKey::Timestamp),
            order: Some(SortDirection::Ascending),
        },
    );

    let view = controller.view();
    let path = export_records(&view, OutputFormat::Csv, dir.path(), "security").expect("CSV出力失敗");
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), view.len() + 1);
    let first_id = lines[1].split(',').next().unwrap();
    assert_eq!(first_id, view[0].id);
}

#[test]
fn test_json_export_of_filtered_alerts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = load_controller::<Alert>(None, SelectionPolicy::PruneHidden).unwrap();
    let filters = FilterArgs {
        priority: Some("high".into()),
        ..Default::default()
    };
    controller.set_filter(build_query::<Alert>(&filters).unwrap());

    let view = controller.view();
    let output = dir.path().join("out/high.json");
    let path = export_records(&view, OutputFormat::Json, &output, "ignored").expect("JSON出力失敗");
    assert_eq!(path, output);

    let content = std::fs::read_to_string(&path).unwrap();
    let written: Vec<Alert> = serde_json::from_str(&content).unwrap();
    assert_eq!(written.len(), view.len());
    assert!(written.iter().all(|a| a.priority.to_string() == "high"));
}

#[test]
fn test_excel_export_writes_workbook() {
    let dir = tempdir().expect("Failed to create temp dir");
    let controller = load_controller::<BackupJob>(None, SelectionPolicy::PruneHidden).unwrap();
    let view = controller.view();

    let path = export_records(&view, OutputFormat::Xlsx, dir.path(), "Backups").expect("Excel出力失敗");
    assert!(path.ends_with("Backups.xlsx"));

    let bytes = std::fs::read(&path).unwrap();
    // xlsx は ZIP
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_empty_view_exports_header_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut controller = load_controller::<Alert>(None, SelectionPolicy::PruneHidden).unwrap();
    controller.set_search("no such alert anywhere");

    let view = controller.view();
    assert!(view.is_empty());
    let path = export_records(&view, OutputFormat::Csv, dir.path(), "empty").unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 1);
}
