//! 種別ごとのコマンド実装（型引数は with_record_kind! で切り替える）

use crate::cli::{FilterArgs, OutputFormat, SortArgs};
use crate::config::Config;
use crate::dashboard::{apply_sort_args, build_query, load_controller, CliRecord};
use crate::error::{HapoError, Result};
use crate::{export, render, session};
use hapo_intel_common::{seed, Action, ActionContext, RecordListController};
use std::path::{Path, PathBuf};

fn prepared<R: CliRecord>(
    seed_path: Option<&Path>,
    filters: &FilterArgs,
    sort: &SortArgs,
    config: &Config,
) -> Result<RecordListController<R>> {
    let mut controller = load_controller::<R>(seed_path, config.selection_policy)?;
    controller.set_filter(build_query::<R>(filters)?);
    apply_sort_args(&mut controller, sort);
    Ok(controller)
}

pub fn list<R: CliRecord>(
    seed_path: Option<&Path>,
    filters: &FilterArgs,
    sort: &SortArgs,
    config: &Config,
) -> Result<()> {
    let controller = prepared::<R>(seed_path, filters, sort, config)?;
    render::print_view(&controller);
    Ok(())
}

pub fn act<R: CliRecord>(
    action: &str,
    ids: &[String],
    seed_path: Option<&Path>,
    filters: &FilterArgs,
    sort: &SortArgs,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let action: Action<R::Transition> = action.parse().map_err(HapoError::InvalidArgument)?;
    let mut controller = prepared::<R>(seed_path, filters, sort, config)?;

    let ctx = ActionContext::now(config.effective_actor());
    let report = controller.apply(ids, action, &ctx);
    tracing::info!(
        kind = R::KIND,
        ?action,
        changed = report.changed,
        removed = report.removed,
        "action applied"
    );

    render::print_view(&controller);
    println!("\n{}", render::format_report(&report));

    if let Some(path) = output {
        seed::save(controller.records(), path)?;
        println!("✔ 保存しました: {}", path.display());
    }
    Ok(())
}

pub fn export_view<R: CliRecord>(
    seed_path: Option<&Path>,
    filters: &FilterArgs,
    sort: &SortArgs,
    format: OutputFormat,
    output: Option<&Path>,
    title: Option<&str>,
    config: &Config,
) -> Result<()> {
    let controller = prepared::<R>(seed_path, filters, sort, config)?;
    let view = controller.view();
    let title = title.unwrap_or(R::TITLE);
    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    let path = export::export_records(&view, format, &output_dir, title)?;
    println!("✔ {}件を出力: {}", view.len(), path.display());
    Ok(())
}

pub fn interactive<R: CliRecord>(
    seed_path: Option<&Path>,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let controller = load_controller::<R>(seed_path, config.selection_policy)?;
    session::run_session(controller, &config.effective_actor(), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapo_intel_common::kinds::alert::AlertStatus;
    use hapo_intel_common::kinds::Alert;
    use tempfile::tempdir;

    #[test]
    fn test_act_writes_updated_collection() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("alerts.json");
        let filters = FilterArgs::default();

        act::<Alert>(
            "acknowledge",
            &["1".to_string(), "3".to_string(), "42".to_string()],
            None,
            &filters,
            &SortArgs::default(),
            Some(&output),
            &Config::default(),
        )
        .expect("操作失敗");

        let saved: Vec<Alert> = seed::load(&output).unwrap();
        assert_eq!(saved.len(), 6);
        let acknowledged: Vec<&str> = saved
            .iter()
            .filter(|a| a.status == AlertStatus::Acknowledged)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(acknowledged, vec!["1", "2", "3", "6"]);
    }

    #[test]
    fn test_act_rejects_unknown_action() {
        let result = act::<Alert>(
            "archive",
            &["1".to_string()],
            None,
            &FilterArgs::default(),
            &SortArgs::default(),
            None,
            &Config::default(),
        );
        assert!(matches!(result, Err(HapoError::InvalidArgument(_))));
    }

    #[test]
    fn test_export_filtered_view_as_csv() {
        let dir = tempdir().unwrap();
        let filters = FilterArgs {
            status: Some("active".into()),
            ..Default::default()
        };

        export_view::<Alert>(
            None,
            &filters,
            &SortArgs::default(),
            OutputFormat::Csv,
            Some(dir.path()),
            Some("active-alerts"),
            &Config::default(),
        )
        .expect("出力失敗");

        let content = std::fs::read_to_string(dir.path().join("active-alerts.csv")).unwrap();
        // 見出し + 未対応3件
        assert_eq!(content.lines().count(), 4);
    }
}
