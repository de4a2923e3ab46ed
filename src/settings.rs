//! 有効/無効設定（ポリシー・通知チャネル・通知ルール）の表示と切り替え

use crate::error::{HapoError, Result};
use crate::render;
use hapo_intel_common::settings::{self, EnabledCount, Setting};
use std::path::Path;

/// 設定一覧を読み込む（省略時は組み込みデータ）
pub fn load_settings<S: Setting>(seed_path: Option<&Path>) -> Result<Vec<S>> {
    match seed_path {
        Some(path) if !path.exists() => Err(HapoError::FileNotFound(path.display().to_string())),
        Some(path) => Ok(settings::load::<S>(path)?),
        None => Ok(settings::builtin::<S>()?),
    }
}

/// 指定IDを順に反転し、見つからなかったIDを返す
pub fn apply_toggles<S: Setting>(items: &mut [S], ids: &[String]) -> Vec<String> {
    ids.iter()
        .filter(|id| settings::toggle(items, id).is_none())
        .cloned()
        .collect()
}

pub fn format_settings<S: Setting>(items: &[S]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            let state = if item.enabled() { "有効" } else { "無効" };
            vec![item.id().to_string(), item.name().to_string(), state.to_string()]
        })
        .collect();
    let count = EnabledCount::of(items);
    format!(
        "{} - 有効 {}/{}件\n{}",
        S::TITLE,
        count.enabled,
        count.total,
        render::format_table(&["ID", "Name", "State"], &rows, &[])
    )
}

pub fn run<S: Setting>(
    seed_path: Option<&Path>,
    toggles: &[String],
    output: Option<&Path>,
) -> Result<()> {
    let mut items = load_settings::<S>(seed_path)?;
    let unknown = apply_toggles(&mut items, toggles);

    print!("{}", format_settings(&items));
    if !unknown.is_empty() {
        println!("\n不明なID: {}", unknown.join(", "));
    }

    if let Some(path) = output {
        settings::save(&items, path)?;
        println!("✔ 保存しました: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapo_intel_common::settings::{NotificationChannel, NotificationRule, SecurityPolicy};
    use tempfile::tempdir;

    #[test]
    fn test_apply_toggles_reports_unknown() {
        let mut rules = settings::builtin::<NotificationRule>().unwrap();
        let unknown = apply_toggles(&mut rules, &["2".to_string(), "42".to_string()]);
        assert_eq!(unknown, vec!["42"]);
        assert!(!rules[1].enabled);
        assert!(rules[0].enabled);
    }

    #[test]
    fn test_format_settings() {
        let channels = settings::builtin::<NotificationChannel>().unwrap();
        let text = format_settings(&channels);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Notification Channels - 有効 3/5件");
        assert!(lines[1].contains("ID"));
        assert!(lines.iter().any(|l| l.contains("slack") && l.ends_with("無効")));
    }

    #[test]
    fn test_run_saves_toggled_settings() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("policies.json");

        run::<SecurityPolicy>(None, &["3".to_string()], Some(&output)).expect("切り替え失敗");

        let saved = load_settings::<SecurityPolicy>(Some(&output)).unwrap();
        assert_eq!(EnabledCount::of(&saved), EnabledCount { enabled: 3, total: 4 });
        assert!(!saved[2].enabled);
    }

    #[test]
    fn test_load_settings_missing_file() {
        let result = load_settings::<SecurityPolicy>(Some(Path::new("/nonexistent/p.json")));
        assert!(matches!(result, Err(HapoError::FileNotFound(_))));
    }
}
