//! 初期データ（シード）の読み書き
//!
//! シードは camelCase のJSON配列。組み込みシードはダッシュボードの
//! 初期表示と同じ内容。

use crate::error::Result;
use crate::kinds::{
    Alert, BackupJob, DataSource, ExportJob, Notification, SecurityEvent, UserSession,
};
use crate::record::Record;
use std::fs;
use std::path::Path;

/// 組み込みシードを持つ種別
pub trait BuiltinSeed: Record {
    const SEED_JSON: &'static str;
}

impl BuiltinSeed for Alert {
    const SEED_JSON: &'static str = include_str!("../data/alerts.json");
}

impl BuiltinSeed for Notification {
    const SEED_JSON: &'static str = include_str!("../data/notifications.json");
}

impl BuiltinSeed for DataSource {
    const SEED_JSON: &'static str = include_str!("../data/data_sources.json");
}

impl BuiltinSeed for SecurityEvent {
    const SEED_JSON: &'static str = include_str!("../data/security_events.json");
}

impl BuiltinSeed for UserSession {
    const SEED_JSON: &'static str = include_str!("../data/user_sessions.json");
}

impl BuiltinSeed for ExportJob {
    const SEED_JSON: &'static str = include_str!("../data/export_jobs.json");
}

impl BuiltinSeed for BackupJob {
    const SEED_JSON: &'static str = include_str!("../data/backup_jobs.json");
}

/// 組み込みシードを読み込む
pub fn builtin<R: BuiltinSeed>() -> Result<Vec<R>> {
    from_json_str(R::SEED_JSON)
}

pub fn from_json_str<R: Record>(json: &str) -> Result<Vec<R>> {
    Ok(serde_json::from_str(json)?)
}

/// シードファイルを読み込む
pub fn load<R: Record>(path: &Path) -> Result<Vec<R>> {
    let content = fs::read_to_string(path)?;
    let records = from_json_str(&content)?;
    tracing::debug!(kind = R::KIND, path = %path.display(), "シード読み込み");
    Ok(records)
}

/// レコード一覧をシード形式で保存
pub fn save<R: Record>(records: &[R], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(records)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::alert::AlertStatus;
    use crate::kinds::export_job::ExportStatus;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_seeds_parse() {
        assert_eq!(builtin::<Alert>().expect("アラート読み込み失敗").len(), 6);
        assert_eq!(builtin::<Notification>().expect("通知読み込み失敗").len(), 5);
        assert_eq!(builtin::<DataSource>().expect("データソース読み込み失敗").len(), 5);
        assert_eq!(builtin::<SecurityEvent>().expect("セキュリティイベント読み込み失敗").len(), 5);
        assert_eq!(builtin::<ExportJob>().expect("エクスポート読み込み失敗").len(), 4);
        assert_eq!(builtin::<BackupJob>().expect("バックアップ読み込み失敗").len(), 3);
        assert_eq!(builtin::<UserSession>().expect("セッション読み込み失敗").len(), 4);
    }

    #[test]
    fn test_builtin_alert_content() {
        let alerts = builtin::<Alert>().unwrap();
        assert_eq!(alerts[0].title, "LED Screen Offline");
        assert_eq!(alerts.iter().filter(|a| a.status == AlertStatus::Active).count(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("jobs.json");

        let mut jobs = builtin::<ExportJob>().unwrap();
        jobs.truncate(2);
        save(&jobs, &path).expect("保存失敗");

        let loaded: Vec<ExportJob> = load(&path).expect("読み込み失敗");
        assert_eq!(loaded, jobs);
        assert_eq!(loaded[1].status, ExportStatus::Processing);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result: Result<Vec<Alert>> = load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_from_json_rejects_wrong_kind() {
        let result: Result<Vec<Alert>> = from_json_str(include_str!("../data/notifications.json"));
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }
}
