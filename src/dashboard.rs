//! 種別ごとの一覧設定とコントローラの構築
//!
//! ## 変更履歴
//! - 2026-10-18: 初期作成

use crate::cli::{FilterArgs, Kind, SettingsSet, SortArgs};
use crate::error::{HapoError, Result};
use hapo_intel_common::kinds::alert::AlertSummary;
use hapo_intel_common::kinds::{
    Alert, BackupJob, BackupSummary, DataSource, DataSourceSummary, ExportJob, ExportSummary,
    Notification, NotificationSummary, SecurityEvent, SecuritySummary, SessionSummary, UserSession,
};
use hapo_intel_common::seed::{self, BuiltinSeed};
use hapo_intel_common::settings::{
    self, DataPolicy, EnabledCount, NotificationChannel, NotificationRule, SecurityPolicy, Setting,
    SettingsSummary,
};
use hapo_intel_common::{
    Choice, Query, Record, RecordListController, SelectionPolicy, SortDirection, SortKey, SortSpec,
    Tabular, Variant,
};
use serde::Serialize;
use std::path::Path;

type FilterResult = std::result::Result<(), String>;

/// CLIから扱える種別
pub trait CliRecord: Record + Tabular + BuiltinSeed {
    /// 見出し・既定の出力ファイル名
    const TITLE: &'static str;

    /// 使用できるフィルタキー
    const FILTER_KEYS: &'static [&'static str];

    /// 初期表示のソート
    fn default_sort() -> Option<SortSpec> {
        None
    }

    /// フィルタ1次元分を設定（値が不正ならエラーメッセージ）
    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult;
}

fn choice<T: Variant>(value: &str) -> std::result::Result<Choice<T>, String> {
    value.parse()
}

impl CliRecord for Alert {
    const TITLE: &'static str = "Alerts";
    const FILTER_KEYS: &'static [&'static str] = &["type", "status", "category", "priority"];

    fn default_sort() -> Option<SortSpec> {
        Some(SortSpec::new(SortKey::Timestamp, SortDirection::Descending))
    }

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "type" => filter.alert_type = choice(value)?,
            "status" => filter.status = choice(value)?,
            "category" => filter.category = choice(value)?,
            "priority" => filter.priority = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

impl CliRecord for Notification {
    const TITLE: &'static str = "Notifications";
    const FILTER_KEYS: &'static [&'static str] = &["type", "read", "priority"];

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "type" => filter.notification_type = choice(value)?,
            "read" => filter.read = choice(value)?,
            "priority" => filter.priority = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

impl CliRecord for DataSource {
    const TITLE: &'static str = "Data Sources";
    const FILTER_KEYS: &'static [&'static str] = &["type", "status"];

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "type" => filter.source_type = choice(value)?,
            "status" => filter.status = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

impl CliRecord for SecurityEvent {
    const TITLE: &'static str = "Security Events";
    const FILTER_KEYS: &'static [&'static str] = &["severity", "type", "status"];

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "severity" => filter.severity = choice(value)?,
            "type" => filter.event_type = choice(value)?,
            "status" => filter.status = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

impl CliRecord for ExportJob {
    const TITLE: &'static str = "Export Jobs";
    const FILTER_KEYS: &'static [&'static str] = &["type", "status"];

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "type" => filter.category = choice(value)?,
            "status" => filter.status = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

impl CliRecord for BackupJob {
    const TITLE: &'static str = "Backup Jobs";
    const FILTER_KEYS: &'static [&'static str] = &["type", "status"];

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "type" => filter.backup_type = choice(value)?,
            "status" => filter.status = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

impl CliRecord for UserSession {
    const TITLE: &'static str = "User Sessions";
    const FILTER_KEYS: &'static [&'static str] = &["status"];

    fn default_sort() -> Option<SortSpec> {
        Some(SortSpec::new(SortKey::Timestamp, SortDirection::Descending))
    }

    fn set_filter_value(filter: &mut Self::Filter, key: &str, value: &str) -> FilterResult {
        match key {
            "status" => filter.status = choice(value)?,
            _ => return Err(unsupported_key::<Self>(key)),
        }
        Ok(())
    }
}

fn unsupported_key<R: CliRecord>(key: &str) -> String {
    format!(
        "{} は {} で絞り込めません（使用可能: {}）",
        R::TITLE,
        key,
        R::FILTER_KEYS.join(", ")
    )
}

/// (キー, 値) の組をフィルタに反映
pub fn apply_filter_pairs<R: CliRecord, K: AsRef<str>, V: AsRef<str>>(
    filter: &mut R::Filter,
    pairs: &[(K, V)],
) -> Result<()> {
    for (key, value) in pairs {
        let key = key.as_ref();
        R::set_filter_value(filter, key, value.as_ref())
            .map_err(|e| HapoError::InvalidArgument(format!("{}: {}", key, e)))?;
    }
    Ok(())
}

/// コマンドラインのフィルタ指定から検索条件を作成
pub fn build_query<R: CliRecord>(args: &FilterArgs) -> Result<Query<R::Filter>> {
    let mut filter = R::Filter::default();
    apply_filter_pairs::<R, _, _>(&mut filter, &args.pairs())?;
    Ok(Query::new(args.search.clone().unwrap_or_default(), filter))
}

/// `key=value` 形式の指定を分解
pub fn parse_pairs<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<(String, String)>> {
    tokens
        .iter()
        .map(|token| {
            let token = token.as_ref();
            match token.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    Ok((key.trim().to_lowercase(), value.trim().to_string()))
                }
                _ => Err(HapoError::InvalidArgument(format!(
                    "key=value 形式で指定してください: {}",
                    token
                ))),
            }
        })
        .collect()
}

/// ソート指定を反映（キーのみ指定時は降順、方向のみ指定時は現在のキー）
pub fn apply_sort_args<R: Record>(controller: &mut RecordListController<R>, args: &SortArgs) {
    let current = controller.sort();
    match (args.sort, args.order) {
        (None, None) => {}
        (key, direction) => {
            let key = key.or(current.map(|s| s.key)).unwrap_or(SortKey::Timestamp);
            let direction = direction
                .or(current.map(|s| s.direction))
                .unwrap_or(SortDirection::Descending);
            controller.set_sort(key, direction);
        }
    }
}

/// シードを読み込んでコントローラを作成
pub fn load_controller<R: CliRecord>(
    seed_path: Option<&Path>,
    policy: SelectionPolicy,
) -> Result<RecordListController<R>> {
    let records = match seed_path {
        Some(path) => {
            if !path.exists() {
                return Err(HapoError::FileNotFound(path.display().to_string()));
            }
            seed::load::<R>(path)?
        }
        None => seed::builtin::<R>()?,
    };

    Ok(RecordListController::new(records)?
        .with_sort(R::default_sort())
        .with_selection_policy(policy))
}

fn load_from_dir<R: CliRecord>(seed_dir: Option<&Path>, kind: Kind) -> Result<Vec<R>> {
    if let Some(dir) = seed_dir {
        let path = dir.join(kind.seed_file_name());
        if path.exists() {
            return Ok(seed::load::<R>(&path)?);
        }
    }
    Ok(seed::builtin::<R>()?)
}

fn load_settings_from_dir<S: Setting>(seed_dir: Option<&Path>, set: SettingsSet) -> Result<Vec<S>> {
    if let Some(dir) = seed_dir {
        let path = dir.join(set.seed_file_name());
        if path.exists() {
            return Ok(settings::load::<S>(&path)?);
        }
    }
    Ok(settings::builtin::<S>()?)
}

/// ダッシュボード全体の件数
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub alerts: AlertSummary,
    pub notifications: NotificationSummary,
    pub data_sources: DataSourceSummary,
    pub security: SecuritySummary,
    pub sessions: SessionSummary,
    pub exports: ExportSummary,
    pub backups: BackupSummary,
    pub settings: SettingsSummary,
}

impl DashboardSummary {
    pub fn load(seed_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = seed_dir {
            if !dir.is_dir() {
                return Err(HapoError::FileNotFound(dir.display().to_string()));
            }
        }

        let alerts = load_from_dir::<Alert>(seed_dir, Kind::Alerts)?;
        let notifications = load_from_dir::<Notification>(seed_dir, Kind::Notifications)?;
        let data_sources = load_from_dir::<DataSource>(seed_dir, Kind::DataSources)?;
        let security = load_from_dir::<SecurityEvent>(seed_dir, Kind::Security)?;
        let sessions = load_from_dir::<UserSession>(seed_dir, Kind::Sessions)?;
        let exports = load_from_dir::<ExportJob>(seed_dir, Kind::Exports)?;
        let backups = load_from_dir::<BackupJob>(seed_dir, Kind::Backups)?;

        let security_policies: Vec<SecurityPolicy> =
            load_settings_from_dir(seed_dir, SettingsSet::SecurityPolicies)?;
        let data_policies: Vec<DataPolicy> =
            load_settings_from_dir(seed_dir, SettingsSet::DataPolicies)?;
        let channels: Vec<NotificationChannel> =
            load_settings_from_dir(seed_dir, SettingsSet::Channels)?;
        let rules: Vec<NotificationRule> = load_settings_from_dir(seed_dir, SettingsSet::Rules)?;

        Ok(Self {
            alerts: AlertSummary::from_records(&alerts),
            notifications: NotificationSummary::from_records(&notifications),
            data_sources: DataSourceSummary::from_records(&data_sources),
            security: SecuritySummary::from_records(&security),
            sessions: SessionSummary::from_records(&sessions),
            exports: ExportSummary::from_records(&exports),
            backups: BackupSummary::from_records(&backups),
            settings: SettingsSummary {
                security_policies: EnabledCount::of(&security_policies),
                data_policies: EnabledCount::of(&data_policies),
                channels: EnabledCount::of(&channels),
                rules: EnabledCount::of(&rules),
            },
        })
    }
}

/// 種別に応じて型引数を切り替えて呼び出す
#[macro_export]
macro_rules! with_record_kind {
    ($kind:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            $crate::cli::Kind::Alerts => $func::<hapo_intel_common::kinds::Alert>($($arg),*),
            $crate::cli::Kind::Notifications => $func::<hapo_intel_common::kinds::Notification>($($arg),*),
            $crate::cli::Kind::DataSources => $func::<hapo_intel_common::kinds::DataSource>($($arg),*),
            $crate::cli::Kind::Security => $func::<hapo_intel_common::kinds::SecurityEvent>($($arg),*),
            $crate::cli::Kind::Sessions => $func::<hapo_intel_common::kinds::UserSession>($($arg),*),
            $crate::cli::Kind::Exports => $func::<hapo_intel_common::kinds::ExportJob>($($arg),*),
            $crate::cli::Kind::Backups => $func::<hapo_intel_common::kinds::BackupJob>($($arg),*),
        }
    };
}
