use clap::{Args, Parser, Subcommand};
use hapo_intel_common::{SelectionPolicy, SortDirection, SortKey};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hapo-intel")]
#[command(about = "Hapo Intel ダッシュボードの一覧操作ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 絞り込み・ソート済みの一覧を表示
    List {
        /// 種別 (alerts/notifications/data-sources/security/sessions/exports/backups)
        #[arg(required = true)]
        kind: Kind,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// シードJSONファイル（省略時は組み込みデータ）
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// 指定IDに操作を適用
    Act {
        #[arg(required = true)]
        kind: Kind,

        /// 操作名 (acknowledge/resolve/read/star/sync/start/delete など)
        #[arg(required = true)]
        action: String,

        /// 対象ID
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        #[arg(long)]
        seed: Option<PathBuf>,

        /// 操作後の一覧を保存するJSONファイル
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 全種別の件数を表示
    Summary {
        /// シードJSONのディレクトリ（alerts.json など。無いものは組み込みデータ）
        #[arg(long)]
        seed_dir: Option<PathBuf>,
    },

    /// 表示中の一覧をファイルに出力
    Export {
        #[arg(required = true)]
        kind: Kind,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        #[arg(long)]
        seed: Option<PathBuf>,

        /// 出力形式 (xlsx/csv/json)
        #[arg(short, long, default_value = "xlsx")]
        format: OutputFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル（省略時は種別名）
        #[arg(short, long)]
        title: Option<String>,
    },

    /// 対話的に一覧を操作
    Session {
        #[arg(required = true)]
        kind: Kind,

        #[arg(long)]
        seed: Option<PathBuf>,

        /// 終了時に一覧を保存するJSONファイル
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// ライブ指標を表示
    Live {
        /// 表示する更新回数
        #[arg(short = 'n', long, default_value = "5")]
        ticks: usize,

        /// 更新間隔ミリ秒（省略時は設定値）
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// テンプレートからエクスポートジョブを作成して進捗を表示
    Job {
        /// テンプレートID (people-analytics/vehicle-analytics/...)
        #[arg(long, required = true)]
        template: String,

        #[arg(long, required = true)]
        name: String,

        /// 開始日 (YYYY-MM-DD)
        #[arg(long, required = true)]
        start: String,

        /// 終了日 (YYYY-MM-DD)
        #[arg(long, required = true)]
        end: String,

        /// 出力形式（省略時はテンプレートの形式）
        #[arg(short, long)]
        format: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,

        /// 対象ロケーション（複数指定可）
        #[arg(long = "location")]
        locations: Vec<String>,
    },

    /// ポリシー・通知チャネル・通知ルールの有効/無効を表示・切り替え
    Settings {
        /// 対象 (security-policies/data-policies/channels/rules)
        #[arg(required = true)]
        set: SettingsSet,

        /// 有効/無効を反転するID（複数指定可）
        #[arg(long = "toggle")]
        toggle: Vec<String>,

        #[arg(long)]
        seed: Option<PathBuf>,

        /// 切り替え後の一覧を保存するJSONファイル
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 実行者名を設定
        #[arg(long)]
        set_actor: Option<String>,

        /// 非表示になった選択の扱い (keep/prune_hidden)
        #[arg(long)]
        set_selection_policy: Option<SelectionPolicy>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// カテゴリフィルタ指定（値は種別ごとに検証する）
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// 検索語（部分一致）
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long = "type")]
    pub kind_type: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub severity: Option<String>,

    /// 既読状態 (read/unread)
    #[arg(long)]
    pub read: Option<String>,
}

impl FilterArgs {
    /// 指定されたフィルタを (キー, 値) の組で返す
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("type", &self.kind_type),
            ("status", &self.status),
            ("category", &self.category),
            ("priority", &self.priority),
            ("severity", &self.severity),
            ("read", &self.read),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct SortArgs {
    /// ソートキー (timestamp/priority/type)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// ソート方向 (asc/desc)
    #[arg(long)]
    pub order: Option<SortDirection>,
}

/// 一覧の種別
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Alerts,
    Notifications,
    DataSources,
    Security,
    Sessions,
    Exports,
    Backups,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Alerts,
        Kind::Notifications,
        Kind::DataSources,
        Kind::Security,
        Kind::Sessions,
        Kind::Exports,
        Kind::Backups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Alerts => "alerts",
            Kind::Notifications => "notifications",
            Kind::DataSources => "data-sources",
            Kind::Security => "security",
            Kind::Sessions => "sessions",
            Kind::Exports => "exports",
            Kind::Backups => "backups",
        }
    }

    /// seed-dir 内のファイル名
    pub fn seed_file_name(&self) -> &'static str {
        match self {
            Kind::Alerts => "alerts.json",
            Kind::Notifications => "notifications.json",
            Kind::DataSources => "data_sources.json",
            Kind::Security => "security_events.json",
            Kind::Sessions => "user_sessions.json",
            Kind::Exports => "export_jobs.json",
            Kind::Backups => "backup_jobs.json",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "alerts" | "alert" => Ok(Kind::Alerts),
            "notifications" | "notification" => Ok(Kind::Notifications),
            "data-sources" | "data-source" | "data" => Ok(Kind::DataSources),
            "security" | "security-events" => Ok(Kind::Security),
            "sessions" | "session" | "user-sessions" => Ok(Kind::Sessions),
            "exports" | "export-jobs" => Ok(Kind::Exports),
            "backups" | "backup-jobs" => Ok(Kind::Backups),
            _ => Err(format!(
                "Unknown kind: {}. Use alerts, notifications, data-sources, security, sessions, \
                 exports, or backups",
                s
            )),
        }
    }
}

/// 有効/無効を切り替える設定の種類
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsSet {
    SecurityPolicies,
    DataPolicies,
    Channels,
    Rules,
}

impl SettingsSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsSet::SecurityPolicies => "security-policies",
            SettingsSet::DataPolicies => "data-policies",
            SettingsSet::Channels => "channels",
            SettingsSet::Rules => "rules",
        }
    }

    /// seed-dir 内のファイル名
    pub fn seed_file_name(&self) -> &'static str {
        match self {
            SettingsSet::SecurityPolicies => "security_policies.json",
            SettingsSet::DataPolicies => "data_policies.json",
            SettingsSet::Channels => "notification_channels.json",
            SettingsSet::Rules => "notification_rules.json",
        }
    }
}

impl fmt::Display for SettingsSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingsSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "security-policies" | "policies" => Ok(SettingsSet::SecurityPolicies),
            "data-policies" => Ok(SettingsSet::DataPolicies),
            "channels" | "notification-channels" => Ok(SettingsSet::Channels),
            "rules" | "notification-rules" => Ok(SettingsSet::Rules),
            _ => Err(format!(
                "Unknown settings: {}. Use security-policies, data-policies, channels, or rules",
                s
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use xlsx, csv, or json", s)),
        }
    }
}
