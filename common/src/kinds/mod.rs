//! レコード種別ごとの定義
//!
//! 各種別はフィールド・カテゴリフィルタ・状態遷移・集計を持つ。

pub mod alert;
pub mod backup_job;
pub mod data_source;
pub mod export_job;
pub mod notification;
pub mod security_event;
pub mod user_session;

pub use alert::{Alert, AlertFilter, AlertSummary, AlertTransition};
pub use backup_job::{BackupJob, BackupJobFilter, BackupSummary, BackupTransition};
pub use data_source::{DataSource, DataSourceFilter, DataSourceSummary, DataSourceTransition};
pub use export_job::{ExportJob, ExportJobFilter, ExportRequest, ExportSummary, ExportTransition};
pub use notification::{
    Notification, NotificationFilter, NotificationSummary, NotificationTransition,
};
pub use security_event::{
    SecurityEvent, SecurityEventFilter, SecurityEventTransition, SecuritySummary,
};
pub use user_session::{SessionSummary, SessionTransition, UserSession, UserSessionFilter};
