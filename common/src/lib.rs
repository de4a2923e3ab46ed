//! Hapo Intel Common Library
//!
//! ダッシュボードの一覧画面（アラート・通知・データ管理・セキュリティ・エクスポート）で
//! 共有されるレコード型と一覧コントローラ

pub mod controller;
pub mod error;
pub mod export;
pub mod kinds;
pub mod record;
pub mod seed;
pub mod settings;
pub mod timestamp;
pub mod types;

pub use controller::{ActionReport, RecordListController};
pub use error::{Error, Result};
pub use export::Tabular;
pub use record::{Action, ActionContext, Query, Record, RecordFilter};
pub use seed::BuiltinSeed;
pub use settings::Setting;
pub use timestamp::Timestamp;
pub use types::{
    Choice, Priority, ReadState, SelectionPolicy, Severity, SortDirection, SortKey, SortSpec,
    Variant,
};
