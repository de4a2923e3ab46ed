//! Hapo Intel CLI
//!
//! ダッシュボードの一覧（アラート・通知・データ管理・セキュリティ・エクスポート）を
//! 端末から絞り込み・ソート・一括操作する。

pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod jobs;
pub mod live;
pub mod render;
pub mod session;
pub mod settings;
