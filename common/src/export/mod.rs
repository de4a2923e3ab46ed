//! Export core modules shared by the CLI commands.

pub mod csv;
pub mod table;

#[cfg(feature = "excel")]
pub mod excel_core;

pub use table::Tabular;

use crate::error::Result;
use serde::Serialize;

/// 表示中の一覧を整形済みJSON配列にする
pub fn generate_json<T: Serialize>(records: &[&T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
