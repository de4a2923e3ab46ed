//! 表示中の一覧のファイル出力

use crate::cli::OutputFormat;
use crate::dashboard::CliRecord;
use crate::error::{HapoError, Result};
use hapo_intel_common::export::{csv, generate_json};
use std::path::{Path, PathBuf};

pub fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

/// レコードを指定形式で書き出し、出力先を返す
pub fn export_records<R: CliRecord>(
    records: &[&R],
    format: OutputFormat,
    output: &Path,
    title: &str,
) -> Result<PathBuf> {
    let output_path = output_path_for_format(output, title, format.extension());
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Xlsx => {
            println!("- Excelを生成中...");
            let buffer =
                hapo_intel_common::export::excel_core::generate_excel_buffer(records, title)
                    .map_err(HapoError::ExcelGeneration)?;
            std::fs::write(&output_path, buffer)?;
        }
        OutputFormat::Csv => {
            println!("- CSVを生成中...");
            std::fs::write(&output_path, csv::generate_csv(records))?;
        }
        OutputFormat::Json => {
            println!("- JSONを生成中...");
            std::fs::write(&output_path, generate_json(records)?)?;
        }
    }

    tracing::info!(path = %output_path.display(), count = records.len(), %format, "export written");
    Ok(output_path)
}
