//! Excel生成（共通ライブラリ）
//!
//! 表示中の一覧を1シートに書き出す。1行目は見出し。

use super::table::Tabular;
use rust_xlsxwriter::*;

const MIN_COL_WIDTH: usize = 8;
const MAX_COL_WIDTH: usize = 60;

/// シート名に使えない文字を除き31文字に切り詰める
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Records".to_string()
    } else {
        cleaned
    }
}

/// 列ごとの表示幅（文字数）
fn column_widths(columns: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            longest.max(header.chars().count()).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
        })
        .collect()
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `records` - 出力するレコード（表示順）
/// * `title` - シート名
pub fn generate_excel_buffer<T: Tabular>(records: &[&T], title: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_font_size(10.0)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let columns = T::columns();
    let rows: Vec<Vec<String>> = records.iter().map(|r| r.row()).collect();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(title))
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, width) in column_widths(columns, &rows).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64 + 2.0)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    for (col, header) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let excel_row = i as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string_with_format(excel_row, col as u16, value, &value_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }
    }

    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    if !rows.is_empty() {
        worksheet.autofilter(0, 0, rows.len() as u32, columns.len() as u16 - 1)
            .map_err(|e| format!("オートフィルタ設定エラー: {}", e))?;
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
