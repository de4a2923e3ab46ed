//! CSV出力（RFC 4180 のクォート規則）

use super::table::Tabular;

/// カンマ・ダブルクォート・改行を含むセルだけをクォートする
pub fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn write_line(out: &mut String, cells: impl Iterator<Item = String>) {
    let line: Vec<String> = cells.map(|c| escape_cell(&c)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// 見出し行つきのCSV文字列を生成
pub fn generate_csv<T: Tabular>(records: &[&T]) -> String {
    let mut out = String::new();
    write_line(&mut out, T::columns().iter().map(|c| c.to_string()));
    for record in records {
        write_line(&mut out, record.row().into_iter());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Alert;
    use crate::seed::builtin;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_generate_csv_has_header_and_rows() {
        let alerts = builtin::<Alert>().unwrap();
        let refs: Vec<&Alert> = alerts.iter().take(2).collect();
        let csv = generate_csv(&refs);

        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID,Type,Category"));
        assert!(lines[1].starts_with("1,critical,system,high,active,LED Screen Offline"));
    }
}
