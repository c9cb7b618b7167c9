use anyhow::{Context, Result};
use calamine::{Reader, Xlsx};
use contracts::usecases::u501_import_from_file::{ParsedTable, RawRow};
use std::io::Cursor;

/// Parse delimited text into headers plus rows.
///
/// The first line is the header; quoted fields and embedded delimiters are
/// honored. A header that is blank after cleaning becomes "Column N". Rows
/// shorter than the header list are padded with empty values.
pub fn parse_csv_text(text: &str) -> Result<ParsedTable> {
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let headers = clean_headers(raw_headers.iter().map(|h| h.to_string()));

    let mut rows: Vec<RawRow> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // A record the reader cannot decode fails the whole parse;
        // silently dropping it would desync row counts from the file.
        let record = result.with_context(|| format!("Malformed CSV record at row {}", i + 1))?;
        rows.push(zip_row(&headers, |i| record.get(i)));
    }

    if rows.is_empty() {
        anyhow::bail!("File must contain a header line and at least one data row");
    }

    Ok(ParsedTable { headers, rows })
}

/// Parse a binary xlsx workbook, first sheet only, every cell stringified
pub fn parse_workbook(data: &[u8]) -> Result<ParsedTable> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data)).context("Failed to decode spreadsheet")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Workbook contains no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;

    let mut sheet_rows = range.rows();
    let header_cells = sheet_rows
        .next()
        .ok_or_else(|| anyhow::anyhow!("Sheet must contain a header row and at least one data row"))?;
    let headers = clean_headers(header_cells.iter().map(|c| c.to_string()));

    let rows: Vec<RawRow> = sheet_rows
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let value = cells.get(i).map(|c| c.to_string()).unwrap_or_default();
                    (h.clone(), value.trim().to_string())
                })
                .collect()
        })
        .collect();

    if rows.is_empty() {
        anyhow::bail!("Sheet must contain a header row and at least one data row");
    }

    Ok(ParsedTable { headers, rows })
}

/// Trim, strip stray quotes, replace blanks with positional placeholders
fn clean_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.enumerate()
        .map(|(i, h)| {
            let cleaned = h.trim().trim_matches('"').trim().to_string();
            if cleaned.is_empty() {
                format!("Column {}", i + 1)
            } else {
                cleaned
            }
        })
        .collect()
}

/// Zip header names against positional values; missing values become ""
fn zip_row<'a>(headers: &[String], get: impl Fn(usize) -> Option<&'a str>) -> RawRow {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.clone(), get(i).unwrap_or("").trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_data_rows() {
        let table = parse_csv_text("title,price\nA,100\nB,200").unwrap();
        assert_eq!(table.headers, vec!["title", "price"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("title").map(String::as_str), Some("A"));
        assert_eq!(table.rows[0].get("price").map(String::as_str), Some("100"));
        assert_eq!(table.rows[1].get("title").map(String::as_str), Some("B"));
        assert_eq!(table.rows[1].get("price").map(String::as_str), Some("200"));
    }

    #[test]
    fn header_only_input_fails() {
        let err = parse_csv_text("title,price").unwrap_err();
        assert!(err.to_string().contains("data row"));
    }

    #[test]
    fn quoted_field_with_embedded_comma_survives() {
        let table = parse_csv_text("title,price\n\"Flat, with view\",100").unwrap();
        assert_eq!(
            table.rows[0].get("title").map(String::as_str),
            Some("Flat, with view")
        );
    }

    #[test]
    fn blank_header_gets_positional_placeholder() {
        let table = parse_csv_text("title,,price\nA,x,100").unwrap();
        assert_eq!(table.headers[1], "Column 2");
        assert_eq!(table.rows[0].get("Column 2").map(String::as_str), Some("x"));
    }

    #[test]
    fn short_row_padded_with_empty_values() {
        let table = parse_csv_text("title,price,rooms\nA,100\nB,200,3").unwrap();
        assert_eq!(table.rows[0].get("rooms").map(String::as_str), Some(""));
        assert_eq!(table.rows[1].get("rooms").map(String::as_str), Some("3"));
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let table = parse_csv_text("\u{FEFF}title,price\nA,100").unwrap();
        assert_eq!(table.headers[0], "title");
    }

    #[test]
    fn unclosed_quote_merges_following_lines_rather_than_dropping_them() {
        // RFC 4180 reads everything after an unopened-and-never-closed
        // quote as one field, so the remaining lines land in row one
        // instead of disappearing.
        let table = parse_csv_text("title,price\n\"A,100\nB,200").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(table.rows[0]
            .get("title")
            .map(|t| t.contains("B,200"))
            .unwrap_or(false));
    }

    #[test]
    fn garbage_bytes_fail_workbook_decode() {
        let err = parse_workbook(b"definitely not a zip archive").unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
