use serde_json::{Map, Value};

/// A single parsed row: header name mapped to its (string) cell value.
///
/// Keys come straight from the uploaded header row, in order. There is no
/// fixed schema; each upload defines its own columns.
pub type Record = Map<String, Value>;

/// Parse pasted spreadsheet text into a list of header-keyed records.
///
/// The first line is the header row. The delimiter is sniffed once per call:
/// TAB is tried first (spreadsheet apps paste tab-separated), and if that
/// yields fewer than 3 header fields the line is re-split on COMMA instead.
///
/// Data rows are zipped against the headers by position; extra values are
/// discarded, missing positions default to the empty string, and every cell
/// is trimmed. Rows whose every value is empty are dropped.
///
/// There is no quoting or escaping support: a literal delimiter inside a
/// cell splits it. That matches what pasted spreadsheet data actually looks
/// like and is kept for compatibility with existing uploads.
pub fn parse(text: &str) -> Vec<Record> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let mut delimiter = '\t';
    let mut headers: Vec<&str> = lines[0].split(delimiter).map(str::trim).collect();
    if headers.len() < 3 {
        delimiter = ',';
        headers = lines[0].split(delimiter).map(str::trim).collect();
    }

    let mut records = Vec::new();
    for line in &lines[1..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        let mut record = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = values.get(idx).copied().unwrap_or("");
            // Duplicate headers overwrite in place: last value wins.
            record.insert((*header).to_string(), Value::String(value.to_string()));
        }

        let all_empty = record
            .values()
            .all(|v| v.as_str().is_none_or(str::is_empty));
        if !all_empty {
            records.push(record);
        }
    }
    records
}
