//! Source table loading with header normalization.
//!
//! Spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.ods`) go through `calamine`;
//! delimited text gets encoding and delimiter auto-detection before the
//! `csv` reader sees it. Either way the result is a [`RawTable`] whose
//! column names are uppercased and trimmed.

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{LoadError, LoadResult};
use crate::models::Cell;

/// Source table as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Normalized column names, in source order
    pub headers: Vec<String>,
    /// Data rows; every row has exactly `headers.len()` cells
    pub rows: Vec<Vec<Cell>>,
    /// Where the table came from (`xlsx`, `csv utf-8 ';'`, ...)
    pub source: String,
}

impl RawTable {
    /// Build a table, normalizing headers and padding/truncating rows to the
    /// header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>, source: impl Into<String>) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|c| !c.is_empty()))
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self {
            headers,
            rows,
            source: source.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by its normalized name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Uppercase and trim a column name (a leading BOM is dropped too).
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_uppercase()
}

/// Load a table, picking the reader from the file extension.
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<RawTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let table = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" | "tsv" | "txt" => {
            let bytes = std::fs::read(path)?;
            parse_bytes_auto(&bytes)?
        }
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        source = %table.source,
        "loaded source table"
    );
    Ok(table)
}

// =============================================================================
// Workbooks
// =============================================================================

/// Read the first worksheet of a workbook; its first row is the header.
pub fn load_workbook(path: &Path) -> LoadResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(LoadError::EmptyFile)?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| match cell_from_data(cell) {
            Cell::Empty => String::new(),
            other => other.as_text().unwrap_or_default(),
        })
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let data: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(RawTable::new(headers, data, "workbook"))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.trim().to_string()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

// =============================================================================
// Delimited text
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to a lossy decode.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<RawTable> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(LoadError::EmptyFile);
    }

    // Valid UTF-8 is taken as-is; chardet only arbitrates legacy encodings
    let encoding = match std::str::from_utf8(bytes) {
        Ok(_) => "utf-8".to_string(),
        Err(_) => detect_encoding(bytes),
    };
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    debug!(%encoding, delimiter = %format_delimiter(delimiter), "detected CSV layout");

    let mut table = parse_csv(&content, delimiter)?;
    table.source = format!("csv {} '{}'", encoding, format_delimiter(delimiter));
    Ok(table)
}

/// Parse delimited text with an explicit delimiter.
pub fn parse_csv(content: &str, delimiter: char) -> LoadResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::infer).collect());
    }

    Ok(RawTable::new(headers, rows, "csv"))
}

fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_headers_normalized() {
        let table = parse_csv(" cod_muerte ;Municipio\nX95A;Cali", ';').unwrap();
        assert_eq!(table.headers, vec!["COD_MUERTE", "MUNICIPIO"]);
        assert_eq!(table.rows[0], vec![Cell::Text("X95A".into()), Cell::Text("Cali".into())]);
    }

    #[test]
    fn test_cells_typed() {
        let table = parse_csv("MES,LATITUD,COD\n3,4.61,A01\n,,\n", ',').unwrap();
        // The all-empty row is dropped
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0], Cell::Int(3));
        assert_eq!(table.rows[0][1], Cell::Float(4.61));
        assert_eq!(table.rows[0][2], Cell::Text("A01".into()));
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse_csv("a;b;c\n1;2", ';').unwrap();
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn test_quoted_values() {
        let table = parse_csv("name;value\n\"Bogotá, D.C.\";\"7\"", ';').unwrap();
        assert_eq!(table.rows[0][0], Cell::Text("Bogotá, D.C.".into()));
        assert_eq!(table.rows[0][1], Cell::Int(7));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_bytes_auto(b""), Err(LoadError::EmptyFile)));
    }

    #[test]
    fn test_latin1_decoding() {
        // "AÑO" in ISO-8859-1
        let bytes: &[u8] = &[0x41, 0xD1, 0x4F];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "AÑO");
    }

    #[test]
    fn test_load_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deaths.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "cod_muerte,municipio,mes,ano").unwrap();
        writeln!(file, "X95A,Cali,1,2019").unwrap();
        writeln!(file, "Y10,Cali,2,2019").unwrap();
        drop(file);

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_index("MES"), Some(2));
        assert!(table.source.starts_with("csv"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_table("deaths.parquet").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "parquet"));
    }
}
