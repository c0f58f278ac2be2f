//! Shared parsing primitives.
//!
//! Two layers live here:
//!
//! - the cell micro-grammar helpers ([`split_list`], [`split_pair`],
//!   [`check_boolean`], [`escape_for_csv`]) used by the decoder and the CSV
//!   encoder;
//! - reading a whole Catalogs file into [`FieldRow`]s, with encoding
//!   detection and a real CSV tokenizer (quoted cells may hold newlines).

use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::schema::{EntitySchema, FieldRow};

/// Separator between list items and between pairs.
pub const LIST_DELIMITER: char = ',';
/// Separator inside a `key|value` pair.
pub const PAIR_DELIMITER: char = '|';
/// Separator between a hierarchy and its location definition.
pub const LOCATION_DELIMITER: char = '=';
/// Separator between location entries.
pub const LINE_DELIMITER: char = '\n';

/// Split a cell on `delimiter`.
///
/// Trailing empty pieces are discarded, and an empty cell yields no items
/// at all rather than a single empty one.
pub fn split_list(text: &str, delimiter: char) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut parts: Vec<&str> = text.split(delimiter).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Split `text` into exactly two parts on `delimiter`.
///
/// Returns `None` for any other part count, so `"A"`, `"A|"` and `"A|B|C"`
/// are all rejected.
pub fn split_pair(text: &str, delimiter: char) -> Option<(&str, &str)> {
    match split_list(text, delimiter).as_slice() {
        [first, second] => Some((*first, *second)),
        _ => None,
    }
}

/// Truthy spellings accepted in flag columns.
const TRUE_VALUES: &[&str] = &["true", "yes", "y", "1", "x"];

/// Interpret a flag cell; anything not recognised as true is false.
pub fn check_boolean(text: &str) -> bool {
    let value = text.trim();
    TRUE_VALUES.iter().any(|t| value.eq_ignore_ascii_case(t))
}

/// Make `text` safe as one field of a row delimited by `delimiter`.
///
/// Fields holding the delimiter, a quote or a line break are quoted, with
/// embedded quotes doubled. Other fields pass through unchanged.
pub fn escape_for_csv(text: &str, delimiter: u8) -> String {
    let needs_quotes = text
        .bytes()
        .any(|b| b == delimiter || b == b'"' || b == b'\n' || b == b'\r');
    if needs_quotes {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Join already-escaped fields into one output line.
pub fn join_row(fields: &[String], delimiter: u8) -> String {
    let mut line = fields.join(&char::from(delimiter).to_string());
    line.push('\n');
    line
}

// =============================================================================
// File Reading
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

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Read rows from `reader`, keyed by the columns of `schema`.
///
/// The first record is the header row. Columns are located by name; a
/// column missing from the header reads as `""` in every row. Rows whose
/// cells are all empty are skipped.
pub fn read_rows<R: Read>(
    reader: R,
    schema: &EntitySchema,
    delimiter: u8,
) -> CsvResult<Vec<FieldRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let headers: Vec<String> = match records.next() {
        Some(header) => header?.iter().map(str::to_string).collect(),
        None => return Err(CsvError::EmptyFile),
    };
    let positions = schema.header_positions(&headers)?;

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let row: FieldRow = schema
            .columns()
            .iter()
            .zip(&positions)
            .map(|(column, &pos)| (*column, pos.and_then(|p| record.get(p)).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), file = schema.file_name(), "read input rows");
    Ok(rows)
}

/// Read a file with encoding auto-detection.
pub fn read_file<P: AsRef<Path>>(
    path: P,
    schema: &EntitySchema,
    delimiter: u8,
) -> CsvResult<Vec<FieldRow>> {
    let bytes = std::fs::read(path.as_ref())?;
    let encoding = detect_encoding(&bytes);
    tracing::debug!(path = %path.as_ref().display(), %encoding, "decoding input file");
    let content = decode_content(&bytes, &encoding);
    read_rows(content.as_bytes(), schema, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CATALOG_NAME, COUNTRY_SPECIFIC, LOCATIONS, SCRIPTS, SPEC};

    #[test]
    fn test_split_list_empty_is_empty() {
        assert!(split_list("", ',').is_empty());
    }

    #[test]
    fn test_split_list_keeps_inner_empties() {
        assert_eq!(split_list("a,,b", ','), vec!["a", "", "b"]);
        assert_eq!(split_list(",a", ','), vec!["", "a"]);
    }

    #[test]
    fn test_split_list_drops_trailing_empties() {
        assert_eq!(split_list("a,b,,", ','), vec!["a", "b"]);
        assert!(split_list(",,", ',').is_empty());
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("A|X", '|'), Some(("A", "X")));
        assert_eq!(split_pair("A", '|'), None);
        assert_eq!(split_pair("A|", '|'), None);
        assert_eq!(split_pair("A|B|C", '|'), None);
        assert_eq!(split_pair("", '|'), None);
        assert_eq!(split_pair("|X", '|'), Some(("", "X")));
    }

    #[test]
    fn test_check_boolean() {
        assert!(check_boolean("true"));
        assert!(check_boolean("TRUE"));
        assert!(check_boolean(" Yes "));
        assert!(check_boolean("1"));
        assert!(!check_boolean("false"));
        assert!(!check_boolean(""));
        assert!(!check_boolean("maybe"));
    }

    #[test]
    fn test_escape_for_csv() {
        assert_eq!(escape_for_csv("plain", b','), "plain");
        assert_eq!(escape_for_csv("a,b", b','), "\"a,b\"");
        assert_eq!(escape_for_csv("line1\nline2", b','), "\"line1\nline2\"");
        assert_eq!(escape_for_csv("say \"hi\"", b','), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_for_csv("a,b", b';'), "a,b");
        assert_eq!(escape_for_csv("a;b", b';'), "\"a;b\"");
    }

    #[test]
    fn test_join_row() {
        let fields = vec!["".to_string(), "Spec".to_string(), "\"a,b\"".to_string()];
        assert_eq!(join_row(&fields, b','), ",Spec,\"a,b\"\n");
    }

    #[test]
    fn test_read_rows_by_header_name() {
        let schema = EntitySchema::new("CATALOG", "Catalogs")
            .add_column(CATALOG_NAME)
            .add_column(SPEC)
            .add_column(LOCATIONS);
        let input = "Spec,Catalog Name,Locations\n\
                     Product Spec,Products,\"Stores=Store Spec|A,B\nRegions=Region Spec|C\"\n\
                     ,,\n";

        let rows = read_rows(input.as_bytes(), &schema, b',').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(CATALOG_NAME), "Products");
        assert_eq!(rows[0].get(SPEC), "Product Spec");
        assert_eq!(
            rows[0].get(LOCATIONS),
            "Stores=Store Spec|A,B\nRegions=Region Spec|C"
        );
    }

    #[test]
    fn test_read_rows_without_optional_columns() {
        let schema = EntitySchema::catalog();
        let input = "Catalog Name,Spec\n\
                     Products,Product Spec\n";

        let rows = read_rows(input.as_bytes(), &schema, b',').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(CATALOG_NAME), "Products");
        assert_eq!(rows[0].get(SPEC), "Product Spec");
        assert_eq!(rows[0].get(COUNTRY_SPECIFIC), "");
        assert_eq!(rows[0].get(SCRIPTS), "");
    }

    #[test]
    fn test_read_rows_requires_name_column() {
        let schema = EntitySchema::catalog();
        let input = "Country Specific,Spec\nUS,Product Spec\n";

        let err = read_rows(input.as_bytes(), &schema, b',').unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn(ref c) if c == CATALOG_NAME));
    }

    #[test]
    fn test_read_rows_empty_input() {
        let schema = EntitySchema::catalog();
        let err = read_rows("".as_bytes(), &schema, b',').unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile));
    }

    #[test]
    fn test_decode_latin1() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        assert_eq!(decode_content(bytes, "iso-8859-1"), "Société");
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBFCatalog Name";
        assert_eq!(decode_content(bytes, "utf-8"), "Catalog Name");
    }
}
