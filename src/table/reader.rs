//! CSV loading into [`Table`]s.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use super::error::{TableError, TableResult};
use super::record::Table;

/// Options for reading a CSV source.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl ReadOptions {
    /// Set the field delimiter.
    pub fn delimiter(mut self, value: u8) -> Self {
        self.delimiter = value;
        self
    }
}

/// Loads a header plus data rows, tolerating ragged rows.
#[derive(Debug, Clone, Default)]
pub struct TableReader {
    options: ReadOptions,
}

impl TableReader {
    pub fn new(options: ReadOptions) -> Self {
        Self { options }
    }

    /// Load a table from a file on disk.
    pub fn read_path(&self, path: &Path) -> TableResult<Table> {
        let file = File::open(path).map_err(|source| TableError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let table = self.read_from(file)?;
        log::debug!(
            "loaded {} rows x {} columns from {}",
            table.len(),
            table.header.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load a table from any reader.
    ///
    /// A source with no header row yields an empty table.
    pub fn read_from<R: Read>(&self, mut source: R) -> TableResult<Table> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;

        // The parser closes an open quote at end of input; reject that here
        // instead of folding every following row into one field.
        if let Some(line) = unterminated_quote(&bytes, self.options.delimiter) {
            return Err(TableError::UnterminatedQuote { line });
        }

        // The header is read as an ordinary record so that ragged rows never
        // trip the parser's own length check.
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .from_reader(bytes.as_slice());

        let mut rows = reader.records();
        let header: Vec<String> = match rows.next() {
            Some(record) => to_strings(&record?),
            None => return Ok(Table::default()),
        };

        let mut data = Vec::new();
        for record in rows {
            data.push(to_strings(&record?));
        }

        Ok(Table::from_rows(header, data))
    }
}

fn to_strings(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// Scan with the parser's quoting rules and return the 1-based line of a
/// quoted field that is still open at end of input.
///
/// A quote only opens a field at field start; `""` inside a quoted field is an
/// escaped quote; anything after the closing quote up to the next delimiter or
/// line end is plain field content.
fn unterminated_quote(bytes: &[u8], delimiter: u8) -> Option<usize> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        FieldStart,
        Unquoted,
        Quoted,
        QuoteInQuoted,
    }

    let mut state = State::FieldStart;
    let mut line = 1;
    let mut opened_at = 1;

    for &b in bytes {
        state = match state {
            State::FieldStart | State::Unquoted => match b {
                b'"' if state == State::FieldStart => {
                    opened_at = line;
                    State::Quoted
                }
                b'\n' | b'\r' => State::FieldStart,
                _ if b == delimiter => State::FieldStart,
                _ => State::Unquoted,
            },
            State::Quoted => match b {
                b'"' => State::QuoteInQuoted,
                _ => State::Quoted,
            },
            State::QuoteInQuoted => match b {
                b'"' => State::Quoted,
                b'\n' | b'\r' => State::FieldStart,
                _ if b == delimiter => State::FieldStart,
                _ => State::Unquoted,
            },
        };
        if b == b'\n' {
            line += 1;
        }
    }

    (state == State::Quoted).then_some(opened_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read(text: &str) -> Table {
        TableReader::default().read_from(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_read_header_and_rows() {
        let table = read("child_commit_id,file_path,loc\nc1,src/A.java,10\nc2,src/B.java,20\n");

        assert_eq!(table.header, vec!["child_commit_id", "file_path", "loc"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[1]["file_path"], "src/B.java");
        assert_eq!(table.records[1]["loc"], "20");
    }

    #[test]
    fn test_empty_source_is_empty_table() {
        let table = read("");
        assert!(table.header.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_header_only() {
        let table = read("a,b\n");
        assert_eq!(table.header, vec!["a", "b"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_ragged_rows() {
        let table = read("a,b,c\n1\n1,2,3,4,5\n");

        assert_eq!(table.records[0]["a"], "1");
        assert_eq!(table.records[0]["b"], "");
        assert_eq!(table.records[0]["c"], "");
        assert_eq!(table.records[1].len(), 3);
        assert_eq!(table.records[1]["c"], "3");
    }

    #[test]
    fn test_quoted_fields() {
        let table = read("a,b\n\"x, y\",\"say \"\"hi\"\"\"\n");
        assert_eq!(table.records[0]["a"], "x, y");
        assert_eq!(table.records[0]["b"], "say \"hi\"");
    }

    #[test]
    fn test_custom_delimiter() {
        let reader = TableReader::new(ReadOptions::default().delimiter(b';'));
        let table = reader.read_from("a;b\n1;2\n".as_bytes()).unwrap();
        assert_eq!(table.records[0]["b"], "2");
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let result = TableReader::default()
            .read_from("child_commit_id,file_path\nc1,\"src/A.java\nc2,src/B.java\n".as_bytes());
        match result {
            Err(TableError::UnterminatedQuote { line }) => assert_eq!(line, 2),
            other => panic!("expected an unterminated quote error, got {other:?}"),
        }
    }

    #[test]
    fn test_quotes_that_do_not_open_a_field() {
        // Mid-field quotes are literal; an escaped quote and a multi-line
        // quoted field both close properly.
        let table = read("a,b\nsay \"hi,\"x\"\"y\"\n\"multi\nline\",z\"w\n");

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0]["a"], "say \"hi");
        assert_eq!(table.records[0]["b"], "x\"y");
        assert_eq!(table.records[1]["a"], "multi\nline");
        assert_eq!(table.records[1]["b"], "z\"w");
    }

    #[test]
    fn test_unterminated_quote_with_custom_delimiter() {
        let reader = TableReader::new(ReadOptions::default().delimiter(b';'));
        assert!(reader.read_from("a;b\n1;\"2\n".as_bytes()).is_err());
        assert!(reader.read_from("a;b\n1;\"2\"\n".as_bytes()).is_ok());
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let bytes: &[u8] = b"a,b\n\xff\xfe,1\n";
        let result = TableReader::default().read_from(bytes);
        assert!(matches!(result, Err(TableError::Csv(_))));
    }

    #[test]
    fn test_read_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "child_commit,new_path\nc1,src/A.java\n").unwrap();

        let table = TableReader::default().read_path(file.path()).unwrap();
        assert_eq!(table.records[0]["new_path"], "src/A.java");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TableReader::default().read_path(&dir.path().join("missing.csv"));
        match result {
            Err(e) => assert!(e.is_not_found()),
            Ok(_) => panic!("expected an error"),
        }
    }
}
