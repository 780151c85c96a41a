//! CSV output.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tempfile::NamedTempFile;

use super::error::{TableError, TableResult};

/// Options for writing the merged table.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote every field, not only the ones that need it.
    pub quote_all: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote_all: true,
        }
    }
}

impl WriteOptions {
    /// Set the field delimiter.
    pub fn delimiter(mut self, value: u8) -> Self {
        self.delimiter = value;
        self
    }

    /// Set the quote_all flag.
    pub fn quote_all(mut self, value: bool) -> Self {
        self.quote_all = value;
        self
    }
}

/// Emits a header and rows as CSV.
#[derive(Debug, Clone, Default)]
pub struct TableWriter {
    options: WriteOptions,
}

impl TableWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Write to a file, creating its parent directory if needed.
    pub fn write_path<R: AsRef<[String]>>(
        &self,
        path: &Path,
        header: &[String],
        rows: &[R],
    ) -> TableResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| TableError::Create {
            path: parent.to_path_buf(),
            source,
        })?;

        // Rows go to a sibling temp file that only replaces `path` once every
        // row is written; a failed write leaves no output behind.
        let create_err = |source: std::io::Error| TableError::Create {
            path: path.to_path_buf(),
            source,
        };
        let mut staged = NamedTempFile::new_in(parent).map_err(create_err)?;
        self.write_to(BufWriter::new(staged.as_file_mut()), header, rows)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| create_err(e.error))?;
        log::debug!("wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Write to any sink.
    pub fn write_to<W: Write, R: AsRef<[String]>>(
        &self,
        sink: W,
        header: &[String],
        rows: &[R],
    ) -> TableResult<()> {
        let quote_style = if self.options.quote_all {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        };
        let mut writer = WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .quote_style(quote_style)
            .terminator(Terminator::Any(b'\n'))
            .flexible(false)
            .from_writer(sink);

        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row.as_ref())?;
        }
        writer.flush()?;
        Ok(())
    }
}
