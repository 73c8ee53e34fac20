//! Spreadsheet output.
//!
//! The job keeps one sheet holding the complete current listing of the
//! playlist. [`SheetWriter`] rewrites it from scratch on every run; the
//! storage behind it is anything implementing [`Sheet`], by default a CSV
//! file ([`CsvSheet`]).

use std::{fmt, io::Error, path::PathBuf};

use async_trait::async_trait;

use crate::{types::PlaylistEntry, utils};

pub const SHEET_HEADER: [&str; 5] = ["name", "artists", "URL", "release_date", "added_at"];

#[derive(Debug)]
pub enum SheetError {
    IoError(Error),
    CsvError(csv::Error),
}

impl From<Error> for SheetError {
    fn from(err: Error) -> Self {
        SheetError::IoError(err)
    }
}

impl From<csv::Error> for SheetError {
    fn from(err: csv::Error) -> Self {
        SheetError::CsvError(err)
    }
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::IoError(e) => write!(f, "sheet I/O failed: {}", e),
            SheetError::CsvError(e) => write!(f, "sheet is not valid CSV: {}", e),
        }
    }
}

impl std::error::Error for SheetError {}

/// A single table of string cells.
#[async_trait]
pub trait Sheet: Send {
    /// Removes every row.
    async fn clear(&mut self) -> Result<(), SheetError>;

    /// Adds `rows` after the last existing row.
    async fn append_rows(&mut self, rows: Vec<Vec<String>>) -> Result<(), SheetError>;

    /// Returns all rows, header included.
    async fn rows(&self) -> Result<Vec<Vec<String>>, SheetError>;
}

/// Sheet stored as a CSV file. A missing file reads as an empty sheet.
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, SheetError> {
        match async_fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(SheetError::IoError(e)),
        }
    }

    async fn write_bytes(&self, bytes: Vec<u8>) -> Result<(), SheetError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, bytes)
            .await
            .map_err(SheetError::IoError)
    }
}

#[async_trait]
impl Sheet for CsvSheet {
    async fn clear(&mut self) -> Result<(), SheetError> {
        self.write_bytes(Vec::new()).await
    }

    async fn append_rows(&mut self, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in &rows {
            wtr.write_record(row)?;
        }
        let encoded = wtr
            .into_inner()
            .map_err(|e| SheetError::IoError(Error::other(e.to_string())))?;

        let mut bytes = self.read_bytes().await?;
        bytes.extend(encoded);
        self.write_bytes(bytes).await
    }

    async fn rows(&self) -> Result<Vec<Vec<String>>, SheetError> {
        let bytes = self.read_bytes().await?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

/// Rewrites a sheet with the current playlist listing.
pub struct SheetWriter<S: Sheet> {
    sheet: S,
}

impl<S: Sheet> SheetWriter<S> {
    pub fn new(sheet: S) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    pub fn into_inner(self) -> S {
        self.sheet
    }

    /// Clears the sheet, writes the header and one row per entry in order.
    ///
    /// Returns the number of data rows written.
    pub async fn write(&mut self, entries: &[PlaylistEntry]) -> Result<usize, SheetError> {
        self.sheet.clear().await?;
        self.sheet
            .append_rows(vec![SHEET_HEADER.iter().map(|h| h.to_string()).collect()])
            .await?;

        let rows: Vec<Vec<String>> = entries.iter().map(entry_row).collect();
        let count = rows.len();
        if count > 0 {
            self.sheet.append_rows(rows).await?;
        }
        Ok(count)
    }
}

/// Cells of one entry: name, artists, URL, release date, `added_at` as given.
/// Missing values become empty cells.
pub fn entry_row(entry: &PlaylistEntry) -> Vec<String> {
    vec![
        utils::entry_name(entry),
        utils::entry_artists(entry),
        utils::entry_url(entry).unwrap_or_default(),
        utils::entry_release_date(entry),
        entry.added_at.clone().unwrap_or_default(),
    ]
}
