mod common;

use async_trait::async_trait;
use common::entry;
use playlist_digest::{
    sheet::{CsvSheet, SHEET_HEADER, Sheet, SheetError, SheetWriter},
    types::PlaylistEntry,
};
use tempfile::tempdir;

#[derive(Default)]
struct MemorySheet {
    rows: Vec<Vec<String>>,
    clears: usize,
}

#[async_trait]
impl Sheet for MemorySheet {
    async fn clear(&mut self) -> Result<(), SheetError> {
        self.rows.clear();
        self.clears += 1;
        Ok(())
    }

    async fn append_rows(&mut self, rows: Vec<Vec<String>>) -> Result<(), SheetError> {
        self.rows.extend(rows);
        Ok(())
    }

    async fn rows(&self) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(self.rows.clone())
    }
}

fn header() -> Vec<String> {
    SHEET_HEADER.iter().map(|h| h.to_string()).collect()
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_write_header_and_rows_in_order() {
    let mut writer = SheetWriter::new(MemorySheet::default());
    let entries = vec![
        entry("A", &["X", "Y"], "2024-05-09T10:00:00Z"),
        entry("B", &["Z"], "2024-05-10T11:00:00Z"),
    ];

    let written = writer.write(&entries).await.unwrap();

    assert_eq!(written, 2);
    let rows = writer.sheet().rows().await.unwrap();
    assert_eq!(
        rows,
        vec![
            header(),
            row(&[
                "A",
                "X,Y",
                "https://open.spotify.com/track/A",
                "2020-01-01",
                "2024-05-09T10:00:00Z"
            ]),
            row(&[
                "B",
                "Z",
                "https://open.spotify.com/track/B",
                "2020-01-01",
                "2024-05-10T11:00:00Z"
            ]),
        ]
    );
}

#[tokio::test]
async fn test_write_replaces_previous_contents() {
    let mut writer = SheetWriter::new(MemorySheet::default());

    writer
        .write(&[entry("A", &["X"], "2024-05-09T10:00:00Z")])
        .await
        .unwrap();
    writer.write(&[]).await.unwrap();

    let sheet = writer.into_inner();
    assert_eq!(sheet.clears, 2);
    assert_eq!(sheet.rows, vec![header()]);
}

#[tokio::test]
async fn test_entry_without_track_writes_empty_cells() {
    let mut writer = SheetWriter::new(MemorySheet::default());
    let entries: Vec<PlaylistEntry> = vec![
        serde_json::from_value(serde_json::json!({
            "added_at": "2024-05-09T10:00:00Z",
            "track": null
        }))
        .unwrap(),
    ];

    writer.write(&entries).await.unwrap();

    let rows = writer.sheet().rows().await.unwrap();
    assert_eq!(rows[1], row(&["", "", "", "", "2024-05-09T10:00:00Z"]));
}

#[tokio::test]
async fn test_csv_sheet_full_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("playlist.csv");
    let mut writer = SheetWriter::new(CsvSheet::new(path.clone()));

    writer
        .write(&[
            entry("A, the song", &["X", "Y"], "2024-05-09T10:00:00Z"),
            entry("B \"quoted\"", &["Z"], "2024-05-10T11:00:00Z"),
        ])
        .await
        .unwrap();

    let rows = CsvSheet::new(path.clone()).rows().await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], header());
    assert_eq!(rows[1][0], "A, the song");
    assert_eq!(rows[1][1], "X,Y");
    assert_eq!(rows[2][0], "B \"quoted\"");

    writer.write(&[]).await.unwrap();

    let rows = CsvSheet::new(path).rows().await.unwrap();
    assert_eq!(rows, vec![header()]);
}

#[tokio::test]
async fn test_csv_sheet_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let sheet = CsvSheet::new(dir.path().join("absent.csv"));

    assert!(sheet.rows().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_entry_without_added_at_writes_empty_cell() {
    let mut writer = SheetWriter::new(MemorySheet::default());
    let mut undated = entry("A", &["X"], "");
    undated.added_at = None;

    writer.write(&[undated]).await.unwrap();

    let rows = writer.sheet().rows().await.unwrap();
    assert_eq!(
        rows[1],
        row(&["A", "X", "https://open.spotify.com/track/A", "2020-01-01", ""])
    );
}
