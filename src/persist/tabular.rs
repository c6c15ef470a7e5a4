//! CSV writer.

use super::{cell_text, ensure_parent, Destination, RecordSet, SaveFormat};
use crate::error::Result;
use std::fs::File;
use std::io::Write;

/// UTF-8 signature so spreadsheet apps detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write `<file_stem>.csv` with a header row, replacing any existing file.
pub fn write_csv(set: &RecordSet, destination: &Destination) -> Result<String> {
    let path = destination.file_for(SaveFormat::Csv)?;
    ensure_parent(&path)?;

    let mut file = File::create(&path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(set.columns())?;
    for row in set.rows() {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer.flush()?;

    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{persist, PersistOutcome, Record};
    use serde_json::json;

    fn articles(titles: &[&str]) -> Vec<Record> {
        titles
            .iter()
            .map(|t| {
                json!({
                    "url": format!("https://example.com/{}", t.to_lowercase()),
                    "title": t,
                    "scraped_text": format!("All about {}, with \"quotes\"\nand lines.", t)
                })
                .as_object()
                .cloned()
                .unwrap()
            })
            .collect()
    }

    fn read_rows(path: &std::path::Path) -> (Vec<u8>, Vec<Vec<String>>) {
        let bytes = std::fs::read(path).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&bytes[UTF8_BOM.len()..]);
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (bytes, rows)
    }

    #[test]
    fn test_writes_bom_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Destination::new(dir.path().join("algebra"), dir.path().join("db"), "articles");

        let outcome = persist(&articles(&["Algebra", "Geometry"]), "csv", &dest);
        assert!(outcome.is_saved(), "{:?}", outcome);

        let (bytes, rows) = read_rows(&dest.file_path("csv"));
        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(rows[0], vec!["url", "title", "scraped_text"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], "Algebra");
        assert_eq!(rows[1][2], "All about Algebra, with \"quotes\"\nand lines.");
    }

    #[test]
    fn test_second_write_replaces_first() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Destination::new(dir.path().join("repeat"), dir.path().join("db"), "articles");

        persist(&articles(&["First", "Second", "Third"]), "csv", &dest);
        let outcome = persist(&articles(&["Only"]), "csv", &dest);
        assert_eq!(
            outcome,
            PersistOutcome::Saved {
                format: crate::persist::SaveFormat::Csv,
                destination: dest.file_path("csv").display().to_string(),
                rows: 1,
            }
        );

        let (_, rows) = read_rows(&dest.file_path("csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "Only");
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dest = Destination::new(
            dir.path().join("exports").join("2026").join("math"),
            dir.path().join("db"),
            "articles",
        );

        assert!(persist(&articles(&["Nested"]), "tabular", &dest).is_saved());
        assert!(dest.file_path("csv").exists());
    }
}
