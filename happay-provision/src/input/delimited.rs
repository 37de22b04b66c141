//! Read provisioning rows from a CSV file

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use super::Row;

/// Read all data rows of a CSV file
///
/// The first record is the header row. Records shorter than the header are
/// padded with empty cells, and records made only of blank cells are skipped.
pub fn read_csv(path: &Path) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV record {}", idx + 1))?;

        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        let cells: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(i, header)| {
                (
                    header.clone(),
                    record.get(i).unwrap_or_default().to_string(),
                )
            })
            .collect();

        rows.push(Row::new(line, cells));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("users.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_csv_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            b"First Name,Last Name,Email,Mobile\n\
              Asha,Rao,asha@corp.in,9876543210\n\
              Vikram,Shah,,9123456780\n",
        );

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].get("First Name"), Some("Asha"));
        assert_eq!(rows[0].get("Mobile"), Some("9876543210"));

        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].get("Last Name"), Some("Shah"));
        assert_eq!(rows[1].get("Email"), Some(""));
        assert_eq!(rows[1].get("Gender"), None);
    }

    #[test]
    fn test_read_csv_pads_short_records_and_skips_blank_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            b"First Name,Last Name,Department\n\
              Asha\n\
              ,,\n\
              Vikram,Shah,Finance\n",
        );

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Last Name"), Some(""));
        assert_eq!(rows[0].get("Department"), Some(""));
        assert_eq!(rows[1].get("Department"), Some("Finance"));
        assert_eq!(rows[1].line, 4);
    }

    #[test]
    fn test_read_csv_header_only_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, b"First Name,Last Name,Email\n");

        assert!(read_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_csv_empty_file_has_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, b"");

        assert!(read_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_csv_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, b"First Name,Last Name\n\xff\xfe,Rao\n");

        assert!(read_csv(&path).is_err());
    }
}
