//! Record loader
//!
//! Reads the four CSV source tables into [`RawRow`]s. Cells are trimmed and
//! empty cells are dropped, so a missing column and a blank value look the
//! same to the merger. A missing file is an empty table.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use propchat_config::DataConfig;

use crate::DatasetError;

/// One source row: column name to non-empty, trimmed value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from (column, value) pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new();
        for (key, value) in pairs {
            row.insert(key, value.as_ref());
        }
        row
    }

    /// Insert a cell; blank values are ignored
    pub fn insert(&mut self, column: impl Into<String>, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.fields.insert(column.into(), value.to_string());
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The four source tables, rows in file order
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub projects: Vec<RawRow>,
    pub addresses: Vec<RawRow>,
    pub configurations: Vec<RawRow>,
    pub variants: Vec<RawRow>,
    /// Source files that did not exist
    pub missing: Vec<PathBuf>,
}

impl SourceTables {
    /// Load every table named in `config`
    pub fn load(config: &DataConfig) -> Result<Self, DatasetError> {
        let mut tables = Self::default();

        tables.projects = tables.read(&config.source_path(&config.projects_file))?;
        tables.addresses = tables.read(&config.source_path(&config.addresses_file))?;
        tables.configurations = tables.read(&config.source_path(&config.configurations_file))?;
        tables.variants = tables.read(&config.source_path(&config.variants_file))?;

        tracing::info!(
            projects = tables.projects.len(),
            addresses = tables.addresses.len(),
            configurations = tables.configurations.len(),
            variants = tables.variants.len(),
            missing = tables.missing.len(),
            "Source tables loaded"
        );

        Ok(tables)
    }

    fn read(&mut self, path: &Path) -> Result<Vec<RawRow>, DatasetError> {
        match read_table(path)? {
            Some(rows) => Ok(rows),
            None => {
                tracing::warn!(path = %path.display(), "Source file missing, treating as empty");
                self.missing.push(path.to_path_buf());
                Ok(Vec::new())
            }
        }
    }
}

/// Read one CSV file with a header row, `None` if the file does not exist
///
/// Rows the CSV reader cannot decode are skipped with a warning.
pub fn read_table(path: &Path) -> Result<Option<Vec<RawRow>>, DatasetError> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DatasetError::Csv {
            path: path.display().to_string(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable row");
                continue;
            }
        };

        let row = RawRow::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.clone(), value)),
        );
        if !row.is_empty() {
            rows.push(row);
        }
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), skipped, "Table read");

    Ok(Some(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_raw_row_trims_and_drops_blanks() {
        let row = RawRow::from_pairs([("id", "  p1 "), ("slug", "   "), ("status", "")]);
        assert_eq!(row.get("id"), Some("p1"));
        assert_eq!(row.get("slug"), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_read_table_quoted_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variants.csv");
        fs::write(
            &path,
            "id,configurationId,propertyImages\n\
             v1,c1,\"[\"\"https://img.example/a.jpg\"\"]\"\n\
             v2,c1,\n",
        )
        .unwrap();

        let rows = read_table(&path).unwrap().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("propertyImages"), Some("[\"https://img.example/a.jpg\"]"));
        assert_eq!(rows[1].get("propertyImages"), None);
    }

    #[test]
    fn test_read_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_table(&dir.path().join("nope.csv")).unwrap().is_none());
    }

    #[test]
    fn test_source_tables_records_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("project.csv"), "id,projectName\np1,Sunrise Heights\n").unwrap();

        let tables = SourceTables::load(&DataConfig::in_dir(dir.path())).unwrap();
        assert_eq!(tables.projects.len(), 1);
        assert!(tables.configurations.is_empty());
        assert_eq!(tables.missing.len(), 3);
    }
}
