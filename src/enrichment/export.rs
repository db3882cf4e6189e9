//! Persisting an [`EnrichmentTable`] as comma-separated file
//!
//! The file has a header row with the native column names
//! (see [`COLUMNS`](super::COLUMNS)) and no index column.
use std::path::Path;

use tracing::debug;

use crate::enrichment::{Enrichment, EnrichmentTable};
use crate::OraResult;

/// Writes the full table to `path`, replacing any existing file
///
/// # Errors
///
/// Returns [`OraError::Csv`](crate::OraError::Csv) if the file cannot be
/// created or written
pub fn write_csv<P: AsRef<Path>>(table: &EnrichmentTable, path: P) -> OraResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for record in table {
        writer.serialize(record)?;
    }
    writer.flush()?;
    debug!("Wrote {} rows to {}", table.len(), path.as_ref().display());
    Ok(())
}

/// Reads a table that was written by [`write_csv`]
///
/// # Errors
///
/// Returns [`OraError::Csv`](crate::OraError::Csv) if the file cannot be
/// opened or a row does not match the expected columns
pub fn read_csv<P: AsRef<Path>>(path: P) -> OraResult<EnrichmentTable> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut table = EnrichmentTable::default();
    for record in reader.deserialize::<Enrichment>() {
        table.push(record?);
    }
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::enrichment::COLUMNS;

    fn sample() -> EnrichmentTable {
        vec![
            Enrichment::new(
                "mitochondrial electron transport, cytochrome c to oxygen (GO:0006123)",
                0.000_128_7,
                "COX4I2",
            )
            .with_gene_set("GO_Biological_Process_2021")
            .with_overlap("1/13")
            .with_pvalue(0.000_649_9)
            .with_odds_ratio(2_220.555_555_555_6)
            .with_combined_score(16_283.79),
            Enrichment::new("cytochrome-c oxidase activity (GO:0004129)", 0.0421, "")
                .with_gene_set("GO_Molecular_Function_2021")
                .with_overlap("1/22"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn written_file_reads_back_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let table = sample();

        write_csv(&table, &path).unwrap();
        let parsed = read_csv(&path).unwrap();

        assert_eq!(parsed.len(), table.len());
        assert_eq!(parsed, table);
    }

    #[test]
    fn header_and_no_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        write_csv(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), COLUMNS.join(","));
        let first = lines.next().unwrap();
        assert!(first.starts_with("GO_Biological_Process_2021,"));
        // old p-values are absent and the genes column is empty
        assert!(lines.next().unwrap().ends_with(",1.0,0.0421,,,0.0,0.0,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn quoted_terms_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let table: EnrichmentTable = vec![Enrichment::new("a, \"quoted\" term", 0.01, "A;B")]
            .into_iter()
            .collect();
        write_csv(&table, &path).unwrap();
        assert_eq!(read_csv(&path).unwrap(), table);
    }
}
