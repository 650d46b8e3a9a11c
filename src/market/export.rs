// src/market/export.rs
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::market::table::ReturnsTable;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Writes `returns` as tab-separated text to `dir/file_name`, creating
/// `dir` if needed. Returns the written path.
pub fn write_tsv(returns: &ReturnsTable, dir: &Path, file_name: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir { path: dir.to_path_buf(), source })?;

    let path = dir.join(file_name);
    let wrap = |source| ExportError::Write { path: path.clone(), source };

    let file = File::create(&path).map_err(wrap)?;
    let mut w = BufWriter::new(file);
    write_rows(returns, &mut w).map_err(wrap)?;
    w.flush().map_err(wrap)?;

    info!(path = %path.display(), rows = returns.rows.len(), "returns exported");
    Ok(path)
}

fn write_rows(returns: &ReturnsTable, w: &mut impl Write) -> io::Result<()> {
    write!(w, "Date")?;
    for t in &returns.tickers {
        write!(w, "\t{t}")?;
    }
    writeln!(w)?;

    for (period, row) in returns.periods.iter().zip(&returns.rows) {
        write!(w, "{period}")?;
        for v in row {
            write!(w, "\t{v}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn writes_header_and_rows_into_new_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("data-out");
        let returns = ReturnsTable {
            periods: vec![date!(2024 - 02 - 29), date!(2024 - 03 - 31)],
            tickers: vec!["AAA".into(), "BBB".into()],
            rows: vec![vec![0.5, -0.25], vec![0.125, 0.0]],
        };

        let path = write_tsv(&returns, &out_dir, "r.tsv").unwrap();
        assert_eq!(path, out_dir.join("r.tsv"));
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "Date\tAAA\tBBB\n2024-02-29\t0.5\t-0.25\n2024-03-31\t0.125\t0\n");
    }
}
