//! CSV persistence of the clean dataset

use chrono::Local;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::domain::listing::{CleanRecord, OUTPUT_COLUMNS};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to prepare output path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Default file name, stamped with the local time of the export
pub fn default_filename() -> String {
    format!("warsaw_apartments_{}.csv", Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes a header row plus one row per record; missing values stay empty
pub fn write_csv<W: Write>(records: &[CleanRecord], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Saves `records` under `folder`, creating it if needed, and returns the file path
pub fn save_to_csv(
    records: &[CleanRecord],
    folder: &Path,
    filename: Option<&str>,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(folder).map_err(|source| ExportError::Io {
        path: folder.to_path_buf(),
        source,
    })?;

    let path = folder.join(filename.map_or_else(default_filename, str::to_string));
    let file = File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    write_csv(records, file)?;
    info!("Saved: {}", path.display());
    Ok(path)
}
