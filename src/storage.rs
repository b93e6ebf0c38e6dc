// CSV persistence shared by the traffic and sustainability stores.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::{AnalyticsError, Result};

/// Append one record to a CSV file, writing the header row only when the
/// file is new or empty.
pub fn append_csv<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let needs_header = std::fs::metadata(path)
        .map(|m| m.len() == 0)
        .unwrap_or(true);
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

/// Read every record of a CSV file. A missing file is `DataUnavailable`.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(AnalyticsError::DataUnavailable(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Read every record that deserializes, skipping and logging the rest.
/// Returns the records and the number of rows skipped.
pub fn read_csv_lenient<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize)> {
    if !path.exists() {
        return Err(AnalyticsError::DataUnavailable(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    let mut skipped = 0;
    for result in rdr.deserialize() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!("Skipping unreadable row in {}: {}", path.display(), e);
                skipped += 1;
            }
        }
    }
    Ok((records, skipped))
}

/// Overwrite a CSV file with the given records.
pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
