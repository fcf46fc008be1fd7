//! Output tables and CSV persistence.
//!
//! Layout: `{output_root}/{endpoint}/{MM_DD_YYYY_HH_MM}_to_{MM_DD_YYYY_HH_MM}.csv`
//!
//! Writes are atomic: the table goes to a `.tmp` sibling which is renamed into
//! place only after a successful flush, so a failed run never leaves a partial
//! CSV behind.

use super::feed::{Feed, FeedRecord};
use super::provider::FetchError;
use super::range::{format_timestamp, DateRange};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered, header-prefixed rows of one feed.
#[derive(Debug, Clone)]
pub struct OutputTable<R: FeedRecord> {
    records: Vec<R>,
}

impl<R: FeedRecord> OutputTable<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn feed(&self) -> Feed {
        R::FEED
    }

    pub fn header(&self) -> &'static [&'static str] {
        R::FEED.header()
    }

    /// Append a batch, keeping its order.
    pub fn extend(&mut self, batch: Vec<R>) {
        self.records.extend(batch);
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: FeedRecord> Default for OutputTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// File name for a run: timestamps with `/`, `:` and spaces replaced by `_`.
pub fn output_file_name(range: &DateRange) -> String {
    format!(
        "{}_to_{}.csv",
        sanitize(&format_timestamp(&range.start())),
        sanitize(&format_timestamp(&range.end()))
    )
}

/// Destination for a feed run under `output_root`.
pub fn output_path(output_root: &Path, feed: Feed, range: &DateRange) -> PathBuf {
    output_root
        .join(feed.endpoint())
        .join(output_file_name(range))
}

fn sanitize(ts: &str) -> String {
    ts.replace(['/', ':', ' '], "_")
}

/// Render a table as CSV bytes.
pub fn render_csv<R: FeedRecord>(table: &OutputTable<R>) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(table.header())?;
    for record in table.records() {
        wtr.write_record(record.to_row())?;
    }
    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write a table to `path`, creating parent directories as needed.
pub fn write_table<R: FeedRecord>(table: &OutputTable<R>, path: &Path) -> Result<(), FetchError> {
    let write_err = |source: std::io::Error| FetchError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let data = render_csv(table).map_err(|e| write_err(e.into()))?;

    let tmp_path = path.with_extension("csv.tmp");
    if let Err(e) = fs::write(&tmp_path, &data).and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    tracing::debug!(path = %path.display(), rows = table.len(), "table written");
    Ok(())
}
