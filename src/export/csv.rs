//! CSV export of feature vectors.
//!
//! One row per hostname: `hostname`, the features in schema order, `label`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;

use crate::features::{DnsFeatures, DNS_FEATURE_NAMES};

/// Column names of the features file.
pub fn feature_header() -> Vec<&'static str> {
    let mut header = Vec::with_capacity(DNS_FEATURE_NAMES.len() + 2);
    header.push("hostname");
    header.extend(DNS_FEATURE_NAMES);
    header.push("label");
    header
}

/// Writes feature rows under the fixed header.
pub struct FeatureWriter<W: Write> {
    inner: Writer<W>,
    written: usize,
}

impl FeatureWriter<File> {
    /// Opens `path` for appending. The header is written only when the file
    /// is new or empty.
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open features file: {}", path.display()))?;
        let is_empty = file
            .metadata()
            .with_context(|| format!("Failed to stat features file: {}", path.display()))?
            .len()
            == 0;
        if is_empty {
            Self::with_header(file)
        } else {
            Ok(Self {
                inner: Writer::from_writer(file),
                written: 0,
            })
        }
    }
}

impl<W: Write> FeatureWriter<W> {
    /// Wraps `inner` and writes the header row.
    pub fn with_header(inner: W) -> Result<Self> {
        let mut inner = Writer::from_writer(inner);
        inner
            .write_record(feature_header())
            .context("Failed to write CSV header")?;
        Ok(Self { inner, written: 0 })
    }

    /// Writes the row of one hostname. A missing label is an empty cell.
    pub fn write(
        &mut self,
        hostname: &str,
        label: Option<&str>,
        features: &DnsFeatures,
    ) -> Result<()> {
        let mut row = Vec::with_capacity(DNS_FEATURE_NAMES.len() + 2);
        row.push(hostname.to_string());
        row.extend(features.iter().map(|(_, value)| value.to_string()));
        row.push(label.unwrap_or_default().to_string());
        self.inner
            .write_record(&row)
            .with_context(|| format!("Failed to write CSV row for {hostname}"))?;
        self.written += 1;
        Ok(())
    }

    /// Rows written by this writer, header excluded.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes buffered rows.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().context("Failed to flush features file")
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {}", e.error()))
    }
}
