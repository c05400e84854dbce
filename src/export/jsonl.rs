//! JSONL export of raw record bags.
//!
//! Each line is a complete JSON object: the hostname, its optional label and
//! the bag under `dns`, using the storage keys of [`RawDnsBag`].

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use super::types::BagRecord;
use crate::dns::RawDnsBag;

/// Appends bag records to a JSON Lines sink.
pub struct BagWriter<W: Write> {
    inner: W,
    written: usize,
}

impl BagWriter<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open bags file: {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BagWriter<W> {
    /// Wraps any writer.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Writes one line for `hostname`.
    pub fn write(&mut self, hostname: &str, label: Option<&str>, bag: &RawDnsBag) -> Result<()> {
        let record = BagRecord {
            hostname: hostname.to_string(),
            label: label.map(str::to_string),
            dns: bag.clone(),
        };
        serde_json::to_writer(&mut self.inner, &record)
            .with_context(|| format!("Failed to serialize bag for {hostname}"))?;
        self.inner
            .write_all(b"\n")
            .context("Failed to write bags file")?;
        self.written += 1;
        Ok(())
    }

    /// Lines written by this writer.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes buffered lines.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().context("Failed to flush bags file")
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[derive(Deserialize)]
struct HostnameOnly {
    hostname: String,
}

/// Hostnames already present in a bags file.
///
/// A missing file yields an empty set. Lines that do not parse are skipped
/// with a warning, so a line cut short by an interrupted run does not block
/// resuming.
pub fn existing_hostnames(path: &Path) -> Result<HashSet<String>> {
    let mut hostnames = HashSet::new();
    if !path.exists() {
        return Ok(hostnames);
    }

    let file =
        File::open(path).with_context(|| format!("Failed to open bags file: {}", path.display()))?;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<HostnameOnly>(&line) {
            Ok(record) => {
                hostnames.insert(record.hostname);
            }
            Err(e) => warn!(
                "Skipping unreadable line {} of {}: {e}",
                index + 1,
                path.display()
            ),
        }
    }
    Ok(hostnames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::ResourceRecord;
    use tempfile::TempDir;

    #[test]
    fn test_write_one_line_per_bag() {
        let mut bag = RawDnsBag::new();
        bag.a_records.push(ResourceRecord::with_ip("93.184.216.34", 300));

        let mut writer = BagWriter::new(Vec::new());
        writer.write("example.com", Some("benign"), &bag).unwrap();
        writer.write("example.org", None, &RawDnsBag::new()).unwrap();
        assert_eq!(writer.written(), 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["hostname"], "example.com");
        assert_eq!(first["label"], "benign");
        assert_eq!(first["dns"]["a_record_parsed"][0]["ip"], "93.184.216.34");
        assert_eq!(first["dns"]["ptr_record_raw"], "None");

        let second: BagRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.label, None);
        assert_eq!(second.dns, RawDnsBag::new());
    }

    #[test]
    fn test_existing_hostnames_missing_file() {
        let dir = TempDir::new().unwrap();
        let hostnames = existing_hostnames(&dir.path().join("absent.jsonl")).unwrap();
        assert!(hostnames.is_empty());
    }

    #[test]
    fn test_existing_hostnames_after_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bags.jsonl");

        let mut writer = BagWriter::append_to(&path).unwrap();
        writer.write("example.com", None, &RawDnsBag::new()).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut writer = BagWriter::append_to(&path).unwrap();
        writer.write("example.net", None, &RawDnsBag::new()).unwrap();
        writer.flush().unwrap();
        drop(writer);

        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"{\"hostname\": \"trunc")
            .unwrap();

        let hostnames = existing_hostnames(&path).unwrap();
        assert_eq!(hostnames.len(), 2);
        assert!(hostnames.contains("example.com"));
        assert!(hostnames.contains("example.net"));
    }
}
