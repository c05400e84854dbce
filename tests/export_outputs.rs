//! Tests for the bag and feature output files.

use domain_signals::export::{existing_hostnames, BagWriter, FeatureWriter, OutputPaths};
use domain_signals::{reduce, RawDnsBag, ResourceRecord};
use tempfile::TempDir;

#[test]
fn test_outputs_line_up_per_hostname() {
    let dir = TempDir::new().unwrap();
    let paths = OutputPaths::in_dir(dir.path());
    assert!(paths.bags.ends_with("dns_raw.jsonl"));
    assert!(paths.features.ends_with("dns_features.csv"));

    let mut bag = RawDnsBag::new();
    bag.a_records.push(ResourceRecord::with_ip("198.51.100.7", 600));
    bag.ns_records.push(ResourceRecord::with_addr("ns1.example.net.", 3600));

    {
        let mut bags = BagWriter::append_to(&paths.bags).unwrap();
        let mut features = FeatureWriter::append_to(&paths.features).unwrap();
        for (hostname, label) in [("example.net", Some("benign")), ("example.org", None)] {
            bags.write(hostname, label, &bag).unwrap();
            features
                .write(hostname, label, &reduce(hostname, &bag))
                .unwrap();
        }
        bags.flush().unwrap();
        features.flush().unwrap();
    }

    let hostnames = existing_hostnames(&paths.bags).unwrap();
    assert_eq!(hostnames.len(), 2);

    let mut reader = csv::Reader::from_path(&paths.features).unwrap();
    let headers = reader.headers().unwrap().clone();
    let ratio_column = headers
        .iter()
        .position(|h| h == "ip_to_nameserver_ratio")
        .unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "example.net");
    assert_eq!(&rows[0][ratio_column], "1.000");
    assert_eq!(&rows[0][headers.len() - 1], "benign");
    assert_eq!(&rows[1][headers.len() - 1], "");
}
