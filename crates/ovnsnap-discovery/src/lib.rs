//! Discovery and classification of gathered OVN database files.
//!
//! A gathered snapshot is a flat directory of OVSDB files. This crate:
//! - reads the OVSDB on-disk record format (`ovsdb`)
//! - decides which database a file holds (`probe`)
//! - extracts the originating hostname from the global config row (`hostname`)
//! - turns a directory into an ordered `Fleet` (`scan`)

pub mod error;
pub mod hostname;
pub mod ovsdb;
pub mod probe;
pub mod scan;

pub use error::{Error, Result};
pub use hostname::{extract_hostname, hostname_from_records};
pub use ovsdb::{OvsdbRecord, RecordReader};
pub use probe::{DatabaseProbe, OvsdbProbe, ProbeResult, ProbeSource, role_from_file_name};
pub use scan::{Discovery, SkippedFile, classify, discover};
