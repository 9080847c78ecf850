//! Streaming reader for the OVSDB on-disk log format.
//!
//! A file is a sequence of records, each a text header
//! `OVSDB <JSON|CLUSTER> <length> <sha1>\n` followed by `length` bytes of
//! JSON (newline included). Standalone files use `JSON`, clustered files
//! use `CLUSTER`.

use ovnsnap_types::StorageFormat;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const MAGIC: &str = "OVSDB";
const MAX_HEADER_LEN: u64 = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct OvsdbRecord {
    pub format: StorageFormat,
    pub value: Value,
}

/// Iterator over the records of an OVSDB file.
///
/// Yields `InvalidData` errors for malformed headers or bodies and stops
/// after the first error.
pub struct RecordReader<R> {
    inner: R,
    done: bool,
}

impl RecordReader<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    fn read_header(&mut self) -> io::Result<Option<(StorageFormat, u64)>> {
        let mut line = Vec::new();
        let n = (&mut self.inner)
            .take(MAX_HEADER_LEN)
            .read_until(b'\n', &mut line)?;
        if n == 0 {
            return Ok(None);
        }
        if line.last() != Some(&b'\n') {
            return Err(invalid("record header is truncated or too long"));
        }

        let header =
            std::str::from_utf8(&line).map_err(|_| invalid("record header is not UTF-8"))?;
        let mut parts = header.split_whitespace();

        if parts.next() != Some(MAGIC) {
            return Err(invalid("missing OVSDB magic"));
        }

        let format = match parts.next() {
            Some("JSON") => StorageFormat::Standalone,
            Some("CLUSTER") => StorageFormat::Clustered,
            other => {
                return Err(invalid(format!("unknown record kind {:?}", other)));
            }
        };

        let length = parts
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| invalid("missing record length"))?;

        Ok(Some((format, length)))
    }

    fn read_record(&mut self) -> io::Result<Option<OvsdbRecord>> {
        let Some((format, length)) = self.read_header()? else {
            return Ok(None);
        };

        let mut body = Vec::new();
        (&mut self.inner).take(length).read_to_end(&mut body)?;
        if (body.len() as u64) != length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("record body truncated ({} of {} bytes)", body.len(), length),
            ));
        }
        self.skip_newlines()?;

        let value = serde_json::from_slice(&body)
            .map_err(|e| invalid(format!("record body is not JSON: {}", e)))?;

        Ok(Some(OvsdbRecord { format, value }))
    }

    fn skip_newlines(&mut self) -> io::Result<()> {
        loop {
            let buf = self.inner.fill_buf()?;
            match buf.first() {
                Some(b'\n') | Some(b'\r') => self.inner.consume(1),
                _ => return Ok(()),
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = io::Result<OvsdbRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Read only the first record of a file.
pub fn read_first_record(path: &Path) -> io::Result<OvsdbRecord> {
    RecordReader::open(path)?
        .next()
        .unwrap_or_else(|| Err(invalid("file is empty")))
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}
