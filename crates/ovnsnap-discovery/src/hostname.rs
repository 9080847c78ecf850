use ovnsnap_types::Role;
use serde_json::Value;
use std::borrow::Borrow;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ovsdb::RecordReader;

const NAME_OPTION: &str = "name";

/// Read the originating hostname from the `name` option of the role's
/// global configuration row.
///
/// Records are streamed one at a time and the last value written wins. A
/// malformed tail is tolerated; a file with no value at all is an error.
pub fn extract_hostname(path: &Path, role: Role) -> Result<String> {
    let mut hostname = None;
    let mut seen = 0usize;

    for record in RecordReader::open(path)? {
        match record {
            Ok(record) => {
                if let Some(name) = hostname_in_record(&record.value, seen == 0, role) {
                    hostname = Some(name);
                }
                seen += 1;
            }
            Err(err) if seen == 0 => {
                return Err(Error::NotOvsdb {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "stopping at malformed record");
                break;
            }
        }
    }

    hostname
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::HostnameNotFound {
            path: path.to_path_buf(),
            role,
        })
}

/// Hostname from already-parsed records; the first record is the schema
/// (standalone) or the cluster header (clustered).
pub fn hostname_from_records<I>(records: I, role: Role) -> Option<String>
where
    I: IntoIterator,
    I::Item: Borrow<Value>,
{
    let mut hostname = None;
    for (position, record) in records.into_iter().enumerate() {
        if let Some(name) = hostname_in_record(record.borrow(), position == 0, role) {
            hostname = Some(name);
        }
    }
    hostname.filter(|name| !name.is_empty())
}

/// Last `name` option written by one record, if any.
fn hostname_in_record(record: &Value, is_first: bool, role: Role) -> Option<String> {
    let table = role.spec().global_table;
    let mut hostname = None;

    for txn in transactions(record, is_first) {
        let Some(rows) = txn.get(table).and_then(Value::as_object) else {
            continue;
        };
        for row in rows.values() {
            if let Some(name) = row
                .get("options")
                .and_then(|options| map_lookup(options, NAME_OPTION))
            {
                hostname = Some(name.to_string());
            }
        }
    }
    hostname
}

/// Transaction objects carried by one record.
///
/// Clustered files keep data in `[schema, txn]` pairs under `prev_data`
/// (header snapshot) and `data` (log entries). Standalone records after the
/// schema are transactions themselves.
fn transactions(record: &Value, is_first: bool) -> Vec<&Value> {
    let mut found = Vec::new();
    let mut clustered = false;

    for key in ["prev_data", "data"] {
        if let Some(pair) = record.get(key).and_then(Value::as_array) {
            clustered = true;
            if let Some(txn) = pair.get(1).filter(|v| v.is_object()) {
                found.push(txn);
            }
        }
    }

    if !clustered && !is_first && record.is_object() {
        found.push(record);
    }
    found
}

/// Look up a string key in an OVSDB map value: `["map", [[key, value], ...]]`.
fn map_lookup<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    let pairs = match value.as_array()?.as_slice() {
        [tag, pairs] if tag == "map" => pairs.as_array()?,
        _ => return None,
    };

    pairs.iter().rev().find_map(|pair| match pair.as_array()?.as_slice() {
        [k, v] if k == key => v.as_str(),
        _ => None,
    })
}
