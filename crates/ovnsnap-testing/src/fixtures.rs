//! OVSDB file fixtures.
//!
//! Writes small but structurally real database files: a schema (standalone)
//! or cluster header (clustered) first record, followed by transactions
//! carrying the role's global row.

use anyhow::Result;
use ovnsnap_types::{Role, StorageFormat};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Builder for one database file.
#[derive(Debug, Clone)]
pub struct OvsdbFixture {
    role: Role,
    format: StorageFormat,
    hostname: Option<String>,
    schema_name: Option<String>,
}

impl OvsdbFixture {
    pub fn new(role: Role, format: StorageFormat) -> Self {
        Self {
            role,
            format,
            hostname: None,
            schema_name: Some(role.spec().schema_name.to_string()),
        }
    }

    pub fn nb() -> Self {
        Self::new(Role::Northbound, StorageFormat::Standalone)
    }

    pub fn sb() -> Self {
        Self::new(Role::Southbound, StorageFormat::Standalone)
    }

    pub fn clustered(mut self) -> Self {
        self.format = StorageFormat::Clustered;
        self
    }

    pub fn hostname(mut self, hostname: &str) -> Self {
        self.hostname = Some(hostname.to_string());
        self
    }

    /// Drop the schema name so only the file name can classify it.
    pub fn anonymous(mut self) -> Self {
        self.schema_name = None;
        self
    }

    pub fn schema_name(mut self, name: &str) -> Self {
        self.schema_name = Some(name.to_string());
        self
    }

    fn global_txn(&self, hostname: &str) -> Value {
        let mut txn = serde_json::Map::new();
        txn.insert(
            self.role.spec().global_table.to_string(),
            json!({
                "0b1c2d3e-0000-4000-8000-000000000001": {
                    "options": ["map", [["mac_prefix", "0a:58:0a"], ["name", hostname]]]
                }
            }),
        );
        txn.insert("_date".to_string(), json!(1_700_000_000_000u64));
        Value::Object(txn)
    }

    fn schema(&self) -> Value {
        let mut schema = json!({"version": "7.0.0", "tables": {}});
        if let Some(name) = &self.schema_name {
            schema["name"] = json!(name);
        }
        schema
    }

    fn records(&self) -> Vec<(&'static str, Value)> {
        match self.format {
            StorageFormat::Standalone => {
                let mut records = vec![("JSON", self.schema())];
                records.push(("JSON", json!({"Connection": {}, "_comment": "ovsdb-server"})));
                if let Some(hostname) = &self.hostname {
                    records.push(("JSON", self.global_txn(hostname)));
                }
                records
            }
            StorageFormat::Clustered => {
                let mut header = json!({
                    "server_id": "5f8e3c0a-0000-4000-8000-00000000000a",
                    "local_address": "ssl:10.0.0.1:6643",
                    "cluster_id": "1d5c2b7e-0000-4000-8000-00000000000b",
                });
                if let Some(name) = &self.schema_name {
                    header["name"] = json!(name);
                }
                let mut records = vec![("CLUSTER", header)];
                if let Some(hostname) = &self.hostname {
                    records.push((
                        "CLUSTER",
                        json!({"term": 1, "index": 2, "data": [self.schema(), self.global_txn(hostname)]}),
                    ));
                }
                records
            }
        }
    }

    /// Serialized file content.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (kind, value) in self.records() {
            out.extend_from_slice(&frame(kind, &value.to_string()));
        }
        out
    }

    pub fn write(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        let path = dir.join(file_name);
        std::fs::write(&path, self.to_bytes())?;
        Ok(path)
    }
}

/// One OVSDB record: header line plus body; the length covers the body's
/// trailing newline.
pub fn frame(kind: &str, json: &str) -> Vec<u8> {
    format!(
        "OVSDB {} {} 0000000000000000000000000000000000000000\n{}\n",
        kind,
        json.len() + 1,
        json
    )
    .into_bytes()
}

/// Write a file that is not a database.
pub fn write_garbage(dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, "must-gather metadata\nnot a database\n")?;
    Ok(path)
}
