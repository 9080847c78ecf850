use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::role::{Role, StorageFormat};

/// One discovered database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseRecord {
    /// Position in discovery order; stable helper-script index
    pub index: usize,
    pub path: PathBuf,
    pub role: Role,
    pub hostname: String,
    pub format: StorageFormat,
    pub container_name: String,
}

impl DatabaseRecord {
    pub fn new(
        index: usize,
        path: PathBuf,
        role: Role,
        hostname: String,
        format: StorageFormat,
        prefix: &str,
    ) -> Self {
        let container_name = container_name(prefix, role, &hostname);
        Self {
            index,
            path,
            role,
            hostname,
            format,
            container_name,
        }
    }
}

/// Deterministic container name: `{prefix}_{nb|sb}_{hostname}`.
pub fn container_name(prefix: &str, role: Role, hostname: &str) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        role.tag(),
        sanitize_name_component(hostname)
    )
}

/// Replace characters container engines reject in names.
pub fn sanitize_name_component(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

/// Ordered set of records for one invocation.
///
/// Built once by discovery and never mutated; downstream steps receive it by
/// reference. Container names are unique within a fleet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fleet {
    records: Vec<DatabaseRecord>,
}

impl Fleet {
    pub fn from_records(records: Vec<DatabaseRecord>) -> Result<Self> {
        let mut seen: HashMap<&str, &DatabaseRecord> = HashMap::new();
        for record in &records {
            if let Some(previous) = seen.insert(record.container_name.as_str(), record) {
                return Err(Error::DuplicateContainer {
                    name: record.container_name.clone(),
                    first: previous.path.clone(),
                    second: record.path.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DatabaseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatabaseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record with the given discovery index.
    pub fn get(&self, index: usize) -> Option<&DatabaseRecord> {
        self.records.iter().find(|r| r.index == index)
    }

    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &DatabaseRecord> {
        self.records.iter().filter(move |r| r.role == role)
    }

    /// A new fleet holding the records accepted by `keep`.
    ///
    /// Discovery indices are preserved, so the result may be sparse.
    pub fn subset<F>(&self, mut keep: F) -> Fleet
    where
        F: FnMut(&DatabaseRecord) -> bool,
    {
        Fleet {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a DatabaseRecord;
    type IntoIter = std::slice::Iter<'a, DatabaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, role: Role, host: &str) -> DatabaseRecord {
        DatabaseRecord::new(
            index,
            PathBuf::from(format!("/snap/{}_{}.db", role.tag(), index)),
            role,
            host.to_string(),
            StorageFormat::Standalone,
            "ovndb",
        )
    }

    #[test]
    fn test_container_name_is_deterministic() {
        let a = container_name("ovndb", Role::Northbound, "worker-1");
        let b = container_name("ovndb", Role::Northbound, "worker-1");
        assert_eq!(a, "ovndb_nb_worker-1");
        assert_eq!(a, b);
        assert_eq!(
            container_name("ovndb", Role::Southbound, "worker-1"),
            "ovndb_sb_worker-1"
        );
    }

    #[test]
    fn test_sanitize_replaces_invalid_characters() {
        assert_eq!(sanitize_name_component("node a/b:c"), "node_a_b_c");
        assert_eq!(sanitize_name_component("ip-10-0-1-2.ec2"), "ip-10-0-1-2.ec2");
        assert_eq!(sanitize_name_component(""), "_");
    }

    #[test]
    fn test_fleet_rejects_duplicate_container_names() {
        let err = Fleet::from_records(vec![
            record(0, Role::Northbound, "worker-1"),
            record(1, Role::Northbound, "worker-1"),
        ])
        .unwrap_err();

        match err {
            Error::DuplicateContainer { name, .. } => assert_eq!(name, "ovndb_nb_worker-1"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_fleet_by_role_and_subset_keep_indices() {
        let fleet = Fleet::from_records(vec![
            record(0, Role::Northbound, "worker-1"),
            record(1, Role::Southbound, "worker-1"),
            record(2, Role::Northbound, "worker-2"),
        ])
        .unwrap();

        let north: Vec<usize> = fleet.by_role(Role::Northbound).map(|r| r.index).collect();
        assert_eq!(north, vec![0, 2]);

        let subset = fleet.subset(|r| r.index != 1);
        assert_eq!(subset.len(), 2);
        assert!(subset.get(1).is_none());
        assert_eq!(subset.get(2).unwrap().hostname, "worker-2");
    }
}
