use crate::prelude::{RepeaterError, RepeaterResult};
use crate::record::RepeaterRecord;
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Ordered, append-only collection of repeater records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    records: Vec<RepeaterRecord>,
}

impl Registry {
    /// Parses a JSON array of records. Text that is not a JSON array of
    /// objects is fatal so that no output is produced from a partially
    /// loaded registry; an unusable field only affects its own record.
    pub fn from_json(text: &str) -> RepeaterResult<Self> {
        let entries: Vec<Value> = serde_json::from_str(text)
            .map_err(|err| RepeaterError::RegistryCorruption(err.to_string()))?;
        let records = entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                RepeaterRecord::from_value(entry).map_err(|err| match err {
                    RepeaterError::RegistryCorruption(reason) => {
                        RepeaterError::RegistryCorruption(format!("entry {}: {}", idx, reason))
                    }
                    other => other,
                })
            })
            .collect::<RepeaterResult<Vec<_>>>()?;
        Ok(Self { records })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RepeaterResult<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)?;
        let registry = Self::from_json(&contents).map_err(|err| match err {
            RepeaterError::RegistryCorruption(reason) => {
                RepeaterError::RegistryCorruption(format!("{}: {}", path_ref.display(), reason))
            }
            other => other,
        })?;
        info!(
            "loaded {} repeaters from {}",
            registry.len(),
            path_ref.display()
        );
        Ok(registry)
    }

    pub fn append(&mut self, record: RepeaterRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RepeaterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct, non-empty group names.
    pub fn group_count(&self) -> usize {
        self.records
            .iter()
            .filter_map(|record| record.group_name.as_deref())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Serializes the whole registry as a 4-space indented JSON array.
    pub fn to_json_pretty(&self) -> RepeaterResult<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.records
            .serialize(&mut serializer)
            .map_err(|err| RepeaterError::RegistryCorruption(err.to_string()))?;
        buffer.push(b'\n');
        String::from_utf8(buffer).map_err(|err| RepeaterError::RegistryCorruption(err.to_string()))
    }
}
