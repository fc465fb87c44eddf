use std::collections::BTreeMap;

use ldiff_types::OperationKind;
use serde::{Deserialize, Serialize};

/// Accumulated information about one DN within a single file.
///
/// Created on the first record that touches the DN and updated by every
/// later record for the same DN.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    pub dn: String,
    /// Every operation applied to this DN, in file order. Repeats are kept.
    pub operation_types: Vec<OperationKind>,
    /// Sum of all attribute values ever recorded for this DN.
    pub total_attribute_count: usize,
    /// Attribute name to accumulated value count.
    pub attributes: BTreeMap<String, usize>,
}

impl EntryInfo {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Default::default()
        }
    }

    /// Append an operation to the history.
    pub fn push_operation(&mut self, kind: OperationKind) {
        self.operation_types.push(kind);
    }

    /// Fold `count` values of `name` into the entry.
    ///
    /// A zero count still registers the attribute name.
    pub fn add_values(&mut self, name: &str, count: usize) {
        *self.attributes.entry(name.to_string()).or_insert(0) += count;
        self.total_attribute_count += count;
    }

    /// Operation labels in order, e.g. `["Add", "Modify"]`.
    pub fn operation_labels(&self) -> Vec<&'static str> {
        self.operation_types.iter().map(OperationKind::label).collect()
    }
}
