use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::EntryInfo;

/// Finished statistics for one LDIF file.
///
/// Built by [`StatsAggregator`](crate::StatsAggregator). DN keys are
/// case-sensitive and iterate in ascending byte order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of records processed, of any kind.
    pub total_entries: usize,
    pub total_add_operations: usize,
    pub total_delete_operations: usize,
    pub total_modify_operations: usize,
    pub total_mod_dn_operations: usize,
    /// Attribute values carried by add and modify records.
    pub total_attributes: usize,
    /// File-wide attribute name to value count.
    pub attribute_counts: BTreeMap<String, usize>,
    pub entries: BTreeMap<String, EntryInfo>,
}

impl Stats {
    /// `total_attributes / total_entries`, or 0 for an empty file.
    pub fn average_attributes_per_entry(&self) -> f64 {
        if self.total_entries == 0 {
            0.0
        } else {
            self.total_attributes as f64 / self.total_entries as f64
        }
    }

    pub fn unique_attribute_types(&self) -> usize {
        self.attribute_counts.len()
    }

    pub fn entry(&self, dn: &str) -> Option<&EntryInfo> {
        self.entries.get(dn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_average_is_zero() {
        assert_eq!(Stats::default().average_attributes_per_entry(), 0.0);
    }

    #[test]
    fn average() {
        let stats = Stats {
            total_entries: 4,
            total_attributes: 10,
            ..Default::default()
        };
        assert_eq!(stats.average_attributes_per_entry(), 2.5);
    }
}
