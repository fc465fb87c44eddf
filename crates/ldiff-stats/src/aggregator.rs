//! Record stream to [`Stats`] fold.

use std::borrow::Borrow;

use ldiff_types::{ChangeRecord, OperationKind};
use tracing::debug;

use crate::entry::EntryInfo;
use crate::stats::Stats;

/// Single-use accumulator for one file's records.
///
/// Feed every record once, then call [`finish`](Self::finish). The
/// aggregator is consumed by `finish`, so a partially built [`Stats`] is
/// never observable and a finished one cannot be folded into again.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: Stats,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the running totals.
    pub fn record(&mut self, record: &ChangeRecord) {
        let stats = &mut self.stats;
        stats.total_entries += 1;

        let kind = record.kind();
        match kind {
            OperationKind::Add => stats.total_add_operations += 1,
            OperationKind::Delete => stats.total_delete_operations += 1,
            OperationKind::Modify => stats.total_modify_operations += 1,
            OperationKind::ModDn => stats.total_mod_dn_operations += 1,
        }

        let entry = stats
            .entries
            .entry(record.dn().to_string())
            .or_insert_with(|| EntryInfo::new(record.dn()));
        entry.push_operation(kind);

        match record {
            ChangeRecord::Add { attributes, .. } => {
                for attr in attributes {
                    fold_values(
                        &mut stats.total_attributes,
                        &mut stats.attribute_counts,
                        entry,
                        &attr.name,
                        attr.value_count(),
                    );
                }
            }
            ChangeRecord::Modify { mod_specs, .. } => {
                for spec in mod_specs {
                    fold_values(
                        &mut stats.total_attributes,
                        &mut stats.attribute_counts,
                        entry,
                        &spec.attribute,
                        spec.value_count(),
                    );
                }
            }
            ChangeRecord::Delete { .. } | ChangeRecord::ModDn { .. } => {}
        }
    }

    /// Number of records folded so far.
    pub fn records_seen(&self) -> usize {
        self.stats.total_entries
    }

    /// Finalize the statistics.
    pub fn finish(self) -> Stats {
        debug!(
            records = self.stats.total_entries,
            entries = self.stats.entries.len(),
            attributes = self.stats.total_attributes,
            "statistics finalized"
        );
        self.stats
    }
}

impl<R: Borrow<ChangeRecord>> Extend<R> for StatsAggregator {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.record(record.borrow());
        }
    }
}

fn fold_values(
    total: &mut usize,
    file_counts: &mut std::collections::BTreeMap<String, usize>,
    entry: &mut EntryInfo,
    name: &str,
    count: usize,
) {
    *total += count;
    *file_counts.entry(name.to_string()).or_insert(0) += count;
    entry.add_values(name, count);
}

/// Aggregate a complete record stream.
pub fn analyze<I>(records: I) -> Stats
where
    I: IntoIterator,
    I::Item: Borrow<ChangeRecord>,
{
    let mut aggregator = StatsAggregator::new();
    aggregator.extend(records);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldiff_types::{Attribute, ModOp, ModSpec};
    use proptest::prelude::*;

    fn test_user_add() -> ChangeRecord {
        ChangeRecord::add(
            "cn=Test User,dc=example,dc=com",
            vec![
                Attribute::new("objectClass", ["person"]),
                Attribute::new("cn", ["Test User"]),
                Attribute::new("sn", ["User"]),
                Attribute::new("mail", ["test@example.com"]),
            ],
        )
    }

    #[test]
    fn empty_stream_yields_empty_stats() {
        let stats = analyze(Vec::<ChangeRecord>::new());
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_add_operations, 0);
        assert_eq!(stats.total_attributes, 0);
        assert!(stats.entries.is_empty());
    }

    #[test]
    fn single_add() {
        let stats = analyze([test_user_add()]);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_add_operations, 1);
        assert_eq!(stats.total_attributes, 4);
        assert_eq!(stats.average_attributes_per_entry(), 4.0);
        assert_eq!(stats.entries.len(), 1);
        assert!(stats.entries.contains_key("cn=Test User,dc=example,dc=com"));
    }

    #[test]
    fn single_modify() {
        let record = ChangeRecord::modify(
            "cn=Test User,dc=example,dc=com",
            vec![
                ModSpec::new(ModOp::Replace, "mail", ["new@example.com"]),
                ModSpec::new(ModOp::Add, "telephoneNumber", ["+1 555 0100"]),
            ],
        );
        let stats = analyze([record]);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_modify_operations, 1);
        assert_eq!(stats.total_attributes, 2);
        assert!(stats.attribute_counts.contains_key("mail"));
        assert!(stats.attribute_counts.contains_key("telephoneNumber"));
    }

    #[test]
    fn delete_creates_entry_without_attributes() {
        let stats = analyze([ChangeRecord::delete("cn=Old,dc=example,dc=com")]);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_delete_operations, 1);
        assert_eq!(stats.total_attributes, 0);
        let entry = &stats.entries["cn=Old,dc=example,dc=com"];
        assert_eq!(entry.operation_types, vec![OperationKind::Delete]);
    }

    #[test]
    fn mod_dn_is_counted_and_labelled() {
        let stats = analyze([ChangeRecord::mod_dn("cn=a,dc=x", "cn=b", None)]);
        assert_eq!(stats.total_mod_dn_operations, 1);
        assert_eq!(stats.entries["cn=a,dc=x"].operation_labels(), vec!["ModDn"]);
    }

    #[test]
    fn multiple_operations_on_same_dn() {
        let dn = "cn=Test User,dc=example,dc=com";
        let records = vec![
            ChangeRecord::add(
                dn,
                vec![Attribute::new("cn", ["Test User"]), Attribute::new("sn", ["User"])],
            ),
            ChangeRecord::modify(dn, vec![ModSpec::new(ModOp::Add, "mail", ["t@example.com"])]),
        ];
        let stats = analyze(&records);

        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_add_operations, 1);
        assert_eq!(stats.total_modify_operations, 1);
        assert_eq!(stats.entries.len(), 1);

        let entry = &stats.entries[dn];
        assert_eq!(entry.operation_labels(), vec!["Add", "Modify"]);
        assert_eq!(entry.total_attribute_count, 3);
    }

    #[test]
    fn dn_keys_are_case_sensitive() {
        let stats = analyze([
            ChangeRecord::delete("cn=User,dc=x"),
            ChangeRecord::delete("CN=user,DC=x"),
        ]);
        assert_eq!(stats.entries.len(), 2);
    }

    #[test]
    fn valueless_delete_registers_attribute() {
        let stats = analyze([ChangeRecord::modify(
            "cn=a",
            vec![ModSpec::new(ModOp::Delete, "description", Vec::<String>::new())],
        )]);
        assert_eq!(stats.attribute_counts.get("description"), Some(&0));
        assert_eq!(stats.entries["cn=a"].attributes.get("description"), Some(&0));
    }

    #[test]
    fn incremental_feeding_matches_analyze() {
        let records = vec![test_user_add(), ChangeRecord::delete("cn=b")];
        let mut aggregator = StatsAggregator::new();
        for record in &records {
            aggregator.record(record);
        }
        assert_eq!(aggregator.records_seen(), 2);
        assert_eq!(aggregator.finish(), analyze(&records));
    }

    fn arb_record() -> impl Strategy<Value = ChangeRecord> {
        let dn = "cn=[a-d],dc=x";
        let attrs = proptest::collection::vec(
            ("[a-c]", proptest::collection::vec("[a-z]{1,3}", 0..4)),
            0..4,
        );
        prop_oneof![
            (dn, attrs.clone()).prop_map(|(dn, attrs)| ChangeRecord::add(
                dn,
                attrs.into_iter().map(|(n, v)| Attribute::new(n, v)).collect()
            )),
            (dn, attrs).prop_map(|(dn, attrs)| ChangeRecord::modify(
                dn,
                attrs
                    .into_iter()
                    .map(|(n, v)| ModSpec::new(ModOp::Replace, n, v))
                    .collect()
            )),
            dn.prop_map(|dn| ChangeRecord::delete(dn)),
            dn.prop_map(|dn| ChangeRecord::mod_dn(dn, "cn=z", None)),
        ]
    }

    proptest! {
        #[test]
        fn totals_match_the_stream(records in proptest::collection::vec(arb_record(), 0..40)) {
            let stats = analyze(&records);
            let expected_values: usize = records.iter().map(ChangeRecord::attribute_value_count).sum();

            prop_assert_eq!(stats.total_entries, records.len());
            prop_assert_eq!(stats.total_attributes, expected_values);
            prop_assert_eq!(
                stats.total_add_operations
                    + stats.total_delete_operations
                    + stats.total_modify_operations
                    + stats.total_mod_dn_operations,
                records.len()
            );
            prop_assert_eq!(stats.attribute_counts.values().sum::<usize>(), expected_values);

            let per_entry: usize = stats.entries.values().map(|e| e.total_attribute_count).sum();
            prop_assert_eq!(per_entry, expected_values);
            let ops: usize = stats.entries.values().map(|e| e.operation_types.len()).sum();
            prop_assert_eq!(ops, records.len());
        }
    }
}
