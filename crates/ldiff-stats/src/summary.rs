//! Change-oriented summary of a single LDIF file.
//!
//! Where [`Stats`](crate::Stats) counts values per DN, [`ChangeSummary`]
//! looks at what the file does: entries created and deleted, user accounts
//! among them, and values added, deleted, or replaced by modify records.
//! Attribute names are compared case-insensitively here.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use ldiff_types::{Attribute, ChangeRecord, ModOp};
use serde::Serialize;

const USER_OBJECT_CLASSES: [&str; 3] = ["user", "inetOrgPerson", "person"];
const USER_CONTAINERS: [&str; 2] = ["ou=users", "cn=users"];

/// `true` if the DN sits under a `Users` container.
pub fn is_user_dn(dn: &str) -> bool {
    let dn = dn.to_ascii_lowercase();
    USER_CONTAINERS.iter().any(|container| dn.contains(container))
}

/// `true` if an add record creates a user account.
pub fn is_user_add(dn: &str, attributes: &[Attribute]) -> bool {
    let user_class = attributes
        .iter()
        .filter(|attr| attr.name.eq_ignore_ascii_case("objectClass"))
        .flat_map(|attr| &attr.values)
        .any(|value| {
            USER_OBJECT_CLASSES
                .iter()
                .any(|class| value.eq_ignore_ascii_case(class))
        });
    user_class || is_user_dn(dn)
}

/// `true` if the record creates, changes, renames or removes a user account.
pub fn is_user_record(record: &ChangeRecord) -> bool {
    match record {
        ChangeRecord::Add { dn, attributes } => is_user_add(dn, attributes),
        other => is_user_dn(other.dn()),
    }
}

/// A change record tagged with its user classification; one JSON line of
/// `ldiff analyze` output.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord<'a> {
    #[serde(flatten)]
    pub record: &'a ChangeRecord,
    pub is_user: bool,
}

impl<'a> ClassifiedRecord<'a> {
    pub fn new(record: &'a ChangeRecord) -> Self {
        Self {
            record,
            is_user: is_user_record(record),
        }
    }
}

/// Case-insensitive attribute name set that remembers the first spelling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeNames(BTreeMap<String, String>);

impl AttributeNames {
    pub fn insert(&mut self, name: &str) {
        self.0
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in case-folded order, with their first spelling.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }
}

/// What one file changes, folded record by record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub entries_added: usize,
    pub entries_deleted: usize,
    pub users_added: usize,
    pub users_deleted: usize,
    pub modify_operations: usize,
    pub mod_dn_operations: usize,
    pub user_modify_operations: usize,
    pub user_dn_modifications: usize,
    /// Values carried by add records and `add:` modifications.
    pub values_added: usize,
    /// Values named by `delete:` modifications.
    pub values_deleted: usize,
    /// New values supplied by `replace:` modifications.
    pub values_replaced: usize,
    /// `delete:` modifications without values.
    pub attributes_fully_cleared: usize,
    pub attributes_observed: AttributeNames,
    #[serde(skip)]
    cleared: AttributeNames,
    #[serde(skip)]
    kept: AttributeNames,
}

impl ChangeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: &ChangeRecord) {
        match record {
            ChangeRecord::Add { dn, attributes } => {
                self.entries_added += 1;
                if is_user_add(dn, attributes) {
                    self.users_added += 1;
                }
                for attr in attributes {
                    self.attributes_observed.insert(&attr.name);
                    self.values_added += attr.value_count();
                }
            }
            ChangeRecord::Delete { dn } => {
                self.entries_deleted += 1;
                if is_user_dn(dn) {
                    self.users_deleted += 1;
                }
            }
            ChangeRecord::Modify { dn, mod_specs } => {
                self.modify_operations += 1;
                if is_user_dn(dn) {
                    self.user_modify_operations += 1;
                }
                for spec in mod_specs {
                    self.attributes_observed.insert(&spec.attribute);
                    match spec.op {
                        ModOp::Add => {
                            self.values_added += spec.value_count();
                            self.kept.insert(&spec.attribute);
                        }
                        ModOp::Delete if spec.values.is_empty() => {
                            self.attributes_fully_cleared += 1;
                            self.cleared.insert(&spec.attribute);
                        }
                        ModOp::Delete => self.values_deleted += spec.value_count(),
                        ModOp::Replace => {
                            self.values_replaced += spec.value_count();
                            self.kept.insert(&spec.attribute);
                        }
                    }
                }
            }
            ChangeRecord::ModDn { dn, .. } => {
                self.mod_dn_operations += 1;
                if is_user_dn(dn) {
                    self.user_dn_modifications += 1;
                }
            }
        }
    }

    /// Attributes cleared by some modify record and never added or replaced
    /// by any modify record in the file, in case-folded order.
    pub fn lost_attributes(&self) -> Vec<&str> {
        self.cleared
            .iter()
            .filter(|name| !self.kept.contains(name))
            .collect()
    }
}

impl<R: Borrow<ChangeRecord>> Extend<R> for ChangeSummary {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        for record in iter {
            self.record(record.borrow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldiff_types::ModSpec;

    fn summarize(records: &[ChangeRecord]) -> ChangeSummary {
        let mut summary = ChangeSummary::new();
        summary.extend(records);
        summary
    }

    #[test]
    fn user_detection() {
        assert!(is_user_dn("cn=a,OU=Users,dc=x"));
        assert!(is_user_dn("cn=a,CN=Users,dc=x"));
        assert!(!is_user_dn("cn=a,ou=Groups,dc=x"));
        assert!(!is_user_dn(""));

        let person = [Attribute::new("objectclass", ["top", "InetOrgPerson"])];
        assert!(is_user_add("cn=a,ou=Groups,dc=x", &person));
        let group = [Attribute::new("objectClass", ["groupOfNames"])];
        assert!(!is_user_add("cn=a,ou=Groups,dc=x", &group));
        assert!(is_user_add("cn=a,ou=Users,dc=x", &group));
    }

    #[test]
    fn classified_record_carries_is_user() {
        let delete = ChangeRecord::delete("cn=a,ou=Users,dc=x");
        let json = serde_json::to_string(&ClassifiedRecord::new(&delete)).unwrap();
        assert_eq!(json, r#"{"changeType":"Delete","dn":"cn=a,ou=Users,dc=x","isUser":true}"#);

        let group = ChangeRecord::add("cn=g,ou=Groups,dc=x", vec![Attribute::new("cn", ["g"])]);
        assert!(!ClassifiedRecord::new(&group).is_user);
        let person = ChangeRecord::add(
            "cn=p,ou=Groups,dc=x",
            vec![Attribute::new("objectClass", ["person"])],
        );
        assert!(is_user_record(&person));
    }

    #[test]
    fn counts_adds_and_deletes() {
        let summary = summarize(&[
            ChangeRecord::add(
                "cn=a,ou=Users,dc=x",
                vec![
                    Attribute::new("objectClass", ["person"]),
                    Attribute::new("mail", ["a@x", "b@x"]),
                ],
            ),
            ChangeRecord::add("cn=g,ou=Groups,dc=x", vec![Attribute::new("cn", ["g"])]),
            ChangeRecord::delete("cn=b,ou=Users,dc=x"),
            ChangeRecord::delete("cn=h,ou=Groups,dc=x"),
        ]);

        assert_eq!(summary.entries_added, 2);
        assert_eq!(summary.users_added, 1);
        assert_eq!(summary.entries_deleted, 2);
        assert_eq!(summary.users_deleted, 1);
        assert_eq!(summary.values_added, 4);
        assert_eq!(summary.attributes_observed.len(), 3);
    }

    #[test]
    fn modify_values_are_split_by_operation() {
        let summary = summarize(&[ChangeRecord::modify(
            "cn=a,ou=Users,dc=x",
            vec![
                ModSpec::new(ModOp::Add, "telephoneNumber", ["1", "2"]),
                ModSpec::new(ModOp::Delete, "mail", ["a@x"]),
                ModSpec::new(ModOp::Delete, "description", Vec::<String>::new()),
                ModSpec::new(ModOp::Replace, "sn", ["One"]),
            ],
        )]);

        assert_eq!(summary.modify_operations, 1);
        assert_eq!(summary.user_modify_operations, 1);
        assert_eq!(summary.values_added, 2);
        assert_eq!(summary.values_deleted, 1);
        assert_eq!(summary.values_replaced, 1);
        assert_eq!(summary.attributes_fully_cleared, 1);
        assert_eq!(summary.lost_attributes(), vec!["description"]);
    }

    #[test]
    fn cleared_then_replaced_is_not_lost() {
        let summary = summarize(&[
            ChangeRecord::modify(
                "cn=a",
                vec![ModSpec::new(ModOp::Delete, "Description", Vec::<String>::new())],
            ),
            ChangeRecord::modify("cn=b", vec![ModSpec::new(ModOp::Replace, "description", ["x"])]),
        ]);
        assert!(summary.lost_attributes().is_empty());
        assert_eq!(summary.attributes_observed.len(), 1);
        assert_eq!(summary.attributes_observed.iter().next(), Some("Description"));
    }

    #[test]
    fn mod_dn_counts() {
        let summary = summarize(&[
            ChangeRecord::mod_dn("cn=a,ou=Users,dc=x", "cn=b", None),
            ChangeRecord::mod_dn("cn=a,ou=Groups,dc=x", "cn=b", None),
        ]);
        assert_eq!(summary.mod_dn_operations, 2);
        assert_eq!(summary.user_dn_modifications, 1);
    }
}
