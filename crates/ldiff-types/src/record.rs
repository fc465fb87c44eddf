//! Change records: the typed form of one LDIF operation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical operation label recorded per entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationKind {
    Add,
    Delete,
    Modify,
    ModDn,
}

impl OperationKind {
    /// The label used in reports and in `operationTypes` sequences.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Delete => "Delete",
            Self::Modify => "Modify",
            Self::ModDn => "ModDn",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The kind of a single modification inside a modify record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModOp {
    Add,
    Delete,
    Replace,
}

impl ModOp {
    /// Parse the LDIF keyword that opens a modification group.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "delete" => Some(Self::Delete),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Replace => "replace",
        }
    }
}

/// An attribute and its values, in the order they appeared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}

/// One modification of a modify record.
///
/// A `Delete` with no values removes the whole attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModSpec {
    pub attribute: String,
    pub op: ModOp,
    pub values: Vec<String>,
}

impl ModSpec {
    pub fn new<I, S>(op: ModOp, attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute: attribute.into(),
            op,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}

/// A parsed LDIF change record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "changeType")]
pub enum ChangeRecord {
    #[serde(rename_all = "camelCase")]
    Add { dn: String, attributes: Vec<Attribute> },
    #[serde(rename_all = "camelCase")]
    Delete { dn: String },
    #[serde(rename_all = "camelCase")]
    Modify { dn: String, mod_specs: Vec<ModSpec> },
    #[serde(rename_all = "camelCase")]
    ModDn {
        dn: String,
        new_rdn: String,
        delete_old_rdn: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_superior: Option<String>,
    },
}

impl ChangeRecord {
    pub fn add(dn: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self::Add {
            dn: dn.into(),
            attributes,
        }
    }

    pub fn delete(dn: impl Into<String>) -> Self {
        Self::Delete { dn: dn.into() }
    }

    pub fn modify(dn: impl Into<String>, mod_specs: Vec<ModSpec>) -> Self {
        Self::Modify {
            dn: dn.into(),
            mod_specs,
        }
    }

    pub fn mod_dn(
        dn: impl Into<String>,
        new_rdn: impl Into<String>,
        new_superior: Option<String>,
    ) -> Self {
        Self::ModDn {
            dn: dn.into(),
            new_rdn: new_rdn.into(),
            delete_old_rdn: true,
            new_superior,
        }
    }

    /// The distinguished name this record targets.
    pub fn dn(&self) -> &str {
        match self {
            Self::Add { dn, .. }
            | Self::Delete { dn }
            | Self::Modify { dn, .. }
            | Self::ModDn { dn, .. } => dn,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add { .. } => OperationKind::Add,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Modify { .. } => OperationKind::Modify,
            Self::ModDn { .. } => OperationKind::ModDn,
        }
    }

    /// Total number of attribute values carried by the record.
    ///
    /// Delete and rename records carry none.
    pub fn attribute_value_count(&self) -> usize {
        match self {
            Self::Add { attributes, .. } => attributes.iter().map(Attribute::value_count).sum(),
            Self::Modify { mod_specs, .. } => mod_specs.iter().map(ModSpec::value_count).sum(),
            Self::Delete { .. } | Self::ModDn { .. } => 0,
        }
    }
}
