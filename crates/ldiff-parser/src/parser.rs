//! Record assembly: logical lines to [`ChangeRecord`]s.

use ldiff_types::{
    Attribute, ChangeRecord, ChangeRecordParser, ModOp, ModSpec, ParseError, ParseOutput,
};
use tracing::debug;

use crate::lines::{split_records, LogicalLine};
use crate::value::{split_line, NameValue};

/// Parser for LDIF change files.
///
/// A record without a `changetype:` line is a content record and is read as
/// an add.
#[derive(Clone, Copy, Debug, Default)]
pub struct LdifParser;

impl LdifParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse every record in `text`, keeping failures in place.
    pub fn parse_text(&self, text: &str) -> ParseOutput {
        let mut out = Vec::new();

        for (index, record) in split_records(text).into_iter().enumerate() {
            let lines = if index == 0 {
                strip_version(&record)
            } else {
                &record[..]
            };
            if lines.is_empty() {
                continue;
            }
            out.push(parse_record(lines));
        }

        debug!(
            records = out.len(),
            errors = out.iter().filter(|r| r.is_err()).count(),
            "parsed LDIF text"
        );
        out
    }
}

impl ChangeRecordParser for LdifParser {
    fn parse(&self, text: &str) -> ParseOutput {
        self.parse_text(text)
    }
}

fn strip_version(record: &[LogicalLine]) -> &[LogicalLine] {
    match record.first() {
        Some(first) if key_is(&first.text, "version") => &record[1..],
        _ => record,
    }
}

/// Case-insensitive check that `text` is a `key:` line.
fn key_is(text: &str, key: &str) -> bool {
    text.split_once(':')
        .is_some_and(|(name, _)| name.trim_end().eq_ignore_ascii_case(key))
}

fn parse_record(lines: &[LogicalLine]) -> Result<ChangeRecord, ParseError> {
    let first = &lines[0];
    if !key_is(&first.text, "dn") {
        return Err(ParseError::new(
            first.line,
            format!("record must start with 'dn:', got {:?}", first.text),
        ));
    }
    let dn = split_line(first)?.value.trim().to_string();

    let mut rest = &lines[1..];
    while let Some(line) = rest.first() {
        if key_is(&line.text, "control") {
            rest = &rest[1..];
        } else {
            break;
        }
    }

    let Some(line) = rest.first() else {
        return Err(ParseError::new(first.line, format!("record for {dn} has no content")));
    };

    if !key_is(&line.text, "changetype") {
        return parse_add(dn, rest, first.line);
    }

    let change_type = split_line(line)?.value.trim().to_ascii_lowercase();
    let body = &rest[1..];
    match change_type.as_str() {
        "add" => parse_add(dn, body, line.line),
        "delete" => parse_delete(dn, body),
        "modify" => parse_modify(dn, body),
        "modrdn" | "moddn" => parse_mod_dn(dn, body, line.line),
        other => Err(ParseError::new(
            line.line,
            format!("unknown changetype {other:?}"),
        )),
    }
}

fn parse_add(dn: String, body: &[LogicalLine], at: usize) -> Result<ChangeRecord, ParseError> {
    if body.is_empty() {
        return Err(ParseError::new(at, format!("add record for {dn} has no attributes")));
    }

    let mut attributes: Vec<Attribute> = Vec::new();
    for line in body {
        let NameValue { name, value } = split_line(line)?;
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.values.push(value),
            None => attributes.push(Attribute {
                name,
                values: vec![value],
            }),
        }
    }

    Ok(ChangeRecord::Add { dn, attributes })
}

fn parse_delete(dn: String, body: &[LogicalLine]) -> Result<ChangeRecord, ParseError> {
    if let Some(line) = body.first() {
        return Err(ParseError::new(
            line.line,
            format!("unexpected line in delete record: {:?}", line.text),
        ));
    }
    Ok(ChangeRecord::Delete { dn })
}

fn parse_modify(dn: String, body: &[LogicalLine]) -> Result<ChangeRecord, ParseError> {
    let mut mod_specs = Vec::new();
    let mut current: Option<ModSpec> = None;

    for line in body {
        if line.text.trim_end() == "-" {
            match current.take() {
                Some(spec) => mod_specs.push(spec),
                None => {
                    return Err(ParseError::new(line.line, "'-' without a modification"));
                }
            }
            continue;
        }

        let NameValue { name, value } = split_line(line)?;
        if let Some(spec) = current.as_mut() {
            if !name.eq_ignore_ascii_case(&spec.attribute) {
                return Err(ParseError::new(
                    line.line,
                    format!(
                        "value for {name:?} inside {} of {:?}",
                        spec.op.keyword(),
                        spec.attribute
                    ),
                ));
            }
            spec.values.push(value);
            continue;
        }

        let Some(op) = ModOp::from_keyword(&name) else {
            return Err(ParseError::new(
                line.line,
                format!("expected add:, delete: or replace:, got {name:?}"),
            ));
        };
        let attribute = value.trim().to_string();
        if attribute.is_empty() {
            return Err(ParseError::new(
                line.line,
                format!("{}: requires an attribute name", op.keyword()),
            ));
        }
        current = Some(ModSpec {
            attribute,
            op,
            values: Vec::new(),
        });
    }

    // The closing '-' of the last modification is commonly omitted.
    if let Some(spec) = current {
        mod_specs.push(spec);
    }

    Ok(ChangeRecord::Modify { dn, mod_specs })
}

fn parse_mod_dn(dn: String, body: &[LogicalLine], at: usize) -> Result<ChangeRecord, ParseError> {
    let mut new_rdn = None;
    let mut delete_old_rdn = true;
    let mut new_superior = None;

    for line in body {
        let NameValue { name, value } = split_line(line)?;
        match name.to_ascii_lowercase().as_str() {
            "newrdn" => new_rdn = Some(value.trim().to_string()),
            "deleteoldrdn" => {
                delete_old_rdn = match value.trim() {
                    "0" => false,
                    "1" => true,
                    other => {
                        return Err(ParseError::new(
                            line.line,
                            format!("deleteoldrdn must be 0 or 1, got {other:?}"),
                        ));
                    }
                }
            }
            "newsuperior" => new_superior = Some(value.trim().to_string()),
            _ => {
                return Err(ParseError::new(
                    line.line,
                    format!("unexpected {name:?} in modrdn record"),
                ));
            }
        }
    }

    let Some(new_rdn) = new_rdn else {
        return Err(ParseError::new(at, format!("modrdn record for {dn} is missing newrdn")));
    };

    Ok(ChangeRecord::ModDn {
        dn,
        new_rdn,
        delete_old_rdn,
        new_superior,
    })
}
