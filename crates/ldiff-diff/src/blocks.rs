//! DN-grouped raw line blocks.
//!
//! The unified diff works on raw text rather than parsed records: each entry
//! is the `dn:` line plus every following line up to a blank line. DN keys
//! are case-insensitive here, unlike the statistics engine.

use std::collections::BTreeMap;

/// The raw lines of one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryBlock {
    /// The DN as first spelled in the file.
    pub dn: String,
    /// The `dn:` line followed by the rest of the entry, verbatim.
    pub lines: Vec<String>,
}

/// Entry blocks of one file, keyed by case-folded DN.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryBlocks {
    blocks: BTreeMap<String, EntryBlock>,
}

impl EntryBlocks {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by DN, ignoring case.
    pub fn get(&self, dn: &str) -> Option<&EntryBlock> {
        self.blocks.get(&fold_dn(dn))
    }

    /// Blocks in ascending case-folded DN order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntryBlock)> {
        self.blocks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn get_folded(&self, key: &str) -> Option<&EntryBlock> {
        self.blocks.get(key)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &String> {
        self.blocks.keys()
    }

    /// A repeated DN replaces the earlier lines but keeps the first spelling.
    fn store(&mut self, dn: String, lines: Vec<String>) {
        self.blocks
            .entry(fold_dn(&dn))
            .and_modify(|block| block.lines.clone_from(&lines))
            .or_insert(EntryBlock { dn, lines });
    }
}

/// Case-folded key used for DN comparisons in the unified diff.
pub fn fold_dn(dn: &str) -> String {
    dn.to_lowercase()
}

fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let head = line.get(..key.len())?;
    head.eq_ignore_ascii_case(key).then(|| &line[key.len()..])
}

/// Group raw LDIF text into per-DN blocks.
///
/// `version:` lines are skipped, lines before the first `dn:` are ignored,
/// and a trailing block without a closing blank line is kept.
pub fn parse_to_blocks(text: &str) -> EntryBlocks {
    let mut blocks = EntryBlocks::default();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in text.lines() {
        if strip_key(line, "version:").is_some() {
            continue;
        }

        if line.trim().is_empty() {
            if let Some((dn, lines)) = current.take() {
                blocks.store(dn, lines);
            }
            continue;
        }

        if let Some(rest) = strip_key(line, "dn:") {
            if let Some((dn, lines)) = current.take() {
                blocks.store(dn, lines);
            }
            let dn = rest.trim();
            if !dn.is_empty() {
                current = Some((dn.to_string(), vec![line.to_string()]));
            }
            continue;
        }

        if let Some((_, lines)) = current.as_mut() {
            lines.push(line.to_string());
        }
    }

    if let Some((dn, lines)) = current {
        blocks.store(dn, lines);
    }

    blocks
}
