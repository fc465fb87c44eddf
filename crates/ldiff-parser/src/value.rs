//! `name: value` line decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ldiff_types::ParseError;

use crate::lines::LogicalLine;

/// A decoded `name: value` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NameValue {
    pub name: String,
    pub value: String,
}

/// Split a logical line into its attribute name and decoded value.
///
/// Supports plain (`name: value`), base64 (`name:: b64`) and URL
/// (`name:< url`) forms. URL values are kept as the URL text.
pub(crate) fn split_line(line: &LogicalLine) -> Result<NameValue, ParseError> {
    let Some((name, rest)) = line.text.split_once(':') else {
        return Err(ParseError::new(
            line.line,
            format!("expected 'name: value', got {:?}", line.text),
        ));
    };

    let name = name.trim_end();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(ParseError::new(
            line.line,
            format!("invalid attribute description {name:?}"),
        ));
    }

    let value = if let Some(encoded) = rest.strip_prefix(':') {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ParseError::new(line.line, format!("invalid base64 value for {name}: {e}")))?;
        String::from_utf8_lossy(&bytes).into_owned()
    } else if let Some(url) = rest.strip_prefix('<') {
        url.trim().to_string()
    } else {
        rest.trim_start_matches(' ').to_string()
    };

    Ok(NameValue {
        name: name.to_string(),
        value,
    })
}
