//! Line tokenizer with structural bounds.

use crate::ProtocolError;

/// Maximum number of space-delimited fields in one message.
pub const MAX_FIELDS: usize = 5;

/// Maximum length of a single field, in bytes.
pub const MAX_FIELD_LEN: usize = 40;

/// Splits a message line into its fields.
///
/// Exactly one trailing `\n` is stripped if present; splitting is on
/// single spaces, so consecutive spaces produce empty fields rather
/// than being collapsed. Exceeding the field count or field length
/// bound is reported as malformed, never silently truncated.
pub fn tokenize(line: &str) -> Result<Vec<&str>, ProtocolError> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() > MAX_FIELDS {
        return Err(ProtocolError::TooManyFields {
            count: fields.len(),
        });
    }
    for field in &fields {
        if field.len() > MAX_FIELD_LEN {
            return Err(ProtocolError::FieldTooLong { len: field.len() });
        }
    }
    Ok(fields)
}
