//! CSV line parsing -- one raw line in, a [`Record`] or a [`LineRejection`] out.
//!
//! The format is deliberately rigid: comma-delimited, exactly three fields,
//! no quoting or escaping. A name containing a comma therefore miscounts
//! fields and the line is rejected.

use crate::error::LineRejection;
use crate::types::Record;

/// Field delimiter
pub const DELIMITER: char = ',';

/// Number of fields every data line must have
pub const FIELD_COUNT: usize = 3;

/// Parse one data line into a [`Record`].
///
/// Trailing empty fields are dropped before counting, so `A,B,1,,` has three
/// fields. Whitespace around each field is trimmed. Names are taken verbatim
/// (empty names are allowed); the age must be a base-10 `i32`.
pub fn parse_line(line: &str) -> Result<Record, LineRejection> {
    let mut fields: Vec<&str> = line.split(DELIMITER).collect();
    while fields.last() == Some(&"") {
        fields.pop();
    }
    let [first_name, last_name, age] = fields.as_slice() else {
        return Err(LineRejection::FieldCount {
            found: fields.len(),
        });
    };

    let age = age.trim();
    let age = age
        .parse::<i32>()
        .map_err(|source| LineRejection::InvalidAge {
            value: age.to_string(),
            source,
        })?;

    Ok(Record::new(first_name.trim(), last_name.trim(), age))
}
