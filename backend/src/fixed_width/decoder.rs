use std::collections::HashMap;

use log::debug;

use super::schema::FieldSpec;

/// Trimmed text slices of one line, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: HashMap<&'static str, String>,
}

impl RawRecord {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Value of the column, or `""` if the layout has no such column.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Cuts `line` into the columns of `layout`.
///
/// Returns `None` for a blank line. A line that stops inside a column yields the
/// part that is there; columns starting past the end of the line are empty.
/// Every value is trimmed.
pub fn decode_line(line: &str, layout: &[FieldSpec]) -> Option<RawRecord> {
    if line.trim().is_empty() {
        return None;
    }

    let chars: Vec<char> = line.chars().collect();
    let mut record = RawRecord::with_capacity(layout.len());
    for spec in layout {
        record.values.insert(spec.name, extract(&chars, spec));
    }

    debug!(
        "Decoded line of {} chars into {} fields",
        chars.len(),
        record.len()
    );
    Some(record)
}

fn extract(chars: &[char], spec: &FieldSpec) -> String {
    if chars.len() <= spec.start {
        return String::new();
    }
    let end = spec.end.min(chars.len());
    chars[spec.start..end]
        .iter()
        .collect::<String>()
        .trim()
        .to_string()
}
