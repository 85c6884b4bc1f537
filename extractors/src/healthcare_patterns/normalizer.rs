use chrono::NaiveDate;
use indexmap::IndexMap;
use shared_types::{FieldKind, FieldValue};

use crate::healthcare_patterns::RawField;

/// Date formats tried in order when coercing a raw date value.
const DATE_FORMATS: [&str; 5] = ["%m/%d/%Y", "%m-%d-%Y", "%Y-%m-%d", "%m/%d/%y", "%m-%d-%y"];

/// Coerce raw matches into typed values, dispatching on each field's
/// registered kind. Empty values are dropped; coercion failures fall back
/// to the cleaned string, so this stage never fails.
pub(crate) fn normalize_fields(raw: IndexMap<String, RawField>) -> IndexMap<String, FieldValue> {
    let mut fields = IndexMap::new();

    for (name, field) in raw {
        let value = field.value.trim();
        if value.is_empty() {
            continue;
        }

        let normalized = match field.kind {
            FieldKind::Currency => normalize_currency(value),
            FieldKind::Date => FieldValue::Text(normalize_date(value)),
            FieldKind::Text => FieldValue::Text(value.to_string()),
        };
        fields.insert(name, normalized);
    }

    fields
}

fn normalize_currency(value: &str) -> FieldValue {
    let cleaned = value.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    match cleaned.parse::<f64>() {
        Ok(amount) => FieldValue::Number(amount),
        Err(_) => FieldValue::Text(cleaned.to_string()),
    }
}

/// Rewrite a date string as ISO `YYYY-MM-DD`, or return it unchanged when
/// no known format matches.
pub(crate) fn normalize_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
