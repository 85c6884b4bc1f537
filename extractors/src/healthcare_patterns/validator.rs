use chrono::NaiveDate;
use indexmap::IndexMap;
use shared_types::{FieldKind, FieldValue, ValidationReport};

/// Fields a document type's extraction must produce to count as valid.
const REQUIRED_FIELDS: [(&str, &[&str]); 3] = [
    (
        "insurance_claim",
        &["patient_name", "member_id", "date_of_service"],
    ),
    ("prescription", &["patient_name", "medication", "dosage"]),
    ("medical_report", &["patient_name", "report_type"]),
];

fn required_fields(doc_type: &str) -> Option<&'static [&'static str]> {
    REQUIRED_FIELDS
        .iter()
        .find(|(registered, _)| *registered == doc_type)
        .map(|(_, fields)| *fields)
}

/// Check a normalized field map against the document type's required-field
/// list and flag date-tagged values that survived normalization unparsed.
///
/// Missing required fields are errors and mark the report invalid; malformed
/// dates are warnings only. Errors follow required-list order, warnings
/// follow field-map order.
pub(crate) fn validate_fields(
    fields: &IndexMap<String, FieldValue>,
    doc_type: Option<&str>,
    kind_of: impl Fn(&str) -> FieldKind,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(required) = doc_type.and_then(required_fields) {
        for name in required {
            let missing = fields.get(*name).map(FieldValue::is_empty).unwrap_or(true);
            if missing {
                report.is_valid = false;
                report.errors.push(format!("Missing required field: {name}"));
            }
        }
    }

    for (name, value) in fields {
        if kind_of(name) != FieldKind::Date {
            continue;
        }
        if let Some(text) = value.as_str() {
            if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                report
                    .warnings
                    .push(format!("Invalid date format for {name}: {text}"));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    fn all_text(_name: &str) -> FieldKind {
        FieldKind::Text
    }

    #[test]
    fn test_missing_required_fields_in_list_order() {
        let mut fields = IndexMap::new();
        fields.insert("date_of_service".to_string(), text_field("2023-05-10"));

        let report = validate_fields(&fields, Some("insurance_claim"), all_text);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Missing required field: patient_name".to_string(),
                "Missing required field: member_id".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_required_field_counts_as_missing() {
        let mut fields = IndexMap::new();
        fields.insert("patient_name".to_string(), text_field("Jane Roe"));
        fields.insert("medication".to_string(), text_field("  "));
        fields.insert("dosage".to_string(), text_field("500 mg"));

        let report = validate_fields(&fields, Some("prescription"), all_text);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Missing required field: medication".to_string()]
        );
    }

    #[test]
    fn test_unregistered_doc_type_skips_required_checks() {
        let fields = IndexMap::new();
        assert!(validate_fields(&fields, Some("id_proof"), all_text).is_valid);
        assert!(validate_fields(&fields, None, all_text).is_valid);
    }

    #[test]
    fn test_unparsed_date_is_warning_only() {
        let mut fields = IndexMap::new();
        fields.insert("date_of_birth".to_string(), text_field("15-01-1980"));

        let report = validate_fields(&fields, None, |_| FieldKind::Date);
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec!["Invalid date format for date_of_birth: 15-01-1980".to_string()]
        );
    }

    #[test]
    fn test_iso_date_produces_no_warning() {
        let mut fields = IndexMap::new();
        fields.insert("date_of_service".to_string(), text_field("2023-05-10"));

        let report = validate_fields(&fields, None, |_| FieldKind::Date);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_non_date_kind_is_never_date_checked() {
        let mut fields = IndexMap::new();
        // A name that merely contains "date" is not date-checked; only the
        // registered kind decides.
        fields.insert("update_notes".to_string(), text_field("call back"));

        let report = validate_fields(&fields, None, all_text);
        assert!(report.warnings.is_empty());
    }
}
