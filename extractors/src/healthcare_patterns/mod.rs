mod extractor;
mod normalizer;
mod validator;

pub use extractor::HealthcareDataExtractor;

use indexmap::IndexMap;
use regex::Regex;
use shared_types::{ExtractionError, FieldKind};

/// A named pattern that locates and captures one field's value from
/// document text.
///
/// `group` selects which capture group holds the value; group 0 selects
/// the whole match. The coercion `kind` decides how the normalizer treats
/// the captured string.
pub struct FieldRule {
    pub name: String,
    pub regex: Regex,
    pub group: usize,
    pub kind: FieldKind,
}

impl FieldRule {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        group: usize,
        kind: FieldKind,
    ) -> Result<Self, ExtractionError> {
        let name = name.into();
        validate_rule_name(&name)?;

        let regex = Regex::new(pattern).map_err(|e| {
            ExtractionError::InvalidRule(format!("pattern for '{}' does not compile: {}", name, e))
        })?;

        if group >= regex.captures_len() {
            return Err(ExtractionError::InvalidRule(format!(
                "capture group {} for '{}' does not exist (pattern has {} groups)",
                group,
                name,
                regex.captures_len()
            )));
        }

        Ok(Self {
            name,
            regex,
            group,
            kind,
        })
    }

    /// First occurrence of this rule in `text`, trimmed. Returns `None`
    /// when the rule does not match or the captured value is empty.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let captures = self.regex.captures(text)?;
        let value = captures.get(self.group)?.as_str().trim();
        (!value.is_empty()).then_some(value)
    }
}

fn validate_rule_name(name: &str) -> Result<(), ExtractionError> {
    if name.is_empty() || name.len() > 100 {
        return Err(ExtractionError::InvalidRule(
            "Rule name must be 1-100 characters".to_string(),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ExtractionError::InvalidRule(
            "Rule name must contain only lowercase letters, numbers, and underscores".to_string(),
        ));
    }
    Ok(())
}

/// A captured raw value together with the coercion tag of the rule that
/// produced it.
#[derive(Debug, Clone)]
pub struct RawField {
    pub value: String,
    pub kind: FieldKind,
}

fn rule(name: &str, pattern: &str, group: usize, kind: FieldKind) -> FieldRule {
    FieldRule::new(name, pattern, group, kind).unwrap()
}

/// Rules applied to every document regardless of type.
pub fn common_rules() -> Vec<FieldRule> {
    vec![
        // Free-text name captures stay single-line to avoid swallowing the
        // following label; the required colon keeps section headers like
        // "PATIENT INFORMATION" from matching as a name.
        rule(
            "patient_name",
            r"(?i)(?:patient|name)[ \t]*:\s*(\w+(?:[ \t]+\w+)*)",
            1,
            FieldKind::Text,
        ),
        rule(
            "date_of_birth",
            r"(?i)(?:dob|date of birth)[\s:]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            1,
            FieldKind::Date,
        ),
        rule(
            "member_id",
            r"(?i)(?:member\s*id|policy\s*number)[\s:]*(\w+)",
            1,
            FieldKind::Text,
        ),
        rule(
            "date_of_service",
            r"(?i)(?:date of service|service date|dos)[\s:]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            1,
            FieldKind::Date,
        ),
        rule(
            "provider_name",
            r"(?i)(?:provider|doctor|physician)[ \t]*:\s*([\w.]+(?:[ \t]+[\w.]+)*)",
            1,
            FieldKind::Text,
        ),
        rule(
            "diagnosis_code",
            r"(?i)(?:diagnosis|dx)[\s\w]*code[\s:]*([A-Z]\d{2,5}(?:\.\d+)?)",
            1,
            FieldKind::Text,
        ),
        rule(
            "procedure_code",
            r"(?i)(?:procedure|tx|treatment)[\s\w]*code[\s:]*([A-Z]\d{1,4}[A-Z]?\d{0,4}|\d{4,5}[A-Z]?)",
            1,
            FieldKind::Text,
        ),
        rule(
            "amount",
            r"(?i)(?:amount|total|charge|balance)[\s:]*\$?\s*(\d[\d,]*(?:\.\d{2})?)",
            1,
            FieldKind::Currency,
        ),
        rule(
            "phone",
            r"(?i)(?:phone|tel|mobile)[\s:]*(\(?\d{3}[-\s.)]?\s*\d{3}[-\s.]?\s*\d{4})",
            1,
            FieldKind::Text,
        ),
    ]
}

/// Rules applied on top of the common set when the document type is known.
/// Type-specific values win on field-name collision.
pub fn document_type_rules() -> IndexMap<String, Vec<FieldRule>> {
    let mut rules_by_type = IndexMap::new();

    rules_by_type.insert(
        "insurance_claim".to_string(),
        vec![
            rule(
                "claim_number",
                r"(?i)claim\s*(?:number|no\.?|#)[\s:]*([A-Z0-9-]+)",
                1,
                FieldKind::Text,
            ),
            rule(
                "group_number",
                r"(?i)group\s*(?:number|no\.?|#)?[\s:]*(\w+)",
                1,
                FieldKind::Text,
            ),
            rule(
                "adjustment_reason",
                r"(?i)adjustment\s*reason[\s:]*([^\r\n]+)",
                1,
                FieldKind::Text,
            ),
            rule(
                "patient_responsibility",
                r"(?i)patient\s*responsibility[\s:]*\$?\s*(\d[\d,]*\.\d{2})",
                1,
                FieldKind::Currency,
            ),
        ],
    );

    rules_by_type.insert(
        "prescription".to_string(),
        vec![
            rule("medication", r"(?i)medication[\s:]*([^\r\n]+)", 1, FieldKind::Text),
            rule("dosage", r"(?i)dosage[\s:]*([^\r\n]+)", 1, FieldKind::Text),
            rule("frequency", r"(?i)frequency[\s:]*([^\r\n]+)", 1, FieldKind::Text),
            rule("refills", r"(?i)refills?[\s:]*(\d+)", 1, FieldKind::Text),
            rule("prescriber", r"(?i)prescriber[\s:]*([^\r\n]+)", 1, FieldKind::Text),
        ],
    );

    rules_by_type.insert(
        "medical_report".to_string(),
        vec![
            rule("report_type", r"(?i)report\s*type[\s:]*([^\r\n]+)", 1, FieldKind::Text),
            rule("findings", r"(?i)findings[\s:]*([^\r\n]+)", 1, FieldKind::Text),
            rule("impression", r"(?i)impression[\s:]*([^\r\n]+)", 1, FieldKind::Text),
            rule(
                "recommendations",
                r"(?i)recommendations?[\s:]*([^\r\n]+)",
                1,
                FieldKind::Text,
            ),
        ],
    );

    rules_by_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_rule_tables_are_well_formed() {
        let mut names = HashSet::new();
        for rule in common_rules() {
            assert!(names.insert(rule.name.clone()), "duplicate common rule {}", rule.name);
            assert!(rule.group < rule.regex.captures_len());
        }

        for (doc_type, rules) in document_type_rules() {
            let mut type_names = HashSet::new();
            for rule in rules {
                assert!(
                    type_names.insert(rule.name.clone()),
                    "duplicate rule {} for {}",
                    rule.name,
                    doc_type
                );
                assert!(rule.group < rule.regex.captures_len());
            }
        }
    }

    #[test]
    fn test_capture_trims_surrounding_whitespace() {
        let rules = common_rules();
        let name_rule = rules.iter().find(|r| r.name == "patient_name").unwrap();

        assert_eq!(
            name_rule.capture("Patient:   Jane Roe  \nDOB: 01/01/1990"),
            Some("Jane Roe")
        );
    }

    #[test]
    fn test_label_and_value_split_across_lines() {
        let rules = common_rules();

        let dob = rules.iter().find(|r| r.name == "date_of_birth").unwrap();
        assert_eq!(dob.capture("DOB:\n01/15/1980"), Some("01/15/1980"));

        let member_id = rules.iter().find(|r| r.name == "member_id").unwrap();
        assert_eq!(member_id.capture("Member ID:\nABC123456"), Some("ABC123456"));

        let name = rules.iter().find(|r| r.name == "patient_name").unwrap();
        assert_eq!(name.capture("Patient:\n  Jane Roe"), Some("Jane Roe"));
    }

    #[test]
    fn test_patient_name_skips_section_header() {
        let rules = common_rules();
        let name = rules.iter().find(|r| r.name == "patient_name").unwrap();

        assert_eq!(
            name.capture("PATIENT INFORMATION\nName: John Doe"),
            Some("John Doe")
        );
    }

    #[test]
    fn test_capture_returns_none_without_match() {
        let rules = common_rules();
        let phone_rule = rules.iter().find(|r| r.name == "phone").unwrap();

        assert_eq!(phone_rule.capture("no contact details here"), None);
    }

    #[test]
    fn test_rule_group_zero_uses_whole_match() {
        let rule = FieldRule::new("marker", r"(?i)urgent", 0, FieldKind::Text).unwrap();
        assert_eq!(rule.capture("Status: URGENT"), Some("URGENT"));
    }

    #[test]
    fn test_rule_rejects_bad_name() {
        assert!(FieldRule::new("Patient Name", r"x", 0, FieldKind::Text).is_err());
        assert!(FieldRule::new("", r"x", 0, FieldKind::Text).is_err());
    }

    #[test]
    fn test_rule_rejects_bad_pattern_and_group() {
        assert!(FieldRule::new("broken", r"(unclosed", 0, FieldKind::Text).is_err());
        assert!(FieldRule::new("no_group", r"(\d+)", 2, FieldKind::Text).is_err());
    }
}
