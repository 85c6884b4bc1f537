use chrono::Utc;
use indexmap::IndexMap;
use shared_types::{ExtractionError, ExtractionResult, FieldKind, FieldValue, ValidationReport};
use tracing::warn;

use crate::healthcare_patterns::normalizer::normalize_fields;
use crate::healthcare_patterns::validator::validate_fields;
use crate::healthcare_patterns::{common_rules, document_type_rules, FieldRule, RawField};

/// Pattern-based extraction engine for OCR'd healthcare document text.
///
/// Rule tables are compiled once at construction and never mutated, so a
/// single extractor can serve concurrent callers; each call builds its own
/// field maps.
pub struct HealthcareDataExtractor {
    common: Vec<FieldRule>,
    rules_by_type: IndexMap<String, Vec<FieldRule>>,
}

impl HealthcareDataExtractor {
    /// Extractor with the built-in common and per-document-type rule tables.
    pub fn new() -> Self {
        Self {
            common: common_rules(),
            rules_by_type: document_type_rules(),
        }
    }

    /// Extractor over host-supplied rulesets. Every rule has already been
    /// validated by `FieldRule::new`; this additionally rejects duplicate
    /// field names within a ruleset.
    pub fn from_rules(
        common: Vec<FieldRule>,
        rules_by_type: IndexMap<String, Vec<FieldRule>>,
    ) -> Result<Self, ExtractionError> {
        check_unique_names(&common, "common")?;
        for (doc_type, rules) in &rules_by_type {
            check_unique_names(rules, doc_type)?;
        }

        Ok(Self {
            common,
            rules_by_type,
        })
    }

    /// Document types with a registered type-specific ruleset.
    pub fn registered_types(&self) -> impl Iterator<Item = &str> {
        self.rules_by_type.keys().map(String::as_str)
    }

    /// Run the full pipeline: extract raw fields, normalize them, validate
    /// against the document type's required fields.
    ///
    /// Best-effort contract: a failing pipeline stage is recorded in
    /// `result.error` and whatever was assembled so far is still returned.
    pub fn extract_structured_data(&self, text: &str, doc_type: Option<&str>) -> ExtractionResult {
        let mut result = ExtractionResult {
            extraction_timestamp: Utc::now().to_rfc3339(),
            document_type: doc_type.unwrap_or("unknown").to_string(),
            extracted_fields: IndexMap::new(),
            validation: ValidationReport::default(),
            error: None,
        };

        if text.is_empty() {
            return result;
        }

        if let Err(e) = self.run_pipeline(text, doc_type, &mut result) {
            warn!("extraction pipeline failed: {e}");
            result.error = Some(e.to_string());
        }

        result
    }

    fn run_pipeline(
        &self,
        text: &str,
        doc_type: Option<&str>,
        result: &mut ExtractionResult,
    ) -> Result<(), ExtractionError> {
        let mut raw = self.extract_fields(text, &self.common);

        if let Some(rules) = doc_type.and_then(|t| self.rules_by_type.get(t)) {
            // Type-specific rules win on field-name collision.
            for (name, field) in self.extract_fields(text, rules) {
                raw.insert(name, field);
            }
        }

        result.extracted_fields = normalize_fields(raw);
        result.validation = validate_fields(&result.extracted_fields, doc_type, |name| {
            self.field_kind(doc_type, name)
        });

        Ok(())
    }

    /// Evaluate every rule of a ruleset independently against the whole
    /// text; rules without a match contribute nothing.
    pub fn extract_fields(&self, text: &str, rules: &[FieldRule]) -> IndexMap<String, RawField> {
        let mut extracted = IndexMap::new();
        for rule in rules {
            if let Some(value) = rule.capture(text) {
                extracted.insert(
                    rule.name.clone(),
                    RawField {
                        value: value.to_string(),
                        kind: rule.kind,
                    },
                );
            }
        }
        extracted
    }

    /// Coercion tag registered for a field, with type-specific rules taking
    /// precedence over common ones. Unregistered names are plain text.
    fn field_kind(&self, doc_type: Option<&str>, name: &str) -> FieldKind {
        if let Some(rules) = doc_type.and_then(|t| self.rules_by_type.get(t)) {
            if let Some(rule) = rules.iter().find(|r| r.name == name) {
                return rule.kind;
            }
        }
        self.common
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.kind)
            .unwrap_or(FieldKind::Text)
    }
}

impl Default for HealthcareDataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn check_unique_names(rules: &[FieldRule], set_name: &str) -> Result<(), ExtractionError> {
    let mut seen = std::collections::HashSet::new();
    for rule in rules {
        if !seen.insert(rule.name.as_str()) {
            return Err(ExtractionError::InvalidRule(format!(
                "duplicate field name '{}' in {} ruleset",
                rule.name, set_name
            )));
        }
    }
    Ok(())
}
