//! Extractors Crate
//!
//! Pattern-based extraction of structured fields from OCR'd healthcare
//! document text. The engine consumes a text blob plus an optional
//! document-type label and produces a normalized, validated field map;
//! OCR itself, document classification, and persistence belong to the
//! surrounding services.
//!
//! # Architecture
//!
//! - **Types**: result, report, and error types live in the `shared-types` crate
//! - **Engine**: rule tables, extraction, normalization, and validation live here
//!
//! # Example
//!
//! ```rust
//! use extractors::HealthcareDataExtractor;
//!
//! let extractor = HealthcareDataExtractor::new();
//! let result = extractor.extract_structured_data(
//!     "Name: John Doe\nMember ID: ABC123456\nDate of Service: 05/10/2023",
//!     Some("insurance_claim"),
//! );
//! assert!(result.validation.is_valid);
//! ```

pub mod healthcare_patterns;

// Re-export commonly used types
pub use healthcare_patterns::{FieldRule, HealthcareDataExtractor, RawField};

// Re-export result types from shared-types for convenience
pub use shared_types::{ExtractionError, ExtractionResult, FieldKind, FieldValue, ValidationReport};
