pub mod document;

pub use document::{
    ExtractionError, ExtractionResult, FieldKind, FieldValue, ValidationReport,
};
