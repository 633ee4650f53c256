//! Annotation document handling
//!
//! Parses point-annotation markup into the aligned coordinate, label and
//! read-origin sequences the extraction core consumes.

pub mod parser;
mod tests;

pub use parser::{parse_annotation_text, parse_documents, AnnotationSet, LabelPolicy};
