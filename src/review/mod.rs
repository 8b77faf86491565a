//! Review records and their validation

pub mod record;
pub mod validate;

pub use record::{Article, Confidence, LiteratureReview, Synthesis};
pub use validate::{FieldNaming, RecordValidator};
