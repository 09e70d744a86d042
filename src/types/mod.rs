//! Request, hit, and document types shared across the pipeline

pub mod document;
pub mod hit;
pub mod params;
pub mod response;

pub use document::{prune_to_allowed_fields, validate_document, ALLOWED_DOCUMENT_FIELDS};
pub use hit::{HitSource, RawHit, RetrievalHit};
pub use params::SearchParameters;
pub use response::{AnswerKind, QueryOutcome};
