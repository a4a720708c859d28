//! HTTP response domain types

mod envelope;
mod raw;

pub use envelope::{FieldErrors, PaginationMeta, ResponseEnvelope};
pub use raw::{RawResponse, canonical_reason};
