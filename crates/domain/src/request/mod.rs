//! HTTP request domain types

mod body;
mod descriptor;
mod header;
mod method;
mod query;

pub use body::{FilePart, MultipartField, MultipartForm, RequestBody};
pub use descriptor::{DEFAULT_TIMEOUT, HttpBody, HttpRequest};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
