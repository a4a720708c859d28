//! API client: request building, dispatch and normalization.

mod api_client;
mod builder;
mod dispatch;
mod normalizer;

pub use api_client::{ApiClient, ProgressCallback, UPLOAD_FILE_FIELD, UploadProgress, json_body};
pub use builder::{RequestBuilder, RequestConfig, RequestOptions, default_headers};
pub use dispatch::send_with_timeout;
pub use normalizer::{INVALID_RESPONSE_FORMAT, decode, normalize};
