pub mod backoff;
pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::{DETAIL_TIMEOUT, FetchClient, LISTING_TIMEOUT, RetryPolicy};
pub use errors::FetchError;
pub use types::{Charset, PageResponse};
