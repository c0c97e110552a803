//! Web adapter. Implements PagePort over HTTP.

pub mod http_fetcher;
pub mod text_extract;

pub use http_fetcher::HttpPageFetcher;
pub use text_extract::{extract_text, truncate_chars};
