//! Utility modules supporting the source adapters.
//!
//! - [`HttpClient`]: shared reqwest client with a browser-like user agent
//! - [`send`] / [`send_text`]: issue a request, mapping transport failures and
//!   non-2xx statuses onto [`SourceError`](crate::sources::SourceError)

mod http;

pub use http::{send, send_text, HttpClient, DEFAULT_USER_AGENT};
