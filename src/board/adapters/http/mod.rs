//! HTTP adapter for the ProjectFlow REST API.
//!
//! A single [`HttpBoardClient`] implements every board port. Responses are
//! decoded leniently: list endpoints that return something other than an
//! array are treated as empty, and individual records that cannot be decoded
//! are skipped with a warning rather than failing the whole list.

mod client;
mod error;
mod wire;

pub use client::HttpBoardClient;
pub use error::{HttpClientError, RequestFailureKind};
