//! Errors raised by the HTTP adapter.

use crate::board::ports::RemoteError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Classification of a failed request, taken from the `reqwest` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailureKind {
    /// The request timed out.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read.
    Body,
    /// The response body could not be decoded.
    Decode,
    /// Any other failure.
    Unknown,
}

impl RequestFailureKind {
    /// Returns the kind as a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Unknown => "unknown",
        }
    }

    fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect
        } else if err.is_request() {
            Self::Request
        } else if err.is_body() {
            Self::Body
        } else if err.is_decode() {
            Self::Decode
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for RequestFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`super::HttpBoardClient`].
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The underlying client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request failed before a status was received.
    #[error("request to {url} failed ({kind}): {source}")]
    Request {
        /// Failure classification.
        kind: RequestFailureKind,
        /// Requested URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned status {status}: {body}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Preview of the response body.
        body: String,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder message with a body preview.
        message: String,
    },
}

impl HttpClientError {
    pub(super) fn request(err: reqwest::Error, url: &str) -> Self {
        Self::Request {
            kind: RequestFailureKind::classify(&err),
            url: url.to_owned(),
            source: err,
        }
    }
}

impl From<HttpClientError> for RemoteError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::Status { status, body, .. } => Self::Status { status, body },
            HttpClientError::Decode { .. } => Self::Decode(err.to_string()),
            HttpClientError::Build(_) | HttpClientError::Request { .. } => {
                Self::Transport(Arc::new(err))
            }
        }
    }
}
