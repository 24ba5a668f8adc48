//! Error types for the fetch helper.
//!
//! # Design
//! Every failure mode surfaces to the caller through rejection of the
//! `CompletionHandle`; nothing is retried or recovered internally. `BodyParse`
//! carries the full undecoded response because a declared-JSON body that does
//! not parse is usually a server bug, and the caller needs the raw material to
//! diagnose it.

use std::fmt;

use crate::http::RawResponse;

/// Errors delivered through a rejected `CompletionHandle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The input was neither a URL string nor a request description, or the
    /// description had no usable `url` field. No I/O was attempted.
    MissingUrl,

    /// The URL text could not be parsed into a target. No I/O was attempted.
    InvalidUrl(String),

    /// The connection or send failed, surfaced as-is from the transport.
    Transport(String),

    /// The connection closed before the response signalled completion. Any
    /// partially buffered body was discarded.
    ConnectionClosed,

    /// The response declared `application/json` but the body did not parse.
    BodyParse {
        message: String,
        response: RawResponse,
    },

    /// The response carried no `Content-Type` header to classify the body by.
    MissingContentType,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::MissingUrl => write!(f, "Missing URL"),
            FetchError::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::ConnectionClosed => write!(f, "connection closed"),
            FetchError::BodyParse { message, response } => {
                write!(
                    f,
                    "response body is not valid JSON (status {}): {message}",
                    response.status_code
                )
            }
            FetchError::MissingContentType => {
                write!(f, "response has no Content-Type header")
            }
        }
    }
}

impl std::error::Error for FetchError {}
