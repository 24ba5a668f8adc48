//! Single-call buffered HTTP fetch helper.
//!
//! # Overview
//! One function-shaped surface: give `RequestExecutor::execute` a URL string
//! or a structured request description, and it issues one request, buffers
//! the whole response body, classifies it by `Content-Type`, and settles a
//! single-shot `CompletionHandle` with a normalized result or an error.
//!
//! # Design
//! - Input is normalized into an `EffectiveRequest` before any I/O, so every
//!   failure in that phase rejects without a connection attempt.
//! - The transport is an injected trait reporting wire-level signals
//!   (response/data/end/close/error) as data; `UreqTransport` is the
//!   production implementation and tests script sequences directly.
//! - The handle settles exactly once; whichever terminal signal arrives
//!   first decides the outcome, later signals are ignored.
//! - No retries, no timeouts, no redirects, no streaming: one buffered
//!   exchange per call, nothing shared between calls.

pub mod error;
pub mod executor;
pub mod handle;
pub mod http;
pub mod transport;

pub use error::FetchError;
pub use executor::RequestExecutor;
pub use handle::{CompletionHandle, Outcome};
pub use http::{
    EffectiveRequest, RawResponse, RequestInput, RequestSpec, ResponseBody, ResponseResult,
    Target, TargetOverrides, UrlField,
};
pub use transport::{Transport, TransportEvent, UreqTransport};
