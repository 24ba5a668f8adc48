//! The single-call request executor.
//!
//! # Design
//! `RequestExecutor` owns an injected `Transport` and nothing else; every
//! call normalizes its input, performs one exchange, and settles a fresh
//! `CompletionHandle`. The transport's signal sequence drives a small state
//! machine: the response head is recorded, body chunks accumulate into one
//! buffer, and the first terminal signal (end, close, or error) settles the
//! handle. Signals after settlement are ignored.

use serde_json::Value;

use crate::error::FetchError;
use crate::handle::CompletionHandle;
use crate::http::{
    header_value, EffectiveRequest, RawResponse, RequestInput, ResponseBody, ResponseResult,
};
use crate::transport::{Transport, TransportEvent};

/// JSON detection compares the first 16 characters of the Content-Type value,
/// so parameters like `; charset=utf-8` do not defeat the match.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Executes one buffered HTTP request per call.
pub struct RequestExecutor<T> {
    transport: T,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Issue one request and settle a fresh handle with the outcome.
    ///
    /// Normalization failures reject the handle before any I/O. Otherwise the
    /// transport runs exactly once and its signals decide the outcome.
    pub fn execute(&self, input: RequestInput) -> CompletionHandle {
        let handle = CompletionHandle::new();
        let request = match EffectiveRequest::resolve(input) {
            Ok(request) => request,
            Err(err) => {
                handle.reject(err);
                return handle;
            }
        };

        let mut head: Option<(u16, Vec<(String, String)>)> = None;
        let mut buffer = String::new();
        for event in self.transport.send(&request) {
            if handle.is_settled() {
                break;
            }
            match event {
                TransportEvent::Response { status, headers } => {
                    head = Some((status, headers));
                }
                TransportEvent::Data(chunk) => buffer.push_str(&chunk),
                TransportEvent::End => {
                    complete(&handle, head.take(), std::mem::take(&mut buffer));
                }
                TransportEvent::Closed => {
                    handle.reject(FetchError::ConnectionClosed);
                }
                TransportEvent::Error(message) => {
                    handle.reject(FetchError::Transport(message));
                }
            }
        }
        // A signal sequence that dries up without any terminal signal is a
        // premature close.
        if !handle.is_settled() {
            handle.reject(FetchError::ConnectionClosed);
        }
        handle
    }

    /// Dynamic entry point accepting any JSON value as input.
    ///
    /// A string is a URL, an object is a request description; anything else
    /// yields an already-rejected handle without touching the transport.
    pub fn execute_value(&self, input: Value) -> CompletionHandle {
        match RequestInput::from_value(input) {
            Ok(input) => self.execute(input),
            Err(err) => {
                let handle = CompletionHandle::new();
                handle.reject(err);
                handle
            }
        }
    }
}

/// Classify the buffered body and settle the handle.
fn complete(handle: &CompletionHandle, head: Option<(u16, Vec<(String, String)>)>, buffer: String) {
    let Some((status_code, headers)) = head else {
        // End arrived before any response head: the exchange never happened.
        handle.reject(FetchError::ConnectionClosed);
        return;
    };
    let Some(content_type) = header_value(&headers, "content-type") else {
        handle.reject(FetchError::MissingContentType);
        return;
    };
    let body = if content_type.get(..JSON_CONTENT_TYPE.len()) == Some(JSON_CONTENT_TYPE) {
        match serde_json::from_str(&buffer) {
            Ok(value) => ResponseBody::Json(value),
            Err(err) => {
                handle.reject(FetchError::BodyParse {
                    message: err.to_string(),
                    response: RawResponse {
                        status_code,
                        headers,
                        body: buffer,
                    },
                });
                return;
            }
        }
    } else {
        ResponseBody::Text(buffer)
    };
    handle.resolve(ResponseResult {
        status_code,
        headers,
        body,
    });
}
