//! Transport seam: the wire-level signals and the ureq-backed implementation.
//!
//! # Design
//! The executor never talks to a socket directly. A `Transport` issues one
//! request and reports what happened as a sequence of `TransportEvent`s in
//! arrival order, mirroring the error/response/data/end/close signals of a
//! socket-level exchange. Tests script these sequences directly; production
//! code uses `UreqTransport`.

use crate::http::EffectiveRequest;

/// Wire-level signals for one exchange, delivered in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Status line and headers arrived.
    Response {
        status: u16,
        headers: Vec<(String, String)>,
    },
    /// A chunk of the response body arrived.
    Data(String),
    /// The response completed normally.
    End,
    /// The connection closed before the response completed.
    Closed,
    /// Connecting or sending failed outright.
    Error(String),
}

/// Issues one request and reports the resulting signal sequence.
pub trait Transport {
    fn send(&self, request: &EffectiveRequest) -> Vec<TransportEvent>;
}

/// Production transport on ureq.
///
/// Status-as-error is disabled so 4xx/5xx responses arrive as data rather
/// than `Err`; the executor does not interpret status codes at all.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &EffectiveRequest) -> Vec<TransportEvent> {
        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(request.target.to_url());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // Send no payload at all when there is no body, rather than an
        // explicit empty one.
        let outcome = match &request.body {
            Some(body) => match builder.body(body.clone()) {
                Ok(wire_request) => self.agent.run(wire_request),
                Err(err) => return vec![TransportEvent::Error(err.to_string())],
            },
            None => match builder.body(()) {
                Ok(wire_request) => self.agent.run(wire_request),
                Err(err) => return vec![TransportEvent::Error(err.to_string())],
            },
        };
        let mut response = match outcome {
            Ok(response) => response,
            Err(err) => return vec![TransportEvent::Error(err.to_string())],
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let mut events = vec![TransportEvent::Response { status, headers }];
        match response.body_mut().read_to_string() {
            Ok(text) => {
                if !text.is_empty() {
                    events.push(TransportEvent::Data(text));
                }
                events.push(TransportEvent::End);
            }
            // The peer went away mid-body; the exchange never completed.
            Err(_) => events.push(TransportEvent::Closed),
        }
        events
    }
}
