//! Request/response data model for the fetch helper.
//!
//! # Design
//! These types describe one HTTP exchange as plain data. Caller input is
//! normalized into an `EffectiveRequest` before any I/O happens, so the
//! transport only ever sees a fully resolved method, target, header list and
//! optional body. All fields use owned types (`String`, `Vec`) so values can
//! be moved into a settled `CompletionHandle` without lifetime concerns.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FetchError;

/// The resolved destination of a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    pub scheme: String,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "root_path")]
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
}

fn root_path() -> String {
    "/".to_string()
}

impl Target {
    /// Split an absolute URL string into target fields.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let parsed = url::Url::parse(raw).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(format!("no host in {raw}")))?
            .to_string();
        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
            port: parsed.port(),
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
        })
    }

    /// Reassemble the absolute URL for the transport.
    pub fn to_url(&self) -> String {
        let mut out = format!("{}://{}", self.scheme, self.host);
        if let Some(port) = self.port {
            out.push_str(&format!(":{port}"));
        }
        // Caller-supplied targets may carry a bare path.
        if !self.path.starts_with('/') {
            out.push('/');
        }
        out.push_str(&self.path);
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        out
    }
}

/// Caller-supplied input: a bare URL or a structured request description.
#[derive(Debug, Clone)]
pub enum RequestInput {
    /// URL string, implying `GET` with no body and no extra headers.
    Url(String),
    Spec(RequestSpec),
}

/// The `url` field of a structured input: raw text still to be parsed, or an
/// already resolved target supplied by the caller.
#[derive(Debug, Clone)]
pub enum UrlField {
    Raw(String),
    Resolved(Target),
}

/// Target fields supplied directly on a structured input. Fields present
/// here take precedence over the values parsed from `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetOverrides {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub query: Option<String>,
}

impl TargetOverrides {
    fn apply(self, target: &mut Target) {
        if let Some(scheme) = self.scheme {
            target.scheme = scheme;
        }
        if let Some(host) = self.host {
            target.host = host;
        }
        if let Some(port) = self.port {
            target.port = Some(port);
        }
        if let Some(path) = self.path {
            target.path = path;
        }
        if let Some(query) = self.query {
            target.query = Some(query);
        }
    }
}

/// Structured request description. Only `url` is required; `method` defaults
/// to `GET` during normalization and `overrides` win over the parsed URL.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub url: UrlField,
    pub method: Option<String>,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub overrides: TargetOverrides,
}

impl RequestInput {
    /// Classify a dynamic JSON value into a `RequestInput`.
    ///
    /// A string is a URL, an object is a request description. Anything else
    /// (number, boolean, null, array) is rejected with `MissingUrl` before
    /// any network activity. An object whose `url` field is absent or of the
    /// wrong type is rejected the same way.
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        let map = match value {
            Value::String(raw) => return Ok(RequestInput::Url(raw)),
            Value::Object(map) => map,
            _ => return Err(FetchError::MissingUrl),
        };
        let url = match map.get("url") {
            Some(Value::String(raw)) => UrlField::Raw(raw.clone()),
            Some(value @ Value::Object(_)) => {
                let target = serde_json::from_value(value.clone())
                    .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
                UrlField::Resolved(target)
            }
            _ => return Err(FetchError::MissingUrl),
        };
        let method = match map.get("method") {
            Some(Value::String(method)) => Some(method.clone()),
            _ => None,
        };
        let headers = match map.get("headers") {
            Some(Value::Object(entries)) => entries
                .iter()
                .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
                .collect(),
            _ => Vec::new(),
        };
        let overrides = TargetOverrides {
            scheme: string_field(&map, "scheme"),
            host: string_field(&map, "host"),
            port: map
                .get("port")
                .and_then(Value::as_u64)
                .and_then(|port| u16::try_from(port).ok()),
            path: string_field(&map, "path"),
            query: string_field(&map, "query"),
        };
        Ok(RequestInput::Spec(RequestSpec {
            url,
            method,
            body: map.get("body").cloned(),
            headers,
            overrides,
        }))
    }
}

fn string_field(map: &Map<String, Value>, name: &str) -> Option<String> {
    map.get(name).and_then(Value::as_str).map(str::to_string)
}

/// The fully normalized request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveRequest {
    pub target: Target,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl EffectiveRequest {
    /// Normalize caller input into a transport-level request.
    ///
    /// A structured (object or array) body is serialized to JSON text and
    /// `Content-Type`/`Accept` are forced to `application/json`. A string
    /// body passes through unchanged. Any other body type (number, boolean,
    /// null, absent) sends no payload at all.
    pub fn resolve(input: RequestInput) -> Result<Self, FetchError> {
        let (target, method, body, mut headers) = match input {
            RequestInput::Url(raw) => (Target::parse(&raw)?, None, None, Vec::new()),
            RequestInput::Spec(spec) => {
                let mut target = match spec.url {
                    UrlField::Raw(raw) => Target::parse(&raw)?,
                    UrlField::Resolved(target) => target,
                };
                spec.overrides.apply(&mut target);
                (target, spec.method, spec.body, spec.headers)
            }
        };
        let method = method.unwrap_or_else(|| "GET".to_string());
        let body = match body {
            Some(Value::String(text)) => Some(text),
            Some(value @ (Value::Object(_) | Value::Array(_))) => {
                set_header(&mut headers, "Content-Type", "application/json");
                set_header(&mut headers, "Accept", "application/json");
                Some(value.to_string())
            }
            _ => None,
        };
        Ok(Self {
            target,
            method,
            headers,
            body,
        })
    }
}

/// Insert or replace a header, matching the name case-insensitively.
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some(entry) = headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        entry.1 = value.to_string();
    } else {
        headers.push((name.to_string(), value.to_string()));
    }
}

/// Look up a header value by case-insensitive name.
pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Normalized success value delivered through the `CompletionHandle`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

/// Response body after content-type classification: raw text, or the parsed
/// value when the response declared `application/json`.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Json(Value),
}

/// Undecoded response attached to JSON parse failures for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
