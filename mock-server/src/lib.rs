use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

/// Fixture endpoints covering every response classification path of the
/// fetch core: valid JSON, plain text, malformed JSON under a JSON content
/// type, a response with no Content-Type at all, and an echo endpoint that
/// reflects the incoming request for request-side assertions.
pub fn app() -> Router {
    Router::new()
        .route("/json", get(json_document))
        .route("/text", get(plain_text))
        .route("/bad-json", get(bad_json))
        .route("/bare", get(bare))
        .route("/echo", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn json_document() -> Json<Value> {
    Json(json!({ "service": "mock", "items": [1, 2, 3] }))
}

async fn plain_text() -> &'static str {
    "plain text body"
}

/// Declares application/json but the body does not parse.
async fn bad_json() -> Response {
    ([(header::CONTENT_TYPE, "application/json")], "{bad").into_response()
}

/// A body with no Content-Type header at all.
async fn bare() -> Response {
    Response::new(Body::from("no declared type"))
}

async fn echo(request: Request) -> Result<Json<Value>, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let headers: Map<String, Value> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::from(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();
    Ok(Json(json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "headers": headers,
        "body": String::from_utf8_lossy(&bytes),
    })))
}
