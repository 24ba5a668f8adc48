//! End-to-end test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `RequestExecutor`
//! with the production `UreqTransport` over real HTTP, covering each
//! response classification path and the pre-I/O rejections.

use fetch_core::{
    FetchError, RequestExecutor, RequestInput, RequestSpec, ResponseBody, TargetOverrides,
    UreqTransport, UrlField,
};
use serde_json::json;

fn start_mock_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn buffered_fetch_lifecycle() {
    let addr = start_mock_server();
    let executor = RequestExecutor::new(UreqTransport::new());

    // JSON response: body arrives parsed.
    let handle = executor.execute(RequestInput::Url(format!("http://{addr}/json")));
    let result = handle.take().unwrap().unwrap();
    assert_eq!(result.status_code, 200);
    match &result.body {
        ResponseBody::Json(value) => {
            assert_eq!(value["service"], "mock");
            assert_eq!(value["items"], json!([1, 2, 3]));
        }
        other => panic!("expected parsed JSON, got {other:?}"),
    }

    // Plain-text response: body stays raw.
    let handle = executor.execute(RequestInput::Url(format!("http://{addr}/text")));
    let result = handle.take().unwrap().unwrap();
    assert_eq!(result.body, ResponseBody::Text("plain text body".to_string()));

    // Bodiless request: nothing on the wire, not an empty payload.
    let handle = executor.execute(RequestInput::Url(format!("http://{addr}/echo")));
    let result = handle.take().unwrap().unwrap();
    let echo = match result.body {
        ResponseBody::Json(value) => value,
        other => panic!("expected echo JSON, got {other:?}"),
    };
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["body"], "");
    assert!(
        echo["headers"].get("content-length").is_none(),
        "bodiless GET must not announce a payload: {:?}",
        echo["headers"]
    );

    // Target overrides win over the fields parsed from the URL.
    let handle = executor.execute(RequestInput::Spec(RequestSpec {
        url: UrlField::Raw(format!("http://{addr}/text")),
        method: None,
        body: None,
        headers: Vec::new(),
        overrides: TargetOverrides {
            path: Some("/json".to_string()),
            ..TargetOverrides::default()
        },
    }));
    let result = handle.take().unwrap().unwrap();
    match &result.body {
        ResponseBody::Json(value) => assert_eq!(value["service"], "mock"),
        other => panic!("expected overridden path to reach /json, got {other:?}"),
    }

    // Structured body: serialized JSON plus forced headers, visible in the echo.
    let handle = executor.execute(RequestInput::Spec(RequestSpec {
        url: UrlField::Raw(format!("http://{addr}/echo")),
        method: Some("POST".to_string()),
        body: Some(json!({ "k": "v" })),
        headers: vec![("x-trace".to_string(), "abc123".to_string())],
        overrides: TargetOverrides::default(),
    }));
    let result = handle.take().unwrap().unwrap();
    let echo = match result.body {
        ResponseBody::Json(value) => value,
        other => panic!("expected echo JSON, got {other:?}"),
    };
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["body"], r#"{"k":"v"}"#);
    assert_eq!(echo["headers"]["content-type"], "application/json");
    assert_eq!(echo["headers"]["accept"], "application/json");
    assert_eq!(echo["headers"]["x-trace"], "abc123");

    // String body: transmitted verbatim, no forced headers.
    let handle = executor.execute(RequestInput::Spec(RequestSpec {
        url: UrlField::Raw(format!("http://{addr}/echo")),
        method: Some("PUT".to_string()),
        body: Some(json!("raw payload")),
        headers: Vec::new(),
        overrides: TargetOverrides::default(),
    }));
    let result = handle.take().unwrap().unwrap();
    let echo = match result.body {
        ResponseBody::Json(value) => value,
        other => panic!("expected echo JSON, got {other:?}"),
    };
    assert_eq!(echo["body"], "raw payload");

    // Declared JSON that does not parse: rejected with the raw response.
    let handle = executor.execute(RequestInput::Url(format!("http://{addr}/bad-json")));
    let err = handle.take().unwrap().unwrap_err();
    match err {
        FetchError::BodyParse { response, .. } => {
            assert_eq!(response.status_code, 200);
            assert_eq!(response.body, "{bad");
        }
        other => panic!("expected BodyParse, got {other:?}"),
    }

    // No Content-Type header at all: a defined failure, not a fallback.
    let handle = executor.execute(RequestInput::Url(format!("http://{addr}/bare")));
    let err = handle.take().unwrap().unwrap_err();
    assert_eq!(err, FetchError::MissingContentType);
}

#[test]
fn connect_failure_rejects_with_transport_error() {
    // Bind and immediately drop a listener to get a port nobody serves.
    let dead = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let executor = RequestExecutor::new(UreqTransport::new());
    let handle = executor.execute(RequestInput::Url(format!("http://{dead_addr}/json")));
    let err = handle.take().unwrap().unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[test]
fn invalid_input_rejects_before_any_io() {
    let executor = RequestExecutor::new(UreqTransport::new());
    let err = executor.execute_value(json!(42)).take().unwrap().unwrap_err();
    assert_eq!(err, FetchError::MissingUrl);
    assert_eq!(err.to_string(), "Missing URL");
}
