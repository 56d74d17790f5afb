use mockito::Matcher;
use psycho_client::transport::Transport;
use psycho_client::transport::http::{Credentials, HttpTransport};
use psycho_client::transport::transport_model::{FetchResult, Method, RawResponse, Request};
use psycho_client::ClientError;
use serde_json::json;

// ============================================================================
// Request model
// ============================================================================

#[test]
fn method_parses_get_and_post_only() {
    assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
    assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);

    for bad in ["PUT", "DELETE", "get", ""] {
        match bad.parse::<Method>() {
            Err(ClientError::UnsupportedMethod(m)) => assert_eq!(m, bad),
            other => panic!("expected UnsupportedMethod for {:?}, got {:?}", bad, other),
        }
    }
}

#[test]
fn unsupported_method_message_names_allowed_verbs() {
    let err = "PATCH".parse::<Method>().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("GET") && msg.contains("POST"), "{}", msg);
}

#[test]
fn post_without_payload_sends_json_null() {
    let req = Request::post("/analyze", None).unwrap();
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.body.as_deref(), Some("null"));
}

#[test]
fn post_serializes_payload() {
    let req = Request::post("/submit", Some(&json!("repeat"))).unwrap();
    assert_eq!(req.body.as_deref(), Some("\"repeat\""));
}

#[test]
fn get_has_no_body() {
    assert_eq!(Request::get("/form").body, None);
}

#[test]
fn only_exact_json_content_type_is_json() {
    let mut resp = RawResponse {
        status: 200,
        content_type: Some("application/json".into()),
        body: "{}".into(),
    };
    assert!(resp.is_json());

    resp.content_type = Some("application/json; charset=utf-8".into());
    assert!(!resp.is_json());

    resp.content_type = None;
    assert!(!resp.is_json());
}

#[test]
fn success_is_any_2xx() {
    let resp = |status| RawResponse {
        status,
        content_type: None,
        body: String::new(),
    };
    assert!(resp(200).is_success());
    assert!(resp(204).is_success());
    assert!(!resp(302).is_success());
    assert!(!resp(401).is_success());
}

#[test]
fn fetch_result_message_only_for_json() {
    assert_eq!(
        FetchResult::Json(json!({ "message": "Saved" })).message(),
        Some("Saved")
    );
    assert_eq!(FetchResult::Json(json!({ "other": 1 })).message(), None);
    assert_eq!(FetchResult::Html("<p>message</p>".into()).message(), None);
}

// ============================================================================
// HttpTransport against a local server
// ============================================================================

#[test]
fn http_get_returns_status_content_type_and_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/form")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<form name=\"psychoform\"></form>")
        .create();

    let transport = HttpTransport::new(&server.url());
    let resp = transport.send(&Request::get("/form")).unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.content_type.as_deref(), Some("text/html"));
    assert_eq!(resp.body, "<form name=\"psychoform\"></form>");
    mock.assert();
}

#[test]
fn http_post_sends_json_body_and_header() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/submit")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "color": "blue", "pets": [] })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Form submitted"}"#)
        .expect(1)
        .create();

    let transport = HttpTransport::new(&server.url());
    let req = Request::post("/submit", Some(&json!({ "color": "blue", "pets": [] }))).unwrap();
    let resp = transport.send(&req).unwrap();

    assert!(resp.is_success());
    assert!(resp.is_json());
    mock.assert();
}

#[test]
fn http_attaches_basic_auth() {
    let mut server = mockito::Server::new();
    // "user:secret" in base64
    let mock = server
        .mock("GET", "/view/input")
        .match_header("authorization", "Basic dXNlcjpzZWNyZXQ=")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create();

    let transport = HttpTransport::new(&server.url()).with_credentials(Credentials {
        username: "user".into(),
        password: "secret".into(),
    });
    let resp = transport.send(&Request::get("/view/input")).unwrap();

    assert_eq!(resp.status, 200);
    mock.assert();
}

#[test]
fn http_error_status_is_still_a_response() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/view/profile")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Server exploded"}"#)
        .create();

    let transport = HttpTransport::new(&server.url());
    let resp = transport.send(&Request::get("/view/profile")).unwrap();

    assert_eq!(resp.status, 500);
    assert!(!resp.is_success());
    assert!(resp.body.contains("Server exploded"));
}

#[test]
fn http_base_url_trailing_slash_is_ignored() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/form").with_status(200).create();

    let transport = HttpTransport::new(&format!("{}/", server.url()));
    transport.send(&Request::get("/form")).unwrap();
    mock.assert();
}

#[test]
fn http_connection_failure_is_network_error() {
    // Port 1 is reserved and nothing listens on it
    let transport = HttpTransport::new("http://127.0.0.1:1");
    match transport.send(&Request::get("/form")) {
        Err(ClientError::Network { url, .. }) => assert_eq!(url, "http://127.0.0.1:1/form"),
        other => panic!("expected Network error, got {:?}", other),
    }
}
