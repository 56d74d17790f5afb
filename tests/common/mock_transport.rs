use std::cell::RefCell;
use std::collections::HashMap;

use psycho_client::transport::Transport;
use psycho_client::transport::transport_model::{Method, RawResponse, Request};
use psycho_client::ClientError;
use serde_json::{Value, json};

enum Reply {
    Respond(RawResponse),
    Fail(String),
}

/// In-memory server: one canned reply per (method, path), every request
/// recorded. Unrouted requests get the server's 404 JSON.
pub struct MockTransport {
    routes: HashMap<(Method, String), Reply>,
    requests: RefCell<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn on_json(mut self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            Reply::Respond(RawResponse {
                status,
                content_type: Some("application/json".into()),
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn on_html(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.on_raw(method, path, status, Some("text/html; charset=utf-8"), body)
    }

    pub fn on_raw(
        mut self,
        method: Method,
        path: &str,
        status: u16,
        content_type: Option<&str>,
        body: &str,
    ) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            Reply::Respond(RawResponse {
                status,
                content_type: content_type.map(|c| c.to_string()),
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn on_failure(mut self, method: Method, path: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            Reply::Fail("connection reset".into()),
        );
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Parsed JSON body of the most recent request to `path`.
    pub fn last_body(&self, path: &str) -> Option<Value> {
        self.requests
            .borrow()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .and_then(|r| r.body.as_deref())
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<RawResponse, ClientError> {
        self.requests.borrow_mut().push(request.clone());

        match self.routes.get(&(request.method, request.path.clone())) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Fail(msg)) => Err(ClientError::Transport(msg.clone())),
            None => Ok(RawResponse {
                status: 404,
                content_type: Some("application/json".into()),
                body: json!({ "message": "Resource not recognised" }).to_string(),
            }),
        }
    }
}
