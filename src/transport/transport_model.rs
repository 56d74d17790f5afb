use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::ui::error::ClientError;

/// The only two verbs the server routes understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(ClientError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A request handed to a `Transport`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Serialized JSON body. Only ever set for POST.
    pub body: Option<String>,
}

impl Request {
    pub fn get(path: &str) -> Self {
        Request {
            method: Method::Get,
            path: path.to_string(),
            body: None,
        }
    }

    /// POST with a JSON body. An absent payload is sent as JSON `null`.
    pub fn post(path: &str, payload: Option<&Value>) -> Result<Self, ClientError> {
        let body = serde_json::to_string(payload.unwrap_or(&Value::Null)).map_err(|e| {
            ClientError::JsonSerialize {
                context: format!("POST {}", path),
                source: e,
            }
        })?;
        Ok(Request {
            method: Method::Post,
            path: path.to_string(),
            body: Some(body),
        })
    }
}

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only an exact `application/json` content type is read as JSON.
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref() == Some("application/json")
    }
}

/// Interpreted payload of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Json(Value),
    Html(String),
}

impl FetchResult {
    pub fn into_html(self) -> Option<String> {
        match self {
            FetchResult::Html(h) => Some(h),
            FetchResult::Json(_) => None,
        }
    }

    /// The `message` field of a JSON payload, if there is one.
    pub fn message(&self) -> Option<&str> {
        match self {
            FetchResult::Json(v) => v.get("message").and_then(Value::as_str),
            FetchResult::Html(_) => None,
        }
    }
}
