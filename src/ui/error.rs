use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    /// Method other than GET or POST was requested (programming error)
    UnsupportedMethod(String),

    /// The HTTP exchange itself failed (connection refused, broken body, ...)
    Network { url: String, source: reqwest::Error },

    /// Exchange failed in a transport that is not backed by HTTP
    Transport(String),

    /// JSON parsing failed (response body or typed payload)
    JsonParse { context: String, source: serde_json::Error },

    /// JSON serialization failed (request body)
    JsonSerialize { context: String, source: serde_json::Error },

    /// HTML fragment could not be parsed into the document
    HtmlParse(String),

    /// No form is rendered and none could be fetched
    FormUnavailable,

    /// Named field (or option value) is not present in the rendered form
    FieldNotFound { field: String, context: String },

    /// Endpoint answered with a payload of the wrong kind
    UnexpectedContent { path: String, expected: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::UnsupportedMethod(method) => {
                write!(f, "Only `GET` and `POST` requests are supported (got `{}`)", method)
            }
            ClientError::Network { url, source } => {
                write!(f, "Request to {} failed: {}", url, source)
            }
            ClientError::Transport(msg) => {
                write!(f, "Transport error: {}", msg)
            }
            ClientError::JsonParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            ClientError::JsonSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            ClientError::HtmlParse(msg) => {
                write!(f, "HTML parse error: {}", msg)
            }
            ClientError::FormUnavailable => {
                write!(f, "Failed to load form")
            }
            ClientError::FieldNotFound { field, context } => {
                write!(f, "Field '{}' not found: {}", field, context)
            }
            ClientError::UnexpectedContent { path, expected } => {
                write!(f, "Unexpected response from {} (expected {})", path, expected)
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Network { source, .. } => Some(source),
            ClientError::JsonParse { source, .. } => Some(source),
            ClientError::JsonSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
