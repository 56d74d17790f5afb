use reqwest::header::CONTENT_TYPE;

use crate::transport::Transport;
use crate::transport::transport_model::{Method, RawResponse, Request};
use crate::ui::error::ClientError;

/// HTTP Basic credentials attached to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Blocking reqwest transport rooted at the server's base URL.
pub struct HttpTransport {
    pub base_url: String,
    credentials: Option<Credentials>,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<RawResponse, ClientError> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self
                .client
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .body(request.body.clone().unwrap_or_else(|| "null".to_string())),
        };

        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = builder.send().map_err(|e| ClientError::Network {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .text()
            .map_err(|e| ClientError::Network { url, source: e })?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
