//! `reqwest` implementation of [`HttpBackend`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{multipart, Client};

use super::{ApiRequest, HttpBackend, Method, RawResponse, RequestBody};
use crate::error::{ConsoleError, Result};

/// Talks to the backend over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
    base_url: String,
}

impl ReqwestBackend {
    /// Creates a backend rooted at `base_url` (for example
    /// `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Configuration` if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(part) => {
                let file = multipart::Part::bytes(part.bytes.clone())
                    .file_name(part.file_name.clone());
                let mut form = multipart::Form::new().part(part.field.clone(), file);
                for (name, value) in &part.fields {
                    form = form.text(name.clone(), value.clone());
                }
                builder.multipart(form)
            }
        };

        debug!("{request}");
        let response = builder.send().await.map_err(ConsoleError::network)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ConsoleError::network)?;
        debug!("{request} -> {status}");
        Ok(RawResponse { status, body })
    }
}
