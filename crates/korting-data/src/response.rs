//! API response handling.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::endpoint::Endpoint;
use crate::error::DataSourceError;

/// A raw response handed back by the transport.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A 200 response carrying a JSON body.
    pub fn json_ok(body: impl Into<Vec<u8>>) -> Self {
        let headers = HashMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        Self::new(200, headers, body.into())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, DataSourceError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| DataSourceError::Decode(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DataSourceError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The API reports failures as `{"error": "..."}`; that message is used
    /// when present.
    pub fn error_for_status(self, endpoint: Endpoint) -> Result<Self, DataSourceError> {
        if self.is_success() {
            return Ok(self);
        }

        let message = self
            .json::<ErrorBody>()
            .map(|b| b.error)
            .or_else(|_| self.text())
            .unwrap_or_else(|_| "Unknown error".to_string());

        if self.status == 404 {
            return Err(DataSourceError::NotFound(format!("{}: {}", endpoint, message)));
        }
        Err(DataSourceError::Http {
            status: self.status,
            endpoint: endpoint.to_string(),
            message,
        })
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    error: String,
}
