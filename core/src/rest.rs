//! Request builder and response parser for the REST author/order service.
//!
//! # Design
//! `RestClient` holds only the API base URL. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes the matching `HttpResponse`, so the I/O boundary stays explicit.

use serde::de::DeserializeOwned;

use crate::error::RemoteError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Author, AuthorInput, OrderRequest, OrderResponse};

#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_authors(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/authors", self.base_url))
    }

    pub fn build_create_author(&self, input: &AuthorInput) -> Result<HttpRequest, RemoteError> {
        let body = serde_json::to_string(input).map_err(|e| RemoteError::Encode(e.to_string()))?;
        Ok(HttpRequest::post_json(format!("{}/authors", self.base_url), body))
    }

    pub fn build_delete_author(&self, id: &str) -> HttpRequest {
        HttpRequest::delete(format!("{}/authors/{id}", self.base_url))
    }

    pub fn build_submit_order(&self, order: &OrderRequest) -> Result<HttpRequest, RemoteError> {
        let body = serde_json::to_string(order).map_err(|e| RemoteError::Encode(e.to_string()))?;
        Ok(HttpRequest::post_json(format!("{}/order", self.base_url), body))
    }

    pub fn parse_list_authors(&self, response: HttpResponse) -> Result<Vec<Author>, RemoteError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_author(&self, response: HttpResponse) -> Result<Author, RemoteError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_delete_author(&self, response: HttpResponse) -> Result<(), RemoteError> {
        check_status(&response)
    }

    /// A reachable server answers with `{status, message}` whatever the
    /// business outcome; only the call failing is an error here.
    pub fn parse_submit_order(&self, response: HttpResponse) -> Result<OrderResponse, RemoteError> {
        check_status(&response)?;
        decode(&response.body)
    }
}

/// Map non-2xx status codes to the appropriate `RemoteError` variant.
fn check_status(response: &HttpResponse) -> Result<(), RemoteError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(RemoteError::NotFound);
    }
    Err(RemoteError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::Decode(e.to_string()))
}
