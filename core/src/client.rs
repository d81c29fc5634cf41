//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Every successful response, creation included, arrives with HTTP 200; the
//! envelope's own `code` is not checked.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, DeletedCount, Envelope, Health, Todo, UpdateTodo};

const API_PREFIX: &str = "/api/v1";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn todos_url(&self) -> String {
        format!("{}{API_PREFIX}/todos", self.base_url)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_health(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/health", self.base_url))
    }

    /// List todos, optionally only those whose `completed` flag matches.
    pub fn build_list_todos(&self, completed: Option<bool>) -> HttpRequest {
        let path = match completed {
            Some(completed) => format!("{}?completed={completed}", self.todos_url()),
            None => self.todos_url(),
        };
        self.bare(HttpMethod::Get, path)
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/{id}", self.todos_url()))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, self.todos_url(), input)
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, format!("{}/{id}", self.todos_url()), input)
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/{id}", self.todos_url()))
    }

    pub fn build_delete_completed(&self) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/completed", self.todos_url()))
    }

    pub fn build_delete_all(&self) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/all", self.todos_url()))
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<Health, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_data(response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        decode::<Envelope<serde_json::Value>>(&response.body)?;
        Ok(())
    }

    /// Returns the number of completed todos the server removed.
    pub fn parse_delete_completed(&self, response: HttpResponse) -> Result<u64, ApiError> {
        parse_data::<DeletedCount>(response).map(|d| d.deleted_count)
    }

    /// Returns the number of todos that existed before the call.
    pub fn parse_delete_all(&self, response: HttpResponse) -> Result<u64, ApiError> {
        parse_data::<DeletedCount>(response).map(|d| d.deleted_count)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Check the status, decode the envelope and return its `data`.
fn parse_data<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    decode::<Envelope<T>>(&response.body)?
        .data
        .ok_or(ApiError::MissingData)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        404 => Err(ApiError::NotFound {
            message: error_message(&response.body),
        }),
        422 => Err(ApiError::Validation {
            message: error_message(&response.body),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// The `message` of an error body, or the raw body if it is not JSON.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
