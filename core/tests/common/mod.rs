//! Scripted transport shared by the storefront tests.
//!
//! Responses are consumed in call order. Every executed request is recorded
//! so tests can assert on exactly what would have gone over the wire.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use storefront_core::{Author, Book, HttpRequest, HttpResponse, RemoteError, Transport};

struct Scripted {
    delay: Option<Duration>,
    response: Result<HttpResponse, RemoteError>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push(None, Ok(HttpResponse::new(status, body.to_string())));
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.push(None, Ok(HttpResponse::new(status, body)));
    }

    pub fn push_delayed_json(&self, delay: Duration, status: u16, body: Value) {
        self.push(Some(delay), Ok(HttpResponse::new(status, body.to_string())));
    }

    pub fn push_error(&self, error: RemoteError) {
        self.push(None, Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_bodies(&self) -> Vec<Value> {
        self.requests()
            .iter()
            .map(|req| {
                req.body
                    .as_deref()
                    .map(|body| serde_json::from_str(body).unwrap())
                    .unwrap_or(Value::Null)
            })
            .collect()
    }

    fn push(&self, delay: Option<Duration>, response: Result<HttpResponse, RemoteError>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted { delay, response });
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RemoteError> {
        let next = self.script.lock().unwrap().pop_front();
        let Some(next) = next else {
            panic!("unscripted request: {} {}", request.method.as_str(), request.path);
        };
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = next.delay {
            tokio::time::sleep(delay).await;
        }
        next.response
    }
}

pub fn book(id: &str, name: &str, price: f64) -> Book {
    Book {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} description"),
        price,
    }
}

pub fn author(id: &str, name: &str) -> Author {
    Author {
        id: id.to_string(),
        name: name.to_string(),
        birth_date: "1931-04-19".to_string(),
    }
}

pub fn books_payload(books: &[Book]) -> Value {
    json!({ "data": { "getAllBooks": books } })
}

pub fn created_book_payload(book: &Book) -> Value {
    json!({ "data": { "createBook": book } })
}

pub fn authors_payload(authors: &[Author]) -> Value {
    json!(authors)
}
