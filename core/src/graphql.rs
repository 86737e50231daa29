//! Request builder and response parser for the GraphQL book service.
//!
//! # Design
//! Every operation is a `POST` of `{operationName, query, variables}` to a
//! single endpoint. Responses share one envelope, `{data, errors}`; a
//! non-empty `errors` array wins over any partial `data`. Like
//! [`RestClient`](crate::rest::RestClient), the client never touches the
//! network itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RemoteError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Book, BookInput};

pub const GET_BOOKS: &str = "query GetBooks {
  getAllBooks {
    id
    name
    description
    price
  }
}";

pub const CREATE_BOOK: &str = "mutation CreateBook($bookRequest: BookRequest!) {
  createBook(bookRequest: $bookRequest) {
    id
    name
    description
    price
  }
}";

pub const DELETE_BOOK: &str = "mutation DeleteBook($id: ID!) {
  deleteBook(id: $id)
}";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Operation<'a> {
    operation_name: &'a str,
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBooksData {
    get_all_books: Vec<Book>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookData {
    create_book: Book,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBookData {
    delete_book: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_get_books(&self) -> Result<HttpRequest, RemoteError> {
        self.operation("GetBooks", GET_BOOKS, json!({}))
    }

    pub fn build_create_book(&self, input: &BookInput) -> Result<HttpRequest, RemoteError> {
        let input = serde_json::to_value(input).map_err(|e| RemoteError::Encode(e.to_string()))?;
        self.operation("CreateBook", CREATE_BOOK, json!({ "bookRequest": input }))
    }

    pub fn build_delete_book(&self, id: &str) -> Result<HttpRequest, RemoteError> {
        self.operation("DeleteBook", DELETE_BOOK, json!({ "id": id }))
    }

    pub fn parse_get_books(&self, response: HttpResponse) -> Result<Vec<Book>, RemoteError> {
        let data: GetBooksData = unwrap_envelope(response)?;
        Ok(data.get_all_books)
    }

    pub fn parse_create_book(&self, response: HttpResponse) -> Result<Book, RemoteError> {
        let data: CreateBookData = unwrap_envelope(response)?;
        Ok(data.create_book)
    }

    /// `deleteBook` answers with a boolean-ish scalar; anything falsy or
    /// missing counts as a refusal.
    pub fn parse_delete_book(&self, response: HttpResponse) -> Result<(), RemoteError> {
        let data: DeleteBookData = unwrap_envelope(response)?;
        if data.delete_book.as_ref().is_some_and(is_truthy) {
            Ok(())
        } else {
            Err(RemoteError::NotAcknowledged("deleteBook".to_string()))
        }
    }

    fn operation(&self, name: &str, query: &str, variables: Value) -> Result<HttpRequest, RemoteError> {
        let body = serde_json::to_string(&Operation {
            operation_name: name,
            query,
            variables,
        })
        .map_err(|e| RemoteError::Encode(e.to_string()))?;
        Ok(HttpRequest::post_json(self.endpoint.clone(), body))
    }
}

fn unwrap_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<T, RemoteError> {
    if !response.is_success() {
        return Err(RemoteError::Http {
            status: response.status,
            body: response.body,
        });
    }
    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| RemoteError::Decode(e.to_string()))?;
    if !envelope.errors.is_empty() {
        return Err(RemoteError::Graphql(
            envelope.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    envelope
        .data
        .ok_or_else(|| RemoteError::Decode("response carried no data".to_string()))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
