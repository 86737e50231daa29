//! Request adapters: a protocol client paired with a transport.
//!
//! Each call is one request in flight, no retry. Failures come back as
//! [`RemoteError`] for the orchestrator to handle.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::RemoteError;
use crate::graphql::GraphqlClient;
use crate::rest::RestClient;
use crate::transport::Transport;
use crate::types::{Author, AuthorInput, Book, BookInput, OrderRequest, OrderResponse};

/// Book CRUD over the GraphQL service.
#[derive(Clone)]
pub struct BooksApi {
    client: GraphqlClient,
    transport: Arc<dyn Transport>,
}

impl BooksApi {
    pub fn new(client: GraphqlClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    #[instrument(skip(self))]
    pub async fn run_books_query(&self) -> Result<Vec<Book>, RemoteError> {
        let request = self.client.build_get_books()?;
        let response = self.transport.execute(request).await?;
        let books = self.client.parse_get_books(response)?;
        debug!(count = books.len(), "books fetched");
        Ok(books)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn run_create_book_mutation(&self, input: &BookInput) -> Result<Book, RemoteError> {
        let request = self.client.build_create_book(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_book(response)
    }

    #[instrument(skip(self))]
    pub async fn run_delete_book_mutation(&self, id: &str) -> Result<(), RemoteError> {
        let request = self.client.build_delete_book(id)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_book(response)
    }
}

/// Author CRUD and order submission over the REST service.
#[derive(Clone)]
pub struct StoreApi {
    client: RestClient,
    transport: Arc<dyn Transport>,
}

impl StoreApi {
    pub fn new(client: RestClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    #[instrument(skip(self))]
    pub async fn fetch_authors(&self) -> Result<Vec<Author>, RemoteError> {
        let request = self.client.build_list_authors();
        let response = self.transport.execute(request).await?;
        let authors = self.client.parse_list_authors(response)?;
        debug!(count = authors.len(), "authors fetched");
        Ok(authors)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_author(&self, input: &AuthorInput) -> Result<Author, RemoteError> {
        let request = self.client.build_create_author(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_author(response)
    }

    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: &str) -> Result<(), RemoteError> {
        let request = self.client.build_delete_author(id);
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_author(response)
    }

    /// Returns the decoded `{status, message}` whatever the business status.
    #[instrument(skip(self, order), fields(lines = order.line_items.len()))]
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, RemoteError> {
        debug!(?order, "submit_order called");
        let request = self.client.build_submit_order(order)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_submit_order(response)
    }
}
