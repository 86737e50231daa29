//! Client-side core of the bookstore storefront.
//!
//! # Overview
//! Holds the storefront's UI state, validates form drafts, issues requests to
//! the GraphQL book service and the REST author/order service, and folds the
//! responses back into state. Rendering is someone else's job: a view reads a
//! [`ViewState`] snapshot and calls [`Storefront`] methods for user intents.
//!
//! # Design
//! - Protocol clients (`GraphqlClient`, `RestClient`) follow the host-does-IO
//!   split: `build_*` produces an `HttpRequest`, `parse_*` consumes an
//!   `HttpResponse`. They never touch the network.
//! - A [`Transport`] executes requests. `HttpTransport` is the real one;
//!   tests plug in a scripted transport.
//! - Canonical entity sets are only ever replaced by a full re-fetch after a
//!   confirmed write. Drafts never enter them directly.
//! - The order status banner clears itself after a fixed delay through a
//!   cancellable task owned by the storefront.

pub mod api;
pub mod banner;
pub mod config;
pub mod error;
pub mod graphql;
pub mod http;
pub mod order;
pub mod rest;
pub mod store;
pub mod storefront;
pub mod transport;
pub mod types;
pub mod validation;

pub use api::{BooksApi, StoreApi};
pub use config::StorefrontConfig;
pub use error::{CatalogError, RemoteError, ValidationError};
pub use graphql::GraphqlClient;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use order::{OrderCatalogEntry, OrderOutcome, OrderPhase, OrderWorkflow, CATALOG};
pub use rest::RestClient;
pub use store::{Entity, EntityStore};
pub use storefront::{ActionOutcome, AuthorField, BookField, Storefront, ViewState};
pub use transport::{shared_transport, shared_transport_with_timeout, HttpTransport, Transport};
pub use types::{Author, AuthorInput, Book, BookInput, OrderLineItem, OrderRequest, OrderResponse};
