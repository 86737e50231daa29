//! The view orchestrator.
//!
//! # Design
//! `Storefront` turns user intents into adapter calls and folds the results
//! back into a [`ViewState`]. Methods take `&self`; the state sits behind a
//! mutex that is never held across an `.await`, so two actions may be in
//! flight at once and the last refresh to land wins.
//!
//! Every write follows the same discipline: validate, call, then re-fetch the
//! whole canonical set. Nothing is patched locally. Failures are caught here,
//! logged, and reflected in the view state; no action returns an error or
//! panics.
//!
//! The one cancellable resource is the status banner timer. Each order result
//! bumps a banner generation and reschedules the clear task; the task only
//! clears if its generation is still current. Dropping the storefront (or
//! calling [`Storefront::shutdown`]) aborts the pending clear.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{BooksApi, StoreApi};
use crate::banner::StatusBanner;
use crate::config::StorefrontConfig;
use crate::error::{CatalogError, RemoteError, ValidationError};
use crate::graphql::GraphqlClient;
use crate::order::{OrderCatalogEntry, OrderOutcome, OrderWorkflow};
use crate::rest::RestClient;
use crate::store::EntityStore;
use crate::transport::{shared_transport_with_timeout, Transport};
use crate::types::{Author, Book};
use crate::validation::{validate_author_draft, validate_book_draft};

pub const BOOKS_LOAD_FAILED: &str = "Failed to load books.";
pub const AUTHORS_LOAD_FAILED: &str = "Failed to load authors.";
pub const ADD_BOOK_FAILED: &str = "Failed to add book.";
pub const DELETE_BOOK_FAILED: &str = "Failed to delete book.";
pub const ADD_AUTHOR_FAILED: &str = "Failed to add author.";
pub const DELETE_AUTHOR_FAILED: &str = "Failed to delete author.";

/// Editable fields of the book creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Name,
    Description,
    Price,
}

/// Editable fields of the author creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorField {
    Name,
    BirthDate,
}

/// Result of a catalog action. The view state already reflects it; the
/// value is returned for callers that want to react programmatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Rejected(ValidationError),
    Failed(RemoteError),
}

impl ActionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }
}

/// Everything a renderer needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    books: EntityStore<Book>,
    authors: EntityStore<Author>,
    order: OrderWorkflow,
    books_in_flight: u32,
    validation_error: Option<String>,
    author_error: Option<String>,
    notice: Option<String>,
    banner_generation: u64,
}

impl ViewState {
    pub fn books(&self) -> &EntityStore<Book> {
        &self.books
    }

    pub fn authors(&self) -> &EntityStore<Author> {
        &self.authors
    }

    pub fn order(&self) -> &OrderWorkflow {
        &self.order
    }

    /// True while any books query is outstanding.
    pub fn books_loading(&self) -> bool {
        self.books_in_flight > 0
    }

    /// Book form error; empty when none.
    pub fn validation_error(&self) -> &str {
        self.validation_error.as_deref().unwrap_or("")
    }

    /// Author form error; empty when none.
    pub fn author_error(&self) -> &str {
        self.author_error.as_deref().unwrap_or("")
    }

    /// Last remote failure of a catalog action; empty when none.
    pub fn notice(&self) -> &str {
        self.notice.as_deref().unwrap_or("")
    }

    pub fn status_message(&self) -> &str {
        self.order.status_message()
    }

    pub fn selected_entry(&self) -> &'static OrderCatalogEntry {
        self.order.selected()
    }
}

pub struct Storefront {
    books_api: BooksApi,
    store_api: StoreApi,
    state: Arc<Mutex<ViewState>>,
    banner: StatusBanner,
    banner_delay: Duration,
}

impl Storefront {
    pub fn new(config: &StorefrontConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            books_api: BooksApi::new(GraphqlClient::new(&config.graphql_url), transport.clone()),
            store_api: StoreApi::new(RestClient::new(&config.api_base_url), transport),
            state: Arc::new(Mutex::new(ViewState::default())),
            banner: StatusBanner::new(),
            banner_delay: config.status_banner_delay(),
        }
    }

    /// Uses the process-wide transport for `config.request_timeout()`.
    pub fn with_shared_transport(config: &StorefrontConfig) -> Self {
        Self::new(config, shared_transport_with_timeout(config.request_timeout()))
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    /// Initial fetch of both canonical sets.
    #[instrument(skip(self))]
    pub async fn load(&self) -> ActionOutcome {
        self.state.lock().notice = None;
        let (books, authors) = tokio::join!(self.reload_books(), self.reload_authors());
        match books.and(authors) {
            Ok(()) => ActionOutcome::Applied,
            Err(error) => ActionOutcome::Failed(error),
        }
    }

    pub async fn refresh_books(&self) -> ActionOutcome {
        self.state.lock().notice = None;
        match self.reload_books().await {
            Ok(()) => ActionOutcome::Applied,
            Err(error) => ActionOutcome::Failed(error),
        }
    }

    pub async fn refresh_authors(&self) -> ActionOutcome {
        self.state.lock().notice = None;
        match self.reload_authors().await {
            Ok(()) => ActionOutcome::Applied,
            Err(error) => ActionOutcome::Failed(error),
        }
    }

    /// Validates the draft, creates it, then re-fetches. A failed create
    /// leaves the draft and any validation error untouched.
    #[instrument(skip(self))]
    pub async fn add_book(&self) -> ActionOutcome {
        let input = {
            let mut state = self.state.lock();
            state.notice = None;
            let verdict = validate_book_draft(state.books.draft());
            if let Err(rejection) = verdict {
                debug!(%rejection, "book draft rejected");
                state.validation_error = Some(rejection.message().to_string());
                return ActionOutcome::Rejected(rejection);
            }
            state.books.draft().to_input()
        };

        match self.books_api.run_create_book_mutation(&input).await {
            Ok(book) => info!(id = %book.id, "book created"),
            Err(error) => {
                error!(%error, "error adding book");
                self.state.lock().notice = Some(ADD_BOOK_FAILED.to_string());
                return ActionOutcome::Failed(error);
            }
        }

        // The create is confirmed; a failed refresh only leaves the list stale.
        let _ = self.reload_books().await;
        let mut state = self.state.lock();
        state.books.reset_draft();
        state.validation_error = None;
        ActionOutcome::Applied
    }

    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: &str) -> ActionOutcome {
        self.state.lock().notice = None;
        match self.books_api.run_delete_book_mutation(id).await {
            Ok(()) => {
                info!(id, "book deleted");
                let _ = self.reload_books().await;
                ActionOutcome::Applied
            }
            Err(error) => {
                error!(%error, id, "error deleting book");
                self.state.lock().notice = Some(DELETE_BOOK_FAILED.to_string());
                ActionOutcome::Failed(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn add_author(&self) -> ActionOutcome {
        let input = {
            let mut state = self.state.lock();
            state.notice = None;
            let verdict = validate_author_draft(state.authors.draft());
            if let Err(rejection) = verdict {
                warn!(%rejection, "author draft rejected");
                state.author_error = Some(rejection.message().to_string());
                return ActionOutcome::Rejected(rejection);
            }
            state.authors.draft().to_input()
        };

        match self.store_api.create_author(&input).await {
            Ok(author) => info!(id = %author.id, "author created"),
            Err(error) => {
                error!(%error, "error adding author");
                self.state.lock().notice = Some(ADD_AUTHOR_FAILED.to_string());
                return ActionOutcome::Failed(error);
            }
        }

        let _ = self.reload_authors().await;
        let mut state = self.state.lock();
        state.authors.reset_draft();
        state.author_error = None;
        ActionOutcome::Applied
    }

    #[instrument(skip(self))]
    pub async fn delete_author(&self, id: &str) -> ActionOutcome {
        self.state.lock().notice = None;
        match self.store_api.delete_author(id).await {
            Ok(()) => {
                info!(id, "author deleted");
                let _ = self.reload_authors().await;
                ActionOutcome::Applied
            }
            Err(error) => {
                error!(%error, id, "error deleting author");
                self.state.lock().notice = Some(DELETE_AUTHOR_FAILED.to_string());
                ActionOutcome::Failed(error)
            }
        }
    }

    /// Pure state change; no request is made.
    pub fn select_catalog_entry(&self, sku_code: &str) -> Result<(), CatalogError> {
        self.state.lock().order.select(sku_code).inspect_err(|error| {
            warn!(%error, "catalog selection ignored");
        })
    }

    /// Submits one line for the selected entry and shows the outcome in the
    /// status banner, which clears itself after the configured delay.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> OrderOutcome {
        let (ticket, request) = self.state.lock().order.begin_submission();

        let result = self.store_api.submit_order(&request).await;
        if let Err(error) = &result {
            error!(%error, "error placing order");
        }
        let outcome = OrderWorkflow::interpret(result);
        let message = outcome.status_message().unwrap_or_default().to_string();

        let mut state = self.state.lock();
        if !state.order.resolve(ticket, message) {
            debug!(
                ticket,
                latest = state.order.latest_ticket(),
                "dropping stale order response"
            );
            return OrderOutcome::Superseded;
        }
        state.banner_generation += 1;
        let generation = state.banner_generation;
        let shared = Arc::clone(&self.state);
        self.banner.schedule(self.banner_delay, move || {
            let mut state = shared.lock();
            if state.banner_generation == generation {
                state.order.clear_status();
            }
        });
        info!(status = state.order.status_message(), "order resolved");
        outcome
    }

    /// Updates one draft field and clears the book validation error.
    /// Price text that is not a finite number becomes 0.
    pub fn edit_book_field(&self, field: BookField, value: &str) {
        let mut state = self.state.lock();
        let draft = state.books.draft_mut();
        match field {
            BookField::Name => draft.name = value.to_string(),
            BookField::Description => draft.description = value.to_string(),
            BookField::Price => draft.price = parse_price(value),
        }
        state.validation_error = None;
    }

    pub fn edit_author_field(&self, field: AuthorField, value: &str) {
        let mut state = self.state.lock();
        let draft = state.authors.draft_mut();
        match field {
            AuthorField::Name => draft.name = value.to_string(),
            AuthorField::BirthDate => draft.birth_date = value.to_string(),
        }
        state.author_error = None;
    }

    pub fn set_book_draft(&self, draft: Book) {
        let mut state = self.state.lock();
        state.books.set_draft(draft);
        state.validation_error = None;
    }

    pub fn set_author_draft(&self, draft: Author) {
        let mut state = self.state.lock();
        state.authors.set_draft(draft);
        state.author_error = None;
    }

    /// Cancels the pending banner clear. In-flight requests are not
    /// cancellable and still update the state when they land.
    pub fn shutdown(&self) {
        if self.banner.cancel() {
            debug!("status banner timer cancelled");
        }
    }

    async fn reload_books(&self) -> Result<(), RemoteError> {
        self.state.lock().books_in_flight += 1;
        let result = self.books_api.run_books_query().await;

        let mut state = self.state.lock();
        state.books_in_flight = state.books_in_flight.saturating_sub(1);
        match result {
            Ok(books) => {
                state.books.replace_all(books);
                Ok(())
            }
            Err(error) => {
                error!(%error, "error fetching books");
                state.notice = Some(BOOKS_LOAD_FAILED.to_string());
                Err(error)
            }
        }
    }

    async fn reload_authors(&self) -> Result<(), RemoteError> {
        let result = self.store_api.fetch_authors().await;

        let mut state = self.state.lock();
        match result {
            Ok(authors) => {
                state.authors.replace_all(authors);
                Ok(())
            }
            Err(error) => {
                error!(%error, "error fetching authors");
                state.notice = Some(AUTHORS_LOAD_FAILED.to_string());
                Err(error)
            }
        }
    }
}

fn parse_price(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .unwrap_or(0.0)
}
