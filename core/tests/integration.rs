//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock backend on a random port in its own runtime thread, then
//! drives both the protocol clients and the full `Storefront` over real HTTP
//! through `HttpTransport`. Catches schema drift between the core's payload
//! types and the server.

use std::sync::Arc;

use mock_server::{ORDER_PLACED, OUT_OF_STOCK};
use storefront_core::{
    ActionOutcome, AuthorField, AuthorInput, BookField, BookInput, GraphqlClient, HttpTransport,
    OrderOutcome, RemoteError, RestClient, Storefront, StorefrontConfig, Transport,
};

/// Start the mock server on a random port and return its origin.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn transport(config: &StorefrontConfig) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(config.request_timeout()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn protocol_clients_lifecycle() {
    let config = StorefrontConfig::for_host(&start_mock_server());
    let http = transport(&config);
    let books = GraphqlClient::new(&config.graphql_url);
    let rest = RestClient::new(&config.api_base_url);

    // Step 1: both collections start empty.
    let req = books.build_get_books().unwrap();
    assert!(books.parse_get_books(http.execute(req).await.unwrap()).unwrap().is_empty());
    let req = rest.build_list_authors();
    assert!(rest.parse_list_authors(http.execute(req).await.unwrap()).unwrap().is_empty());

    // Step 2: create a book.
    let input = BookInput {
        name: "Design Patterns".to_string(),
        description: "Gang of Four".to_string(),
        price: 29.0,
    };
    let req = books.build_create_book(&input).unwrap();
    let created = books.parse_create_book(http.execute(req).await.unwrap()).unwrap();
    assert_eq!(created.name, "Design Patterns");
    assert!(!created.id.is_empty());

    // Step 3: create an author.
    let input = AuthorInput {
        name: "Erich Gamma".to_string(),
        birth_date: "1961-03-13".to_string(),
    };
    let req = rest.build_create_author(&input).unwrap();
    let gamma = rest.parse_create_author(http.execute(req).await.unwrap()).unwrap();
    assert_eq!(gamma.birth_date, "1961-03-13");

    // Step 4: delete both.
    let req = books.build_delete_book(&created.id).unwrap();
    books.parse_delete_book(http.execute(req).await.unwrap()).unwrap();
    let req = rest.build_delete_author(&gamma.id);
    rest.parse_delete_author(http.execute(req).await.unwrap()).unwrap();

    // Step 5: deleting again is refused by each service in its own way.
    let req = books.build_delete_book(&created.id).unwrap();
    let err = books.parse_delete_book(http.execute(req).await.unwrap()).unwrap_err();
    assert!(matches!(err, RemoteError::NotAcknowledged(_)));
    let req = rest.build_delete_author(&gamma.id);
    let err = rest.parse_delete_author(http.execute(req).await.unwrap()).unwrap_err();
    assert_eq!(err, RemoteError::NotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn storefront_session() {
    let config = StorefrontConfig::for_host(&start_mock_server());
    let shop = Storefront::new(&config, transport(&config));

    // Step 1: initial load.
    assert_eq!(shop.load().await, ActionOutcome::Applied);
    assert!(shop.snapshot().books().is_empty());

    // Step 2: add a book through the form.
    shop.edit_book_field(BookField::Name, "The Mythical Man-Month");
    shop.edit_book_field(BookField::Description, "Brooks");
    shop.edit_book_field(BookField::Price, "39");
    assert_eq!(shop.add_book().await, ActionOutcome::Applied);
    let view = shop.snapshot();
    assert_eq!(view.books().len(), 1);
    assert_eq!(view.books().draft().name, "");
    let book_id = view.books().current()[0].id.clone();

    // Step 3: add an author.
    shop.edit_author_field(AuthorField::Name, "Fred Brooks");
    shop.edit_author_field(AuthorField::BirthDate, "1931-04-19");
    assert_eq!(shop.add_author().await, ActionOutcome::Applied);
    let author_id = shop.snapshot().authors().current()[0].id.clone();

    // Step 4: delete both.
    assert_eq!(shop.delete_book(&book_id).await, ActionOutcome::Applied);
    assert_eq!(shop.delete_author(&author_id).await, ActionOutcome::Applied);
    let view = shop.snapshot();
    assert!(view.books().is_empty());
    assert!(view.authors().is_empty());

    // Step 5: deleting the author again fails and leaves a notice.
    assert_eq!(
        shop.delete_author(&author_id).await,
        ActionOutcome::Failed(RemoteError::NotFound)
    );
    assert!(!shop.snapshot().notice().is_empty());

    // Step 6: order the in-stock default entry.
    assert_eq!(
        shop.place_order().await,
        OrderOutcome::Placed {
            message: ORDER_PLACED.to_string()
        }
    );
    assert_eq!(shop.snapshot().status_message(), ORDER_PLACED);

    // Step 7: order the out-of-stock entry.
    shop.select_catalog_entry("mythical_man_month").unwrap();
    assert_eq!(
        shop.place_order().await,
        OrderOutcome::Rejected {
            message: OUT_OF_STOCK.to_string()
        }
    );
    assert_eq!(shop.snapshot().status_message(), OUT_OF_STOCK);

    shop.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shared_transport_uses_configured_timeout() {
    // Accepts connections through the backlog but never answers.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = StorefrontConfig::for_host(&format!("http://{}", silent.local_addr().unwrap()));
    config.request_timeout_ms = 300;
    let shop = Storefront::with_shared_transport(&config);

    let started = std::time::Instant::now();
    let outcome = shop.refresh_authors().await;
    let elapsed = started.elapsed();

    assert!(matches!(outcome, ActionOutcome::Failed(RemoteError::Transport(_))));
    assert!(elapsed < std::time::Duration::from_secs(5), "took {elapsed:?}");
    drop(silent);
}
