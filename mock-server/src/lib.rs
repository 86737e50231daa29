use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// SKUs the inventory service reports as available.
pub const IN_STOCK: &[&str] = &["design_patterns_gof"];

pub const ORDER_PLACED: &str = "Order Placed";
pub const OUT_OF_STOCK: &str = "Product is not in stock, please try again later";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct BookRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub birth_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    pub name: String,
    pub birth_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub operation_name: Option<String>,
    pub query: String,
    #[serde(default)]
    pub variables: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub sku_code: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct PlaceOrder {
    #[serde(rename = "orderLineItemsDtoList")]
    pub line_items: Vec<OrderLineItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResult {
    pub status: String,
    pub message: String,
}

/// Insertion-ordered in-memory tables.
#[derive(Default)]
pub struct Store {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/graphql", post(graphql))
        .route("/api/authors", get(list_authors).post(create_author))
        .route("/api/authors/{id}", delete(delete_author))
        .route("/api/order", post(place_order))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- graphql ---

async fn graphql(State(db): State<Db>, Json(request): Json<GraphqlRequest>) -> Json<Value> {
    let operation = request
        .operation_name
        .clone()
        .or_else(|| operation_from_query(&request.query));

    let result = match operation.as_deref() {
        Some("GetBooks") => {
            let books = db.read().await.books.clone();
            Ok(json!({ "getAllBooks": books }))
        }
        Some("CreateBook") => create_book(&db, &request.variables).await,
        Some("DeleteBook") => delete_book(&db, &request.variables).await,
        other => Err(format!(
            "unknown operation: {}",
            other.unwrap_or("<anonymous>")
        )),
    };

    Json(match result {
        Ok(data) => json!({ "data": data }),
        Err(message) => {
            warn!(%message, "graphql operation failed");
            json!({ "data": null, "errors": [{ "message": message }] })
        }
    })
}

/// Name of the first `query`/`mutation` in a document, if it has one.
pub fn operation_from_query(query: &str) -> Option<String> {
    let mut tokens = query.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "query" || token == "mutation" {
            let name: String = tokens
                .next()?
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            return (!name.is_empty()).then_some(name);
        }
    }
    None
}

async fn create_book(db: &Db, variables: &Value) -> Result<Value, String> {
    let input: BookRequest = serde_json::from_value(variables["bookRequest"].clone())
        .map_err(|e| format!("invalid bookRequest: {e}"))?;
    if input.name.is_empty() || input.description.is_empty() || input.price <= 0.0 {
        return Err("name, description and a positive price are required".to_string());
    }
    let book = Book {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        price: input.price,
    };
    info!(id = %book.id, "book created");
    db.write().await.books.push(book.clone());
    Ok(json!({ "createBook": book }))
}

async fn delete_book(db: &Db, variables: &Value) -> Result<Value, String> {
    let id = variables["id"]
        .as_str()
        .ok_or_else(|| "variable 'id' is required".to_string())?;
    let mut store = db.write().await;
    let before = store.books.len();
    store.books.retain(|book| book.id != id);
    Ok(json!({ "deleteBook": store.books.len() < before }))
}

// --- authors ---

async fn list_authors(State(db): State<Db>) -> Json<Vec<Author>> {
    Json(db.read().await.authors.clone())
}

async fn create_author(
    State(db): State<Db>,
    Json(input): Json<CreateAuthor>,
) -> (StatusCode, Json<Author>) {
    let author = Author {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        birth_date: input.birth_date,
    };
    info!(id = %author.id, "author created");
    db.write().await.authors.push(author.clone());
    (StatusCode::CREATED, Json(author))
}

async fn delete_author(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    let mut store = db.write().await;
    let before = store.authors.len();
    store.authors.retain(|author| author.id != id);
    if store.authors.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// --- order ---

async fn place_order(Json(order): Json<PlaceOrder>) -> Result<Json<OrderResult>, StatusCode> {
    if order.line_items.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let all_in_stock = order
        .line_items
        .iter()
        .all(|line| IN_STOCK.contains(&line.sku_code.as_str()));
    info!(lines = order.line_items.len(), all_in_stock, "order received");

    let result = if all_in_stock {
        OrderResult {
            status: "success".to_string(),
            message: ORDER_PLACED.to_string(),
        }
    } else {
        OrderResult {
            status: "failure".to_string(),
            message: OUT_OF_STOCK.to_string(),
        }
    };
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_serializes_camel_case() {
        let author = Author {
            id: "1".to_string(),
            name: "Fred Brooks".to_string(),
            birth_date: "1931-04-19".to_string(),
        };
        let json = serde_json::to_value(&author).unwrap();
        assert_eq!(json["birthDate"], "1931-04-19");
        assert!(json.get("birth_date").is_none());
    }

    #[test]
    fn create_author_rejects_missing_birth_date() {
        let result: Result<CreateAuthor, _> = serde_json::from_str(r#"{"name":"Fred"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn place_order_reads_backend_field_names() {
        let order: PlaceOrder = serde_json::from_str(
            r#"{"orderLineItemsDtoList":[{"skuCode":"design_patterns_gof","price":29,"quantity":1}]}"#,
        )
        .unwrap();
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].sku_code, "design_patterns_gof");
        assert_eq!(order.line_items[0].price, 29.0);
    }

    #[test]
    fn operation_name_is_read_from_query() {
        assert_eq!(
            operation_from_query("query GetBooks { getAllBooks { id } }").as_deref(),
            Some("GetBooks")
        );
        assert_eq!(
            operation_from_query("mutation DeleteBook($id: ID!) { deleteBook(id: $id) }")
                .as_deref(),
            Some("DeleteBook")
        );
        assert_eq!(operation_from_query("{ getAllBooks { id } }"), None);
    }
}
