//! Payload types shared by the two backends.
//!
//! # Design
//! These structs are the wire contract. Every field the storefront relies on
//! is required: a payload missing one fails to deserialize and surfaces as
//! [`RemoteError::Decode`](crate::error::RemoteError::Decode) rather than as a
//! half-filled entity. Identifiers are kept as strings; the author service
//! may send numeric ids, which are normalized on the way in.

use serde::{Deserialize, Deserializer, Serialize};

/// A book as returned by the GraphQL service. A default `Book` (empty id)
/// doubles as the creation-form draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl Book {
    /// The `bookRequest` variables sent by the create mutation.
    pub fn to_input(&self) -> BookInput {
        BookInput {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

/// Input object for the `CreateBook` mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInput {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// An author as returned by the REST service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub birth_date: String,
}

impl Author {
    pub fn to_input(&self) -> AuthorInput {
        AuthorInput {
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
        }
    }
}

/// Body of `POST /authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    pub name: String,
    pub birth_date: String,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub sku_code: String,
    pub price: f64,
    pub quantity: u32,
}

/// Body of `POST /order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "orderLineItemsDtoList")]
    pub line_items: Vec<OrderLineItem>,
}

/// Response of `POST /order`. `status == "success"` is the only success
/// discriminator; `message` may be absent on failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl OrderResponse {
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
