//! Static catalog and the single-line order state machine.
//!
//! `Idle` → `Submitting` → `Resolved` → `Idle`. The last hop is driven by the
//! orchestrator's status banner timer, not by this type.
//!
//! Every submission takes a ticket from a monotonic counter. Only the
//! response carrying the most recent ticket may set the status message, so a
//! slow first order can never overwrite the result of a later one.

use crate::error::{CatalogError, RemoteError};
use crate::types::{OrderLineItem, OrderRequest, OrderResponse};

pub const ORDER_FAILED: &str = "Failed to place order.";

/// An item that can be ordered. Defined client-side, never fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderCatalogEntry {
    pub sku_code: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub in_stock: bool,
}

pub static CATALOG: [OrderCatalogEntry; 2] = [
    OrderCatalogEntry {
        sku_code: "design_patterns_gof",
        name: "Design Patterns",
        price: 29.0,
        in_stock: true,
    },
    OrderCatalogEntry {
        sku_code: "mythical_man_month",
        name: "Mythical Man Month",
        price: 39.0,
        in_stock: false,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderPhase {
    #[default]
    Idle,
    Submitting,
    Resolved,
}

/// How an order attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The server reported `success`.
    Placed { message: String },
    /// The server was reachable but declined the order.
    Rejected { message: String },
    /// The call itself failed.
    Failed { message: String, error: RemoteError },
    /// A newer submission was issued before this one resolved; its result
    /// was dropped.
    Superseded,
}

impl OrderOutcome {
    /// The text shown in the status banner, if this outcome sets one.
    pub fn status_message(&self) -> Option<&str> {
        match self {
            OrderOutcome::Placed { message }
            | OrderOutcome::Rejected { message }
            | OrderOutcome::Failed { message, .. } => Some(message),
            OrderOutcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderWorkflow {
    selected: usize,
    phase: OrderPhase,
    status_message: Option<String>,
    issued: u64,
}

impl Default for OrderWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderWorkflow {
    pub fn new() -> Self {
        Self {
            selected: 0,
            phase: OrderPhase::Idle,
            status_message: None,
            issued: 0,
        }
    }

    pub fn catalog(&self) -> &'static [OrderCatalogEntry] {
        &CATALOG
    }

    pub fn selected(&self) -> &'static OrderCatalogEntry {
        &CATALOG[self.selected]
    }

    /// Unknown SKUs leave the current selection in place.
    pub fn select(&mut self, sku_code: &str) -> Result<(), CatalogError> {
        let index = CATALOG
            .iter()
            .position(|entry| entry.sku_code == sku_code)
            .ok_or_else(|| CatalogError::UnknownSku(sku_code.to_string()))?;
        self.selected = index;
        Ok(())
    }

    pub fn phase(&self) -> OrderPhase {
        self.phase
    }

    /// Empty when no banner is showing.
    pub fn status_message(&self) -> &str {
        self.status_message.as_deref().unwrap_or("")
    }

    pub fn latest_ticket(&self) -> u64 {
        self.issued
    }

    /// Issues a ticket and builds the one-line request for the current
    /// selection.
    pub fn begin_submission(&mut self) -> (u64, OrderRequest) {
        self.issued += 1;
        self.phase = OrderPhase::Submitting;
        let entry = self.selected();
        let request = OrderRequest {
            line_items: vec![OrderLineItem {
                sku_code: entry.sku_code.to_string(),
                price: entry.price,
                quantity: 1,
            }],
        };
        (self.issued, request)
    }

    pub fn interpret(result: Result<OrderResponse, RemoteError>) -> OrderOutcome {
        match result {
            Ok(response) if response.is_success() => OrderOutcome::Placed {
                message: response.message.unwrap_or_default(),
            },
            Ok(response) => OrderOutcome::Rejected {
                message: response
                    .message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| ORDER_FAILED.to_string()),
            },
            Err(error) => OrderOutcome::Failed {
                message: ORDER_FAILED.to_string(),
                error,
            },
        }
    }

    /// Applies `message` if `ticket` is still the latest. Returns whether it
    /// was applied.
    pub fn resolve(&mut self, ticket: u64, message: String) -> bool {
        if ticket != self.issued {
            return false;
        }
        self.status_message = Some(message);
        self.phase = OrderPhase::Resolved;
        true
    }

    /// Drops the banner. A submission still in flight keeps its phase.
    pub fn clear_status(&mut self) {
        self.status_message = None;
        if self.phase == OrderPhase::Resolved {
            self.phase = OrderPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: &str, message: Option<&str>) -> OrderResponse {
        OrderResponse {
            status: status.to_string(),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn first_entry_is_selected_by_default() {
        let workflow = OrderWorkflow::new();
        assert_eq!(workflow.selected().sku_code, "design_patterns_gof");
        assert_eq!(workflow.phase(), OrderPhase::Idle);
        assert_eq!(workflow.status_message(), "");
    }

    #[test]
    fn select_unknown_sku_keeps_selection() {
        let mut workflow = OrderWorkflow::new();
        workflow.select("mythical_man_month").unwrap();
        let err = workflow.select("sicp").unwrap_err();
        assert_eq!(err, CatalogError::UnknownSku("sicp".to_string()));
        assert_eq!(workflow.selected().sku_code, "mythical_man_month");
    }

    #[test]
    fn submission_builds_single_line_from_selection() {
        let mut workflow = OrderWorkflow::new();
        workflow.select("mythical_man_month").unwrap();
        let (ticket, request) = workflow.begin_submission();
        assert_eq!(ticket, 1);
        assert_eq!(workflow.phase(), OrderPhase::Submitting);
        assert_eq!(
            request.line_items,
            vec![OrderLineItem {
                sku_code: "mythical_man_month".to_string(),
                price: 39.0,
                quantity: 1,
            }]
        );
    }

    #[test]
    fn success_uses_server_message() {
        let outcome = OrderWorkflow::interpret(Ok(response("success", Some("Order Placed"))));
        assert_eq!(
            outcome,
            OrderOutcome::Placed {
                message: "Order Placed".to_string()
            }
        );
    }

    #[test]
    fn business_failure_prefers_server_message() {
        let outcome = OrderWorkflow::interpret(Ok(response("failure", Some("Out of stock"))));
        assert_eq!(outcome.status_message(), Some("Out of stock"));
    }

    #[test]
    fn business_failure_without_message_falls_back() {
        let outcome = OrderWorkflow::interpret(Ok(response("failure", None)));
        assert_eq!(outcome.status_message(), Some(ORDER_FAILED));
        let outcome = OrderWorkflow::interpret(Ok(response("error", Some(""))));
        assert_eq!(outcome.status_message(), Some(ORDER_FAILED));
    }

    #[test]
    fn transport_failure_falls_back() {
        let outcome =
            OrderWorkflow::interpret(Err(RemoteError::Transport("refused".to_string())));
        assert!(matches!(outcome, OrderOutcome::Failed { .. }));
        assert_eq!(outcome.status_message(), Some(ORDER_FAILED));
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut workflow = OrderWorkflow::new();
        let (first, _) = workflow.begin_submission();
        let (second, _) = workflow.begin_submission();

        assert!(workflow.resolve(second, "second".to_string()));
        assert!(!workflow.resolve(first, "first".to_string()));
        assert_eq!(workflow.status_message(), "second");
        assert_eq!(workflow.phase(), OrderPhase::Resolved);
    }

    #[test]
    fn clear_keeps_in_flight_phase() {
        let mut workflow = OrderWorkflow::new();
        let (ticket, _) = workflow.begin_submission();
        workflow.resolve(ticket, "done".to_string());
        workflow.begin_submission();
        workflow.clear_status();
        assert_eq!(workflow.status_message(), "");
        assert_eq!(workflow.phase(), OrderPhase::Submitting);
    }
}
