//! In-memory per-entity collections.
//!
//! # Design
//! A store holds two things: the canonical set, which is only ever replaced
//! wholesale with the result of a fetch, and a draft used by the creation
//! form. The canonical set has no `push`/`remove`; a draft reaches it only
//! through a server round trip followed by a re-fetch.

use crate::types::{Author, Book};

/// Something with a server-assigned identifier.
pub trait Entity: Clone + Default {
    fn id(&self) -> &str;
}

impl Entity for Book {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Author {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore<T> {
    items: Vec<T>,
    draft: T,
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            draft: T::default(),
        }
    }

    /// Canonical set in server order.
    pub fn current(&self) -> &[T] {
        &self.items
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut T {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: T) {
        self.draft = draft;
    }

    pub fn reset_draft(&mut self) {
        self.draft = T::default();
    }
}
