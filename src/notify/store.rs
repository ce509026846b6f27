// SPDX-License-Identifier: MPL-2.0
//! Insertion-ordered collection of active messages.

use super::message::Message;
use std::sync::Arc;

/// The ordered collection of currently active notifications.
///
/// Order is insertion order, which is also display order. Duplicate ids
/// are allowed; id lookups return the first match, so later duplicates
/// are unreachable by id until earlier ones are removed.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Arc<Message>>,
}

impl MessageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Arc<Message>) {
        self.messages.push(message);
    }

    /// Removes the first entry that is the same entity as `message`
    /// (pointer identity, not id equality).
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove_entity(&mut self, message: &Arc<Message>) -> bool {
        if let Some(pos) = self.messages.iter().position(|m| Arc::ptr_eq(m, message)) {
            self.messages.remove(pos);
            return true;
        }
        false
    }

    /// First message whose id equals `id`, in insertion order.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<Arc<Message>> {
        self.messages.iter().find(|m| m.id() == Some(id)).cloned()
    }

    #[must_use]
    pub fn contains(&self, message: &Arc<Message>) -> bool {
        self.messages.iter().any(|m| Arc::ptr_eq(m, message))
    }

    /// Clones of all entries, in display order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Message>> {
        self.messages.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
