//! Bounded per-process cache of resolved author identities.

use std::collections::{HashMap, VecDeque};

use crate::github::models::AuthorIdentity;

/// Number of identities kept before the oldest entry is evicted.
pub(super) const AUTHOR_CACHE_CAPACITY: usize = 128;

/// First-in first-out cache keyed by login.
#[derive(Debug)]
pub(super) struct AuthorCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, AuthorIdentity>,
}

impl AuthorCache {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub(super) fn get(&self, login: &str) -> Option<AuthorIdentity> {
        self.entries.get(login).cloned()
    }

    pub(super) fn insert(&mut self, login: &str, identity: AuthorIdentity) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(login.to_owned(), identity).is_some() {
            return;
        }
        self.order.push_back(login.to_owned());
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for AuthorCache {
    fn default() -> Self {
        Self::with_capacity(AUTHOR_CACHE_CAPACITY)
    }
}
