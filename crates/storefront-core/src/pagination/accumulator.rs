use std::collections::HashSet;

use crate::models::Identified;

/// Append the items of `incoming` whose identity isn't already in `existing`
///
/// `existing` keeps its order; new items keep their relative order. An id
/// repeated inside `incoming` is only taken the first time.
pub fn merge<T: Identified + Clone>(existing: &[T], incoming: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<T::Id> = existing.iter().map(Identified::id).collect();
    let mut merged = existing.to_vec();
    merged.extend(incoming.into_iter().filter(|item| seen.insert(item.id())));
    merged
}

/// Running result list plus the set of identities already in it
///
/// Same result as calling [`merge`] page after page, without rebuilding the
/// id set each time.
#[derive(Debug)]
pub struct Accumulator<T: Identified> {
    items: Vec<T>,
    seen: HashSet<T::Id>,
}

impl<T: Identified> Accumulator<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Add a page, returns how many items were actually new
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, incoming: I) -> usize {
        let before = self.items.len();
        for item in incoming {
            let id = item.id();
            if self.seen.insert(id.clone()) {
                self.items.push(item);
            } else {
                tracing::trace!("Skipping duplicate item {:?}", id);
            }
        }
        self.items.len() - before
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.seen.contains(id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }
}

impl<T: Identified> Default for Accumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}
