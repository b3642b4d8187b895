//! Ordered store of loaded pages.

use crate::page::Page;
use autopager_core::PageIndex;
use std::collections::BTreeMap;

/// Loaded pages keyed by page index, always iterated ascending.
#[derive(Debug, Clone)]
pub struct PageMap<E> {
    pages: BTreeMap<PageIndex, Page<E>>,
}

impl<E> PageMap<E> {
    pub fn new() -> Self {
        Self {
            pages: BTreeMap::new(),
        }
    }

    /// Insert `page` at its index, returning the page it replaced.
    pub fn merge(&mut self, page: Page<E>) -> Option<Page<E>> {
        self.pages.insert(page.index, page)
    }

    /// Loaded pages ascending by index.
    pub fn snapshot_ordered(&self) -> Vec<&Page<E>> {
        self.pages.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page<E>> {
        self.pages.values()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn get(&self, index: PageIndex) -> Option<&Page<E>> {
        self.pages.get(&index)
    }

    pub fn contains(&self, index: PageIndex) -> bool {
        self.pages.contains_key(&index)
    }

    /// The loaded page with the highest index.
    pub fn last(&self) -> Option<&Page<E>> {
        self.pages.values().next_back()
    }

    pub fn indices(&self) -> Vec<PageIndex> {
        self.pages.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<E> Default for PageMap<E> {
    fn default() -> Self {
        Self::new()
    }
}
