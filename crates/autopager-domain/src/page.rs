use autopager_core::PageIndex;
use serde::{Deserialize, Serialize};

/// One fetched page of a paged source.
///
/// `first_page_index` and `last_page_index` are the bounds of the whole source
/// as known when this page was fetched. A growing source may report a larger
/// `last_page_index` on later pages, and `index` is not required to lie within
/// the bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<E> {
    pub index: PageIndex,
    pub first_page_index: PageIndex,
    pub last_page_index: PageIndex,
    pub elements: Vec<E>,
}

impl<E> Page<E> {
    pub fn new(
        index: PageIndex,
        first_page_index: PageIndex,
        last_page_index: PageIndex,
        elements: Vec<E>,
    ) -> Self {
        Self {
            index,
            first_page_index,
            last_page_index,
            elements,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }
}

impl<'a, E> IntoIterator for &'a Page<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
