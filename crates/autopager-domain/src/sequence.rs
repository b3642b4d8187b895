//! Derivation of the flat, gap-aware row sequence from loaded pages.
//!
//! Pages are walked ascending. Whenever a page does not directly follow the
//! previous one, a single `Gap` row pointing at the page just before it is
//! inserted, so any run of missing pages collapses to one clickable row.
//! Loading that target re-runs the builder and may reveal the next gap.
//! The sequence always ends with exactly one `Footer` or `End`.

use crate::page::Page;
use crate::render_item::{RenderItem, RowKind};
use autopager_core::PageIndex;
use serde::Serialize;
use std::ops::Deref;

/// Builds render sequences. Pure: same pages in, same rows out.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemSequenceBuilder;

impl ItemSequenceBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the row sequence for `pages`, which must be ascending by index.
    ///
    /// `End` is only emitted when at least one page is loaded; with no pages
    /// the sequence is a lone `Footer`.
    pub fn build<'a, E, I>(&self, pages: I, in_terminal_state: bool) -> RenderSequence<E>
    where
        E: Clone + 'a,
        I: IntoIterator<Item = &'a Page<E>>,
    {
        let mut items = Vec::new();
        let mut previous: Option<PageIndex> = None;

        for page in pages {
            if let Some(prev) = previous {
                if prev.checked_add(1) != Some(page.index) {
                    if let Some(target) = page.index.checked_sub(1) {
                        items.push(RenderItem::Gap(target));
                    }
                }
            }
            previous = Some(page.index);
            items.extend(page.iter().cloned().map(RenderItem::Element));
        }

        if in_terminal_state && previous.is_some() {
            items.push(RenderItem::End);
        } else {
            items.push(RenderItem::Footer);
        }

        RenderSequence { items }
    }
}

/// The rows currently handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderSequence<E> {
    items: Vec<RenderItem<E>>,
}

impl<E> RenderSequence<E> {
    /// The sequence of an empty page map.
    pub fn empty() -> Self {
        Self {
            items: vec![RenderItem::Footer],
        }
    }

    pub fn items(&self) -> &[RenderItem<E>] {
        &self.items
    }

    /// The element rendered at `position`, if that row is an element.
    pub fn element_at(&self, position: usize) -> Option<&E> {
        self.items.get(position).and_then(RenderItem::as_element)
    }

    /// The page a gap row at `position` would load.
    pub fn gap_target_at(&self, position: usize) -> Option<PageIndex> {
        self.items.get(position).and_then(RenderItem::gap_target)
    }

    pub fn gap_targets(&self) -> Vec<PageIndex> {
        self.items.iter().filter_map(RenderItem::gap_target).collect()
    }

    pub fn element_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind() == RowKind::Element)
            .count()
    }

    pub fn ends_with_end(&self) -> bool {
        matches!(self.items.last(), Some(RenderItem::End))
    }
}

impl<E> Default for RenderSequence<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> Deref for RenderSequence<E> {
    type Target = [RenderItem<E>];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageMap;

    fn page(index: PageIndex, last: PageIndex, elements: &[&'static str]) -> Page<&'static str> {
        Page::new(index, 1, last, elements.to_vec())
    }

    fn map_of(pages: Vec<Page<&'static str>>) -> PageMap<&'static str> {
        let mut map = PageMap::new();
        for p in pages {
            map.merge(p);
        }
        map
    }

    #[test]
    fn test_no_pages_yields_lone_footer() {
        let map: PageMap<&str> = PageMap::new();
        let seq = ItemSequenceBuilder::new().build(map.iter(), false);
        assert_eq!(seq.items(), &[RenderItem::Footer]);

        // Terminal flag without pages still shows "more may come".
        let seq = ItemSequenceBuilder::new().build(map.iter(), true);
        assert_eq!(seq.items(), &[RenderItem::Footer]);
        assert_eq!(seq, RenderSequence::empty());
    }

    #[test]
    fn test_contiguous_pages_have_no_gap() {
        let map = map_of(vec![page(1, 5, &["a", "b"]), page(2, 5, &["c"])]);
        let seq = ItemSequenceBuilder::new().build(map.iter(), false);

        assert_eq!(
            seq.items(),
            &[
                RenderItem::Element("a"),
                RenderItem::Element("b"),
                RenderItem::Element("c"),
                RenderItem::Footer,
            ]
        );
    }

    #[test]
    fn test_single_gap_between_two_and_five() {
        let map = map_of(vec![
            page(1, 9, &["a"]),
            page(2, 9, &["b"]),
            page(5, 9, &["e"]),
            page(6, 9, &["f"]),
        ]);
        let seq = ItemSequenceBuilder::new().build(map.iter(), false);

        assert_eq!(seq.gap_targets(), vec![4]);
        assert_eq!(
            seq.items(),
            &[
                RenderItem::Element("a"),
                RenderItem::Element("b"),
                RenderItem::Gap(4),
                RenderItem::Element("e"),
                RenderItem::Element("f"),
                RenderItem::Footer,
            ]
        );
    }

    #[test]
    fn test_each_discontinuity_gets_one_gap() {
        let map = map_of(vec![page(1, 9, &["a"]), page(3, 9, &["c"]), page(9, 9, &["i"])]);
        let seq = ItemSequenceBuilder::new().build(map.iter(), true);

        assert_eq!(seq.gap_targets(), vec![2, 8]);
        assert!(seq.ends_with_end());
    }

    #[test]
    fn test_empty_page_still_counts_for_gaps() {
        let map = map_of(vec![page(1, 3, &["a"]), page(2, 3, &[]), page(3, 3, &["c"])]);
        let seq = ItemSequenceBuilder::new().build(map.iter(), true);

        assert!(seq.gap_targets().is_empty());
        assert_eq!(seq.element_count(), 2);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_build_is_idempotent() {
        let map = map_of(vec![page(1, 6, &["a", "b"]), page(4, 6, &["x"])]);
        let builder = ItemSequenceBuilder::new();

        let first = builder.build(map.iter(), false);
        let second = builder.build(map.iter(), false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_position_lookups() {
        let map = map_of(vec![page(1, 5, &["a", "b"]), page(5, 5, &["y", "z"])]);
        let seq = ItemSequenceBuilder::new().build(map.snapshot_ordered(), true);

        assert_eq!(seq.element_at(1), Some(&"b"));
        assert_eq!(seq.element_at(2), None);
        assert_eq!(seq.gap_target_at(2), Some(4));
        assert_eq!(seq.element_at(3), Some(&"y"));
        assert_eq!(seq.get(5), Some(&RenderItem::End));
        assert_eq!(seq.get(6), None);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let map = map_of(vec![page(1, 1, &["a"])]);
        let seq = ItemSequenceBuilder::new().build(map.iter(), true);

        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"[{"kind":"element","value":"a"},{"kind":"end"}]"#);
    }

    #[test]
    fn test_extreme_indices_do_not_overflow() {
        let map = map_of(vec![
            page(PageIndex::MIN, 1, &["first"]),
            page(PageIndex::MIN + 1, 1, &["second"]),
            page(PageIndex::MAX - 1, 1, &["penultimate"]),
            page(PageIndex::MAX, 1, &["last"]),
        ]);
        let seq = ItemSequenceBuilder::new().build(map.iter(), false);

        assert_eq!(seq.gap_targets(), vec![PageIndex::MAX - 2]);
        assert_eq!(seq.element_count(), 4);
    }
}
