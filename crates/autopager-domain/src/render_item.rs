use autopager_core::PageIndex;
use serde::{Deserialize, Serialize};

/// The kind of row a rendering layer has to produce for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Element,
    Gap,
    Footer,
    End,
}

/// One row of the flat sequence handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RenderItem<E> {
    /// A user-visible element from a loaded page.
    Element(E),
    /// Placeholder for unloaded pages; clicking it loads `target_page_index`.
    Gap(PageIndex),
    /// Trailing "load more" row while the source is not exhausted.
    Footer,
    /// Trailing row once the last page of the source is loaded.
    End,
}

impl<E> RenderItem<E> {
    pub fn kind(&self) -> RowKind {
        match self {
            RenderItem::Element(_) => RowKind::Element,
            RenderItem::Gap(_) => RowKind::Gap,
            RenderItem::Footer => RowKind::Footer,
            RenderItem::End => RowKind::End,
        }
    }

    pub fn as_element(&self) -> Option<&E> {
        match self {
            RenderItem::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn gap_target(&self) -> Option<PageIndex> {
        match self {
            RenderItem::Gap(target) => Some(*target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(RenderItem::Element("a").kind(), RowKind::Element);
        assert_eq!(RenderItem::<&str>::Gap(4).kind(), RowKind::Gap);
        assert_eq!(RenderItem::<&str>::Footer.kind(), RowKind::Footer);
        assert_eq!(RenderItem::<&str>::End.kind(), RowKind::End);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(RenderItem::Element("a").as_element(), Some(&"a"));
        assert_eq!(RenderItem::<&str>::Gap(4).gap_target(), Some(4));
        assert_eq!(RenderItem::Element("a").gap_target(), None);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_string(&RenderItem::<String>::Gap(4)).unwrap();
        assert_eq!(json, r#"{"kind":"gap","value":4}"#);

        let json = serde_json::to_string(&RenderItem::<String>::Footer).unwrap();
        assert_eq!(json, r#"{"kind":"footer"}"#);
    }
}
