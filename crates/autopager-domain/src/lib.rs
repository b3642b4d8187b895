pub mod page;
pub mod page_map;
pub mod render_item;
pub mod sequence;

pub use page::Page;
pub use page_map::PageMap;
pub use render_item::{RenderItem, RowKind};
pub use sequence::{ItemSequenceBuilder, RenderSequence};
