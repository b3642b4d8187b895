use autopager_core::{PageIndex, ViewportMetrics};
use serde::Serialize;

/// Notifications for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoordinatorEvent {
    /// A fetch was dispatched.
    LoadStarted { index: PageIndex },
    /// The render sequence was recomputed; redraw.
    SequenceChanged { len: usize },
    /// The first page ever was applied.
    DataFirstAttached,
    /// A fetch failed; nothing was changed.
    FetchFailed { index: PageIndex, message: String },
}

/// Reports the current layout of the rendered list.
pub trait ScrollSource {
    fn metrics(&self) -> ViewportMetrics;
}

impl ScrollSource for ViewportMetrics {
    fn metrics(&self) -> ViewportMetrics {
        *self
    }
}
