pub mod config;
pub mod error;
pub mod result;
pub mod window;

pub use config::{PagerConfig, ReloadPolicy};
pub use error::PagerError;
pub use result::PagerResult;
pub use window::{ScrollWindow, ViewportMetrics};

/// Index of a page in a paged source.
pub type PageIndex = i64;
