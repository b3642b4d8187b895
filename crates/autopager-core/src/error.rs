use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Load guard misuse: {0}")]
    ReentrantLock(String),

    #[error("Host context detached while requesting page {0}")]
    DetachedContext(i64),

    #[error("Fetch of page {index} failed: {message}")]
    FetchFailed { index: i64, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
