//! Utility modules.

pub mod retry;
pub mod text;

pub use retry::{RetryPolicy, Retryable, retry_with};
pub use text::{is_blank, preview};
