//! Error types used by the crate.

use thiserror::Error;

/// Error returned by the rendering engine through the [`Style`](crate::Style) trait.
///
/// Annotation managers never return these errors to the caller. Failed engine calls are logged, and a
/// failed sync is repeated on the next display link tick.
#[derive(Debug, Error)]
pub enum WaymarkError {
    /// The engine rejected the call.
    #[error("style error: {0}")]
    Style(String),
    /// Source or layer with the given id already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
}
