use thiserror::Error;

/// Error kinds raised by [`SqrtDeque`] operations and cursors.
///
/// [`SqrtDeque`]: crate::SqrtDeque
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DequeError {
    /// An index or cursor position lies outside the valid range
    #[error("index out of bounds: the index is {index} but the len is {len}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Length of the container at the time of the access
        len: usize,
    },
    /// The operation needs at least one element
    #[error("container is empty")]
    Empty,
    /// The cursor is detached or the operation mixes cursors of different containers
    #[error("invalid cursor: detached or owned by another container")]
    InvalidCursor,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DequeError>;
