//! Error handling for the memlab library
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! [`MemlabError`] describes what went wrong in enough detail to print it from
//! a demo program or match on it in a test.

use thiserror::Error;

/// Main error type for the memlab library
#[derive(Error, Debug)]
pub enum MemlabError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data or parameters
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Error message describing the issue
        message: String,
    },

    /// Index out of bounds access
    #[error("Out of bounds: index {index}, size {size}")]
    OutOfBounds {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Memory allocation failures
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// A handle was resolved after the slot it refers to was invalidated
    #[error(
        "Stale handle: index {index} taken at generation {handle_generation}, container is at generation {current_generation}"
    )]
    StaleHandle {
        /// Slot index the handle refers to
        index: usize,
        /// Generation stamp carried by the handle
        handle_generation: u64,
        /// Generation of the container when the handle was resolved
        current_generation: u64,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl MemlabError {
    /// Create an invalid data error
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create an out of bounds error
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::OutOfBounds { index, size }
    }

    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create a stale handle error
    pub fn stale_handle(index: usize, handle_generation: u64, current_generation: u64) -> Self {
        Self::StaleHandle {
            index,
            handle_generation,
            current_generation,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error from a message
    pub fn io_error<S: Into<String>>(message: S) -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::Other, message.into()))
    }

    /// Check if this is a recoverable error
    ///
    /// A failed allocation leaves the container untouched, so the caller may
    /// retry with a smaller request. A stale handle can be re-acquired.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::OutOfMemory { .. } => true,
            Self::StaleHandle { .. } => true,
            Self::InvalidData { .. } => false,
            Self::OutOfBounds { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidData { .. } => "data",
            Self::OutOfBounds { .. } => "bounds",
            Self::OutOfMemory { .. } => "memory",
            Self::StaleHandle { .. } => "handle",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MemlabError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(MemlabError::out_of_bounds(index, size))
    } else {
        Ok(())
    }
}

/// Assert that a range is within bounds
#[inline]
pub fn check_range(start: usize, end: usize, size: usize) -> Result<()> {
    if start > end {
        return Err(MemlabError::invalid_data(format!(
            "Invalid range: start {} > end {}",
            start, end
        )));
    }
    if end > size {
        return Err(MemlabError::out_of_bounds(end, size));
    }
    Ok(())
}
