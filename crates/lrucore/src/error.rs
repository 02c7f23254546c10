//! Error types for lrucore
//!
//! Every error carries a stable numeric [`ErrorCode`] so callers can branch on
//! the category without matching message text.

use std::fmt;

/// Result type alias for lrucore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Stable numeric error codes.
///
/// Ranges:
/// - 1000-1999: general errors
/// - 2000-2999: entry (node) errors
/// - 3000-3999: cache operation errors
/// - 4000-4999: configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Unknown failure
    UnknownError = 1000,
    /// General failure, used for broken internal invariants
    GenericError = 1001,

    /// General entry failure
    NodeError = 2000,
    /// Value kind does not match the kind fixed at construction
    InvalidNodeType = 2001,
    /// Link targets a handle that is not a live entry
    InvalidNodeLink = 2002,
    /// Entry tried to link to itself
    NodeSelfLink = 2003,

    /// Key absent from the cache
    CacheKeyNotFound = 3001,
    /// Reserved: eviction could not complete
    CacheEvictionFailed = 3002,
    /// Reserved: lookup could not complete
    CacheLookupFailed = 3003,

    /// Invalid construction parameter
    ConfigInvalid = 4001,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Category name derived from the code range
    pub fn category(self) -> &'static str {
        match self.as_u16() {
            1000..=1999 => "General Cache Error",
            2000..=2999 => "Node Error",
            3000..=3999 => "Cache Operation Error",
            4000..=4999 => "Configuration Error",
            _ => "Unknown Category",
        }
    }

    /// Default message for the code
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::UnknownError => "An unknown error occurred",
            ErrorCode::GenericError => "General cache error",
            ErrorCode::NodeError => "General node error",
            ErrorCode::InvalidNodeType => "Invalid data type for node",
            ErrorCode::InvalidNodeLink => "Invalid node link operation",
            ErrorCode::NodeSelfLink => "Node cannot link to itself",
            ErrorCode::CacheKeyNotFound => "Cache key not found",
            ErrorCode::CacheEvictionFailed => "Failed to evict cache entry",
            ErrorCode::CacheLookupFailed => "Failed to find node in cache",
            ErrorCode::ConfigInvalid => "Invalid cache configuration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Error types for cache and entry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid construction parameter
    Config(String),

    /// An entry link targets the entry itself
    SelfLink,

    /// An entry link targets a handle that is not live
    InvalidLink(usize),

    /// Value kind differs from the kind fixed at construction
    TypeMismatch {
        /// Kind recorded when the entry was created
        expected: &'static str,
        /// Kind of the rejected value
        found: &'static str,
    },

    /// An invalidated entry was offered for insertion
    InvalidEntry,

    /// Key not present in the cache
    NotFound,

    /// Internal invariant violated
    Invariant(String),
}

impl Error {
    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Config(_) => ErrorCode::ConfigInvalid,
            Error::SelfLink => ErrorCode::NodeSelfLink,
            Error::InvalidLink(_) => ErrorCode::InvalidNodeLink,
            Error::TypeMismatch { .. } => ErrorCode::InvalidNodeType,
            Error::InvalidEntry => ErrorCode::NodeError,
            Error::NotFound => ErrorCode::CacheKeyNotFound,
            Error::Invariant(_) => ErrorCode::GenericError,
        }
    }

    /// Category name of this error
    pub fn category(&self) -> &'static str {
        self.code().category()
    }

    /// Human-readable message without the code prefix
    pub fn message(&self) -> String {
        match self {
            Error::Config(msg) => msg.clone(),
            Error::InvalidLink(slot) => format!("Link target {} is not a live entry", slot),
            Error::TypeMismatch { expected, found } => {
                format!("Data must be of type {}, got {}", expected, found)
            }
            Error::InvalidEntry => "Entry has been invalidated and cannot be reused".to_string(),
            Error::Invariant(msg) => msg.clone(),
            Error::SelfLink | Error::NotFound => self.code().default_message().to_string(),
        }
    }

    /// Report the error to the logging sink and hand it back
    pub(crate) fn logged(self) -> Self {
        tracing::debug!(code = self.code().as_u16(), category = self.category(), "{}", self);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for Error {}
