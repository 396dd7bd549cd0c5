// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Failure reported by a [`KeyValueStore`](crate::KeyValueStore).
///
/// The cache never surfaces these on reads or writes; they reach callers only through
/// the pass-through `del`, `clear` and `keys` operations. Whatever the backend raised is
/// kept as the [`source`](std::error::Error::source).
///
/// ```
/// use moneyclip_store::Error;
///
/// let error = Error::from_message("partition 'users' is read-only");
/// assert!(error.to_string().contains("read-only"));
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Wraps a backend failure, given either as a message or as an error value.
    ///
    /// ```
    /// use moneyclip_store::Error;
    ///
    /// let error = Error::from_message(std::io::Error::other("connection reset"));
    /// assert!(std::error::Error::source(&error).is_some());
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// Result of a store operation.
pub type Result<T> = std::result::Result<T, Error>;
