// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{fmt, sync::Arc};

/// Handle to a logical sub-store.
///
/// Keys are unique only within a partition. The default partition (created with
/// [`Partition::default`]) is distinct from every named partition, including one
/// named with an empty string.
///
/// Handles are cheap to clone and compare equal when they address the same partition.
///
/// # Examples
///
/// ```
/// use moneyclip_store::Partition;
///
/// let users = Partition::named("users");
/// assert_eq!(users.name(), Some("users"));
/// assert_eq!(users, Partition::named("users"));
/// assert_ne!(users, Partition::default());
/// assert!(Partition::default().is_default());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Partition {
    name: Option<Arc<str>>,
}

impl Partition {
    /// Creates a handle for the partition with the given name.
    #[must_use]
    pub fn named(name: impl AsRef<str>) -> Self {
        Self {
            name: Some(Arc::from(name.as_ref())),
        }
    }

    /// Returns the partition name, or `None` for the default partition.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if this handle addresses the store's default partition.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str("<default>"),
        }
    }
}
