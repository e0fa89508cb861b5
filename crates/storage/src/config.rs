//! Repository configuration.

use mediadex_core::{Error, Result};
use mediadex_index::{DEFAULT_ORDER, MIN_ORDER};
use serde::{Deserialize, Serialize};

/// Tunables for a [`Repository`](crate::Repository).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Maximum number of keys a B+Tree node holds before it splits.
    pub order: usize,
}

impl RepositoryConfig {
    /// Creates a configuration with the given B+Tree order.
    pub fn with_order(order: usize) -> Self {
        Self { order }
    }

    /// Checks that the configuration can build a repository.
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::invalid_configuration(format!(
                "order must be at least {}, got {}",
                MIN_ORDER, self.order
            )));
        }
        Ok(())
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
        }
    }
}
