//! Stop entity

use serde::{Deserialize, Serialize};

use crate::value_objects::StopId;

/// A named boarding/alighting location
///
/// Names are stored normalized and are unique (case-insensitively) in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    /// Store-assigned identifier
    pub id: StopId,
    /// Normalized stop name
    pub name: String,
}

impl Stop {
    /// Create a stop record
    #[must_use]
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
