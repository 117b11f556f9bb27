// Family lookup capability: the seam between the draft generator and the
// remote catalog.

use async_trait::async_trait;
use thiserror::Error;

use crate::family::{Family, FamilyId};

#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("family {id} lookup returned HTTP {status}")]
    Status { id: FamilyId, status: u16 },

    #[error("family {id} payload could not be decoded: {message}")]
    Decode { id: FamilyId, message: String },
}

impl LookupError {
    /// Whether retrying with another id may succeed. Decode failures mean
    /// the payload shape is not what we expect, so retrying won't help.
    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::Transport(_) | LookupError::Status { .. })
    }
}

/// Keyed read-only access to evolution families.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FamilyLookup: Send + Sync {
    async fn lookup(&self, id: FamilyId) -> Result<Family, LookupError>;
}
