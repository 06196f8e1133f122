//! Environmental inputs supplied by the host on every mutating call.

use serde::{Deserialize, Serialize};

/// Who is calling and when.
///
/// The host owns identity and time: `actor` is the principal recorded as
/// owner/certifier/inspector, `block_height` is the logical clock used to
/// stamp registration, issue, inspection and assignment dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, uniffi::Record)]
pub struct CallContext {
    pub actor: String,
    pub block_height: u64,
}

impl CallContext {
    pub fn new(actor: impl Into<String>, block_height: u64) -> Self {
        Self {
            actor: actor.into(),
            block_height,
        }
    }

    /// Whether this caller is the recorded owner.
    pub fn is_owner(&self, owner: &str) -> bool {
        self.actor == owner
    }
}
