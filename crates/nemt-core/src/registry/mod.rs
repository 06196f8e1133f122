//! Registries: the ownership-gated operations over each store.
//!
//! Each registry borrows the [`Database`](crate::db::Database) and applies
//! one action's writes at a time. Missing ids surface as
//! [`RegistryError::NotFound`], owner mismatches as
//! [`RegistryError::Forbidden`]; a failed call changes nothing.

mod driver;
mod patient;
mod route;
mod vehicle;

pub use driver::*;
pub use patient::*;
pub use route::*;
pub use vehicle::*;

use thiserror::Error;
use tracing::{debug, warn};

use crate::db::DbError;
use crate::models::CallContext;

/// Registry errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    #[error("{actor} is not the owner of {entity} {id}")]
    Forbidden {
        entity: &'static str,
        id: u64,
        actor: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl RegistryError {
    /// HTTP-style status code: 404, 403, or 500 for storage failures.
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::NotFound { .. } => 404,
            RegistryError::Forbidden { .. } => 403,
            RegistryError::Database(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, RegistryError::Forbidden { .. })
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Reject callers other than the recorded owner.
fn ensure_owner(
    ctx: &CallContext,
    owner: &str,
    entity: &'static str,
    id: u64,
) -> RegistryResult<()> {
    if ctx.is_owner(owner) {
        return Ok(());
    }
    warn!(entity, id, actor = %ctx.actor, "rejected mutation by non-owner");
    Err(RegistryError::Forbidden {
        entity,
        id,
        actor: ctx.actor.clone(),
    })
}

fn not_found(entity: &'static str, id: u64) -> RegistryError {
    debug!(entity, id, "lookup missed");
    RegistryError::NotFound { entity, id }
}

/// Turn a missing row into `NotFound`.
pub(crate) fn require<T>(
    found: Option<T>,
    entity: &'static str,
    id: u64,
) -> RegistryResult<T> {
    found.ok_or_else(|| not_found(entity, id))
}
