//! Conventional status values.
//!
//! Status columns are open strings. These are the values the stores write
//! themselves plus the ones dispatchers commonly use; nothing rejects a
//! value outside this list.

/// Initial status for drivers, vehicles and transport requests.
pub const PENDING: &str = "pending";
/// Driver status after a certification is issued.
pub const CERTIFIED: &str = "certified";
/// Transport request accepted by dispatch.
pub const CONFIRMED: &str = "confirmed";
/// Initial route status.
pub const PLANNING: &str = "planning";
/// Route status (and assignment record status) after `assign_route`.
pub const ASSIGNED: &str = "assigned";
pub const IN_PROGRESS: &str = "in-progress";
pub const COMPLETED: &str = "completed";
pub const CANCELLED: &str = "cancelled";
