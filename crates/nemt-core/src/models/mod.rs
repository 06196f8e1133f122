//! Domain models for the transport coordination stores.

mod context;
mod driver;
mod patient;
mod route;
pub mod status;
mod vehicle;

pub use context::*;
pub use driver::*;
pub use patient::*;
pub use route::*;
pub use vehicle::*;
