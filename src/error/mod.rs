//! Error handling
//!
//! Defines error types and the protocol replies they map to.

pub mod handlers;
pub mod types;

pub use handlers::reply_for;
pub use types::*;
