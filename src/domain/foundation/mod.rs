//! Foundation module - shared value objects for the domain layer.
//!
//! Contains the strongly-typed identifier and time primitives used across
//! the planning domain. These types carry no business rules of their own.

mod ids;
mod timestamp;

pub use ids::SessionId;
pub use timestamp::Timestamp;
