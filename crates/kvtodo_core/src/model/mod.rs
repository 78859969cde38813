//! Domain model for the todo list.
//!
//! # Responsibility
//! - Define the task record and the filter predicate.
//! - Own the serialized shape of the stored list.
//!
//! # Invariants
//! - The list is the unit of persistence; tasks have no remote address.

pub mod codec;
pub mod task;
