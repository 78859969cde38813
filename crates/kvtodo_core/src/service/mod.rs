//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gateway calls into list-level operations.
//! - Keep front ends decoupled from storage details.

pub mod status;
pub mod todo_service;
