//! Presentation view-models consumed by front ends.

pub mod list_view;
