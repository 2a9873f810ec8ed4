//! Core types shared across helm-inspect facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
