//! Core types shared across nwcloud facilities
//!
//! This crate provides the vocabulary used by the engine, the CLI and the
//! logging facility:
//!
//! - **Capability types**: Capability, Direction, ToggleState
//! - **Schema constants**: Canonical field keys and event names

pub mod capability;
pub mod schema;

pub use capability::{Capability, Direction, ToggleState};
