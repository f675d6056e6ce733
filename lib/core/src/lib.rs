//! Core domain types and utilities for flowdeck.
//!
//! This crate provides the identifiers and error handling foundation shared
//! by the flow graph engine and the tools built around it.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{EdgeId, NodeId, ParseIdError};
