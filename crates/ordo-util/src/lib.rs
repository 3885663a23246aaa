//! Shared utilities for Ordo.
//!
//! Cross-cutting concerns used by the other Ordo crates: the unified
//! application error type and terminal status lines.

pub mod errors;
pub mod status;
