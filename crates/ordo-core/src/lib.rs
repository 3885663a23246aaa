//! Core contracts for Ordo.
//!
//! This crate defines what the resolver consumes: the [`source::Source`] and
//! [`source::Dependency`] capability traits, the resolver configuration, and a
//! data-driven plan manifest whose steps implement those traits.
//!
//! This crate is intentionally free of graph code; ordering lives in
//! `ordo-resolver`.

pub mod config;
pub mod plan;
pub mod source;
