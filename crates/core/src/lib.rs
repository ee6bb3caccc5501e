//! # Shepherd Core
//!
//! Domain models, typed errors, and pure scheduling logic for the shepherd
//! appointment engine. This crate holds no I/O: boundary validation and the
//! appointment state machine predicates live here so they can be tested
//! without a database.

/// Typed domain errors and result alias
pub mod errors;
/// Domain entities and request/response types
pub mod models;
