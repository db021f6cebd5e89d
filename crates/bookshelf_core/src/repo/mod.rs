//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the uniform data-access contract implemented once per entity.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce entity validation before persistence.
//! - Repository APIs return semantic results (`Ok(None)` for an absent id)
//!   in addition to transport errors; absence is never an error and never
//!   a placeholder value.

pub mod author_repo;
pub mod crud;
