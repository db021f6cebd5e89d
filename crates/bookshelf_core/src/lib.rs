//! Core data-access logic for the Bookshelf author catalog.
//! This crate is the single source of truth for query construction and
//! upsert reconciliation invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::{Author, AuthorId, AuthorValidationError};
pub use query::{
    build_query_plan, Criterion, FilterColumn, FilterValue, Predicate, QueryError, QueryPlan,
    SortColumn, SortDirection, SortKey,
};
pub use repo::author_repo::SqliteAuthorRepository;
pub use repo::crud::{CrudOperations, RepoError, RepoResult};
pub use service::author_service::AuthorService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
