//! Uniform CRUD contract and the shared repository error taxonomy.

use crate::db::DbError;
use crate::model::author::{AuthorId, AuthorValidationError};
use crate::query::QueryError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Caller-supplied pagination/filter/ordering input is invalid.
    InvalidQuery(QueryError),
    /// Entity failed write-path validation.
    Validation(AuthorValidationError),
    /// A storage row could not be converted into an entity. Indicates
    /// schema drift; surfaced, never masked.
    Mapping(String),
    /// Storage-session failure (connectivity, constraint, timeout).
    Db(DbError),
    /// Write/read-back consistency violation: an upserted row vanished
    /// before it could be read back. Lookup misses are `Ok(None)`, not
    /// this error.
    NotFound(AuthorId),
    /// Connection has not been migrated up to the version this
    /// repository requires.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A table this repository depends on is missing.
    MissingRequiredTable(&'static str),
    /// A column this repository depends on is missing.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Mapping(message) => write!(f, "row mapping failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "author not found after write: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidQuery(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

impl From<AuthorValidationError> for RepoError {
    fn from(value: AuthorValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Uniform data-access contract, implemented once per entity kind.
///
/// Reads are paged: `page` is 1-based, `page_size` is the window size, and
/// `order_by` is an optional comma-separated `column [asc|desc]` list
/// validated against the entity's sortable columns. Result order is
/// storage-defined when `order_by` is `None`.
pub trait CrudOperations {
    /// Entity type this contract is instantiated for.
    type Entity;
    /// Filter criterion type accepted by [`CrudOperations::find_by_criteria`].
    type Criterion;

    /// Returns one page of entities.
    fn get_all(
        &self,
        page: u32,
        page_size: u32,
        order_by: Option<&str>,
    ) -> RepoResult<Vec<Self::Entity>>;

    /// Returns one page of entities matching the combined criteria
    /// predicate.
    fn find_by_criteria(
        &self,
        criteria: &[Self::Criterion],
        page: u32,
        page_size: u32,
        order_by: Option<&str>,
    ) -> RepoResult<Vec<Self::Entity>>;

    /// Returns the entity with the given identifier, or `None` when no row
    /// exists for it.
    fn find_by_id(&self, id: &str) -> RepoResult<Option<Self::Entity>>;

    /// Inserts or updates each entity in input order, re-reading every row
    /// after its write so the output reflects what storage now holds.
    ///
    /// Output length and order match the input; each output id equals the
    /// corresponding input id. Not atomic: a failure on entity `k` surfaces
    /// immediately and leaves entities `1..k-1` persisted.
    fn save_all(&mut self, entities: &[Self::Entity]) -> RepoResult<Vec<Self::Entity>>;

    /// Like [`CrudOperations::save_all`], but wraps the whole batch in a
    /// single transaction: either every entity persists or none does.
    fn save_all_atomic(&mut self, entities: &[Self::Entity]) -> RepoResult<Vec<Self::Entity>>;
}
