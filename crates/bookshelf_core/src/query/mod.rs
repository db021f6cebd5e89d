//! Query construction: filter criteria, predicate plans, and validation.
//!
//! # Responsibility
//! - Translate caller pagination/filter/ordering inputs into a
//!   deterministic, parameterized query plan.
//! - Validate every caller-supplied token before SQL is assembled.
//!
//! # Invariants
//! - Filter and sort columns come from closed per-entity sets; unknown
//!   tokens are rejected, never interpolated.
//! - Predicate grouping is explicit in the plan and independent of the
//!   order criteria were supplied in.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod builder;
pub mod criterion;
pub mod plan;

pub use builder::build_query_plan;
pub use criterion::{Criterion, FilterColumn, FilterValue};
pub use plan::{Predicate, QueryPlan, SortColumn, SortDirection, SortKey};

/// Caller error raised while building a query plan.
///
/// Every variant carries the offending value so callers can diagnose the
/// input without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Pages are 1-based.
    InvalidPage(u32),
    /// A page must hold at least one row.
    InvalidPageSize(u32),
    /// Filter column token outside the closed filterable set.
    UnknownFilterColumn(String),
    /// Sort column token outside the closed sortable set.
    UnknownSortColumn(String),
    /// Sort direction token other than `asc`/`desc`.
    UnknownSortDirection(String),
    /// Filter operand type does not fit the column.
    ValueTypeMismatch {
        column: FilterColumn,
        expected: &'static str,
    },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPage(page) => {
                write!(f, "page must be greater than 0 but actual is {page}")
            }
            Self::InvalidPageSize(size) => {
                write!(f, "page size must be greater than 0 but actual is {size}")
            }
            Self::UnknownFilterColumn(token) => {
                write!(f, "unknown filter column `{token}`; expected name|birth_date")
            }
            Self::UnknownSortColumn(token) => {
                write!(f, "unknown sort column `{token}`; expected name|birth_date")
            }
            Self::UnknownSortDirection(token) => {
                write!(f, "unknown sort direction `{token}`; expected asc|desc")
            }
            Self::ValueTypeMismatch { column, expected } => {
                write!(f, "filter column `{column}` expects a {expected} operand")
            }
        }
    }
}

impl Error for QueryError {}
