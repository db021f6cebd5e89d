//! Filter criteria over the closed set of filterable author columns.

use super::QueryError;
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

/// Filterable author columns. Closed set; tokens match the storage schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Name,
    BirthDate,
}

impl FilterColumn {
    /// Parses a raw column token. Returns `None` for tokens outside the
    /// closed set.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "name" => Some(Self::Name),
            "birth_date" => Some(Self::BirthDate),
            _ => None,
        }
    }

    /// Storage column name. Safe to interpolate: values never pass through
    /// here, only members of this enum.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BirthDate => "birth_date",
        }
    }

    fn expected_operand(self) -> &'static str {
        match self {
            Self::Name => "text",
            Self::BirthDate => "date",
        }
    }
}

impl Display for FilterColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Typed filter operand supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(NaiveDate),
}

/// A single immutable (column, value) filter condition.
///
/// Constructed per query, never persisted, never mutated. The enum shape
/// makes a column/operand type mismatch unrepresentable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Case-insensitive substring match on `name`.
    NameContains(String),
    /// Exact-equality match on `birth_date`.
    BirthDateOn(NaiveDate),
}

impl Criterion {
    /// Builds a criterion from a raw column token and a typed operand.
    ///
    /// # Errors
    /// - `UnknownFilterColumn` for tokens outside the closed set. Unknown
    ///   tokens are rejected, not dropped, so a typo cannot quietly widen
    ///   a result set.
    /// - `ValueTypeMismatch` when the operand type does not fit the column.
    pub fn new(column: &str, value: FilterValue) -> Result<Self, QueryError> {
        let parsed = FilterColumn::parse(column)
            .ok_or_else(|| QueryError::UnknownFilterColumn(column.trim().to_string()))?;
        match (parsed, value) {
            (FilterColumn::Name, FilterValue::Text(text)) => Ok(Self::NameContains(text)),
            (FilterColumn::BirthDate, FilterValue::Date(date)) => Ok(Self::BirthDateOn(date)),
            (column, _) => Err(QueryError::ValueTypeMismatch {
                column,
                expected: column.expected_operand(),
            }),
        }
    }

    /// Case-insensitive substring filter on the author name.
    pub fn name_contains(fragment: impl Into<String>) -> Self {
        Self::NameContains(fragment.into())
    }

    /// Exact-date filter on the author birth date.
    pub fn birth_date_on(date: NaiveDate) -> Self {
        Self::BirthDateOn(date)
    }

    /// The column this criterion filters on.
    pub fn column(&self) -> FilterColumn {
        match self {
            Self::NameContains(_) => FilterColumn::Name,
            Self::BirthDateOn(_) => FilterColumn::BirthDate,
        }
    }
}
