//! Plan construction from caller pagination, filter, and ordering inputs.

use super::criterion::Criterion;
use super::plan::{Predicate, QueryPlan, SortColumn, SortDirection, SortKey};
use super::QueryError;

/// Builds a deterministic [`QueryPlan`] from caller inputs.
///
/// # Contract
/// - `page` is 1-based; `page_size` must be positive. Both are validated
///   and the offending value is carried in the error.
/// - `offset = page_size * (page - 1)`, `limit = page_size`.
/// - Empty `criteria` produces a match-all predicate.
/// - `order_by` is a comma-separated list of `column [asc|desc]` tokens,
///   validated against the closed sortable set before any SQL exists.
pub fn build_query_plan(
    criteria: &[Criterion],
    page: u32,
    page_size: u32,
    order_by: Option<&str>,
) -> Result<QueryPlan, QueryError> {
    if page < 1 {
        return Err(QueryError::InvalidPage(page));
    }
    if page_size < 1 {
        return Err(QueryError::InvalidPageSize(page_size));
    }

    Ok(QueryPlan {
        predicate: combine_criteria(criteria),
        order: parse_order_by(order_by)?,
        limit: i64::from(page_size),
        offset: i64::from(page_size) * (i64::from(page) - 1),
    })
}

/// Combines criteria into one unambiguous predicate tree.
///
/// Name criteria narrow each other (AND); every birth-date criterion is an
/// independent alternative (OR). A row matches when it satisfies all name
/// fragments together, or any one of the dates.
fn combine_criteria(criteria: &[Criterion]) -> Predicate {
    let mut name_leaves = Vec::new();
    let mut date_leaves = Vec::new();
    for criterion in criteria {
        let leaf = Predicate::Leaf(criterion.clone());
        match criterion {
            Criterion::NameContains(_) => name_leaves.push(leaf),
            Criterion::BirthDateOn(_) => date_leaves.push(leaf),
        }
    }

    let mut alternatives = Vec::new();
    match name_leaves.len() {
        0 => {}
        1 => alternatives.push(name_leaves.remove(0)),
        _ => alternatives.push(Predicate::And(name_leaves)),
    }
    alternatives.extend(date_leaves);

    match alternatives.len() {
        0 => Predicate::All,
        1 => alternatives.remove(0),
        _ => Predicate::Or(alternatives),
    }
}

fn parse_order_by(order_by: Option<&str>) -> Result<Vec<SortKey>, QueryError> {
    let raw = match order_by {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let mut keys = Vec::new();
    for token in raw.split(',') {
        let mut words = token.split_whitespace();
        let column_token = words.next().unwrap_or("");
        let column = SortColumn::parse(column_token)
            .ok_or_else(|| QueryError::UnknownSortColumn(column_token.to_string()))?;

        let direction = match words.next() {
            None => SortDirection::Asc,
            Some(word) if word.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(word) if word.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(word) => return Err(QueryError::UnknownSortDirection(word.to_string())),
        };
        if let Some(extra) = words.next() {
            return Err(QueryError::UnknownSortDirection(extra.to_string()));
        }

        keys.push(SortKey { column, direction });
    }

    Ok(keys)
}
