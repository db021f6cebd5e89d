//! Query plans: predicate trees, ordering, and pagination windows.
//!
//! # Invariants
//! - Rendered SQL carries every caller value as a bound parameter.
//! - Junction nodes render with explicit parentheses, so grouping is
//!   visible in the SQL and never depends on operator precedence.

use super::criterion::Criterion;
use rusqlite::types::Value;

/// Predicate expression tree combining zero or more criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every row.
    All,
    /// A single criterion match.
    Leaf(Criterion),
    /// Every child must match.
    And(Vec<Predicate>),
    /// At least one child must match.
    Or(Vec<Predicate>),
}

impl Predicate {
    fn render(&self, sql: &mut String, binds: &mut Vec<Value>) {
        match self {
            Self::All => sql.push_str("1 = 1"),
            Self::Leaf(criterion) => render_leaf(criterion, sql, binds),
            Self::And(children) => render_junction(children, " AND ", sql, binds),
            Self::Or(children) => render_junction(children, " OR ", sql, binds),
        }
    }
}

fn render_junction(children: &[Predicate], joiner: &str, sql: &mut String, binds: &mut Vec<Value>) {
    // The builder never produces an empty junction; degrade to match-all
    // rather than emitting invalid SQL if one is hand-built.
    if children.is_empty() {
        sql.push_str("1 = 1");
        return;
    }

    sql.push('(');
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            sql.push_str(joiner);
        }
        child.render(sql, binds);
    }
    sql.push(')');
}

fn render_leaf(criterion: &Criterion, sql: &mut String, binds: &mut Vec<Value>) {
    sql.push_str(criterion.column().as_sql());
    match criterion {
        Criterion::NameContains(fragment) => {
            sql.push_str(" LIKE '%' || ? || '%' ESCAPE '\\'");
            binds.push(Value::Text(escape_like_fragment(fragment)));
        }
        Criterion::BirthDateOn(date) => {
            sql.push_str(" = ?");
            binds.push(Value::Text(date.format("%Y-%m-%d").to_string()));
        }
    }
}

/// Escapes `LIKE` wildcards so the fragment matches literally.
fn escape_like_fragment(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Sortable author columns. Closed set; tokens match the storage schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    BirthDate,
}

impl SortColumn {
    /// Parses a raw column token. Returns `None` for tokens outside the
    /// closed set.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "name" => Some(Self::Name),
            "birth_date" => Some(Self::BirthDate),
            _ => None,
        }
    }

    /// Storage column name. Only enum members reach ORDER BY.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::BirthDate => "birth_date",
        }
    }
}

/// Sort direction for one ordering key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One ordering key: column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Resolved predicate, ordering, and pagination window, ready to execute
/// against storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicate: Predicate,
    pub order: Vec<SortKey>,
    pub limit: i64,
    pub offset: i64,
}

impl QueryPlan {
    /// Renders the plan as `{select_prefix} WHERE ... [ORDER BY ...] LIMIT ?
    /// [OFFSET ?]` plus the bind values, in placeholder order.
    pub fn to_select_sql(&self, select_prefix: &str) -> (String, Vec<Value>) {
        let mut sql = String::from(select_prefix);
        let mut binds = Vec::new();

        sql.push_str(" WHERE ");
        self.predicate.render(&mut sql, &mut binds);

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            for (index, key) in self.order.iter().enumerate() {
                if index > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(key.column.as_sql());
                sql.push(' ');
                sql.push_str(key.direction.as_sql());
            }
        }

        sql.push_str(" LIMIT ?");
        binds.push(Value::Integer(self.limit));
        if self.offset > 0 {
            sql.push_str(" OFFSET ?");
            binds.push(Value::Integer(self.offset));
        }

        (sql, binds)
    }
}
