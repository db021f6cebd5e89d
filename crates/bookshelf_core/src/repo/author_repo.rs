//! Author repository: the CRUD contract instantiated over SQLite.
//!
//! # Responsibility
//! - Translate the generic CRUD contract into parameterized SQLite SQL.
//! - Keep row/entity mapping total: a complete entity or a mapping error.
//!
//! # Invariants
//! - Write paths call `Author::validate()` before any SQL mutation.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every caller value reaches SQL as a bound parameter; only whitelisted
//!   column and direction keywords are interpolated.

use crate::db::migrations::latest_version;
use crate::model::author::{Author, AuthorId};
use crate::query::{build_query_plan, Criterion, QueryPlan};
use crate::repo::crud::{CrudOperations, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};

const AUTHORS_TABLE: &str = "authors";
const AUTHOR_COLUMNS: [&str; 3] = ["id", "name", "birth_date"];
const AUTHOR_SELECT_SQL: &str = "SELECT id, name, birth_date FROM authors";

// Conditional write keyed on id uniqueness: insert when absent, update the
// mutable columns when present. One statement, so concurrent savers cannot
// both observe "absent" and double-insert.
const AUTHOR_UPSERT_SQL: &str = "INSERT INTO authors (id, name, birth_date)
 VALUES (?1, ?2, ?3)
 ON CONFLICT (id) DO UPDATE SET
    name = excluded.name,
    birth_date = excluded.birth_date;";

/// SQLite-backed author repository borrowing one storage session.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Verifies the migration version and the presence of the table and
    /// columns this repository depends on, so schema drift is reported at
    /// construction rather than as a mapping failure mid-operation.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_author_storage_ready(conn)?;
        Ok(Self { conn })
    }

    fn session(&self) -> &Connection {
        self.conn
    }
}

impl CrudOperations for SqliteAuthorRepository<'_> {
    type Entity = Author;
    type Criterion = Criterion;

    fn get_all(
        &self,
        page: u32,
        page_size: u32,
        order_by: Option<&str>,
    ) -> RepoResult<Vec<Author>> {
        let plan = build_query_plan(&[], page, page_size, order_by)?;
        fetch_authors(self.session(), &plan)
    }

    fn find_by_criteria(
        &self,
        criteria: &[Criterion],
        page: u32,
        page_size: u32,
        order_by: Option<&str>,
    ) -> RepoResult<Vec<Author>> {
        let plan = build_query_plan(criteria, page, page_size, order_by)?;
        fetch_authors(self.session(), &plan)
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<Author>> {
        find_author_by_id(self.session(), id)
    }

    fn save_all(&mut self, entities: &[Author]) -> RepoResult<Vec<Author>> {
        save_all_on(self.conn, entities)
    }

    fn save_all_atomic(&mut self, entities: &[Author]) -> RepoResult<Vec<Author>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let saved = save_all_on(&tx, entities)?;
        tx.commit()?;
        Ok(saved)
    }
}

fn fetch_authors(conn: &Connection, plan: &QueryPlan) -> RepoResult<Vec<Author>> {
    let (sql, binds) = plan.to_select_sql(AUTHOR_SELECT_SQL);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(binds))?;

    let mut authors = Vec::new();
    while let Some(row) = rows.next()? {
        authors.push(author_from_row(row)?);
    }
    Ok(authors)
}

fn find_author_by_id(conn: &Connection, id: &str) -> RepoResult<Option<Author>> {
    let mut stmt = conn.prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query(params![id])?;

    if let Some(row) = rows.next()? {
        return Ok(Some(author_from_row(row)?));
    }
    Ok(None)
}

fn save_all_on(conn: &Connection, entities: &[Author]) -> RepoResult<Vec<Author>> {
    let mut saved = Vec::with_capacity(entities.len());
    for entity in entities {
        entity.validate()?;
        conn.execute(AUTHOR_UPSERT_SQL, params_from_iter(author_to_row(entity)))?;

        match find_author_by_id(conn, &entity.id)? {
            Some(reloaded) => saved.push(reloaded),
            None => return Err(RepoError::NotFound(entity.id.clone())),
        }
    }
    Ok(saved)
}

/// Decodes one storage row into a complete author.
///
/// Reads exactly `id`, `name`, `birth_date`; an absent column or an
/// undecodable value fails with a mapping error naming the column. Never
/// produces a partially populated entity.
fn author_from_row(row: &Row<'_>) -> RepoResult<Author> {
    let id: AuthorId = get_column(row, "id")?;
    let name: String = get_column(row, "name")?;
    let birth_date: NaiveDate = get_column(row, "birth_date")?;

    let author = Author {
        id,
        name,
        birth_date,
    };
    author
        .validate()
        .map_err(|err| RepoError::Mapping(format!("persisted author row is invalid: {err}")))?;
    Ok(author)
}

fn get_column<T: rusqlite::types::FromSql>(row: &Row<'_>, column: &str) -> RepoResult<T> {
    row.get(column).map_err(|err| {
        RepoError::Mapping(format!("column `{column}` cannot be decoded: {err}"))
    })
}

/// Encodes an author as bind values ordered as [`AUTHOR_COLUMNS`].
fn author_to_row(author: &Author) -> Vec<Value> {
    vec![
        Value::Text(author.id.clone()),
        Value::Text(author.name.clone()),
        Value::Text(author.birth_date.format("%Y-%m-%d").to_string()),
    ]
}

fn ensure_author_storage_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, AUTHORS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(AUTHORS_TABLE));
    }

    for column in AUTHOR_COLUMNS {
        if !table_has_column(conn, AUTHORS_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: AUTHORS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
