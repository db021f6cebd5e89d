//! Author use-case service.
//!
//! # Responsibility
//! - Provide stable catalog entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::author::Author;
use crate::query::Criterion;
use crate::repo::crud::{CrudOperations, RepoError, RepoResult};

/// Use-case service wrapper for author catalog operations.
pub struct AuthorService<R> {
    repo: R,
}

impl<R> AuthorService<R>
where
    R: CrudOperations<Entity = Author, Criterion = Criterion>,
{
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns one page of the catalog.
    ///
    /// Result order is storage-defined when `order_by` is `None`.
    pub fn get_all(
        &self,
        page: u32,
        page_size: u32,
        order_by: Option<&str>,
    ) -> RepoResult<Vec<Author>> {
        self.repo.get_all(page, page_size, order_by)
    }

    /// Returns one page of authors matching the combined criteria.
    pub fn find_by_criteria(
        &self,
        criteria: &[Criterion],
        page: u32,
        page_size: u32,
        order_by: Option<&str>,
    ) -> RepoResult<Vec<Author>> {
        self.repo.find_by_criteria(criteria, page, page_size, order_by)
    }

    /// Returns the author with the given id, or `None` when absent.
    pub fn find_by_id(&self, id: &str) -> RepoResult<Option<Author>> {
        self.repo.find_by_id(id)
    }

    /// Upserts one author and returns the freshly read row.
    pub fn save(&mut self, author: &Author) -> RepoResult<Author> {
        let mut saved = self.repo.save_all(std::slice::from_ref(author))?;
        saved
            .pop()
            .ok_or_else(|| RepoError::NotFound(author.id.clone()))
    }

    /// Upserts a batch in input order. Not atomic across the batch.
    pub fn save_all(&mut self, authors: &[Author]) -> RepoResult<Vec<Author>> {
        self.repo.save_all(authors)
    }

    /// Upserts a batch inside one transaction: all or nothing.
    pub fn save_all_atomic(&mut self, authors: &[Author]) -> RepoResult<Vec<Author>> {
        self.repo.save_all_atomic(authors)
    }
}
