//! Book repository: the book store
//!
//! Authorship is the only authorization key. A book's `author_username` is
//! set from the authenticated user at publish time and never changes; update
//! and delete compare it with the caller inside the store's critical section.

use std::sync::Arc;

use auth::models::User;
use common::{MemoryStore, Store, StoreError};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    models::{Book, BookUpdate, NewBook},
    validation::{validate_book_update, validate_new_book},
};

/// Errors raised by the book store
#[derive(Error, Debug)]
pub enum BookError {
    /// No book with the given id
    #[error("Book with id {0} not found")]
    NotFound(u64),

    /// A search matched no book
    #[error("No books found with the word {0}")]
    NoMatches(String),

    /// The author is on the block-list
    #[error("{0} is not allowed to publish books")]
    BlockedAuthor(String),

    /// The caller did not author the book
    #[error("User {username} is not the author of book {id}")]
    NotAuthor { id: u64, username: String },

    /// Input failed a presence or type check
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Type alias for Result with BookError
pub type BookResult<T> = Result<T, BookError>;

/// Usernames that may not publish, compared case-insensitively
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    names: Vec<String>,
}

impl BlockList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, username: &str) -> bool {
        let username = username.to_lowercase();
        self.names.iter().any(|name| *name == username)
    }
}

/// Book repository
#[derive(Clone)]
pub struct BookRepository<S = MemoryStore<Book>> {
    store: S,
    blocked_authors: Arc<BlockList>,
}

impl BookRepository {
    /// Create a repository over an empty in-memory store
    pub fn in_memory(blocked_authors: BlockList) -> Self {
        Self::new(MemoryStore::new(), blocked_authors)
    }
}

impl<S: Store<Book>> BookRepository<S> {
    /// Create a new book repository
    pub fn new(store: S, blocked_authors: BlockList) -> Self {
        Self {
            store,
            blocked_authors: Arc::new(blocked_authors),
        }
    }

    /// List books, optionally filtered by a search term
    ///
    /// A non-empty `query` matches title or description case-insensitively
    /// and must match at least one book.
    pub async fn list(&self, query: Option<&str>) -> BookResult<Vec<Book>> {
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return Ok(self.store.list().await);
        };

        let needle = query.to_lowercase();
        let matches = self
            .store
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.description.to_lowercase().contains(&needle)
            })
            .await;

        if matches.is_empty() {
            return Err(BookError::NoMatches(query.to_string()));
        }

        Ok(matches)
    }

    /// Get a book by ID
    pub async fn get(&self, id: u64) -> BookResult<Book> {
        self.store.get(id).await.ok_or(BookError::NotFound(id))
    }

    /// Publish a book as `author`
    pub async fn create(&self, new_book: &NewBook, author: &User) -> BookResult<Book> {
        if self.blocked_authors.contains(&author.username) {
            warn!("Blocked author {} tried to publish", author.username);
            return Err(BookError::BlockedAuthor(author.username.clone()));
        }

        validate_new_book(new_book).map_err(BookError::Validation)?;

        let book = self
            .store
            .insert(|id, _: &[Book]| {
                Ok::<_, BookError>(Book {
                    id,
                    title: new_book.title.clone(),
                    description: new_book.description.clone(),
                    cover_image: new_book.cover_image.clone(),
                    price: new_book.price,
                    author_username: author.username.clone(),
                    author_display_name: author.display_name.clone(),
                })
            })
            .await?;

        info!("Book {} published by {}", book.id, book.author_username);
        Ok(book)
    }

    /// Apply a partial update to a book authored by `author`
    ///
    /// Checks run in order: existence, authorship, then the patch itself.
    pub async fn update(&self, id: u64, author: &User, patch: &BookUpdate) -> BookResult<Book> {
        let book = self
            .store
            .update(id, |book| {
                ensure_author(book, author)?;
                validate_book_update(patch).map_err(BookError::Validation)?;
                patch.apply(book);
                Ok::<_, BookError>(())
            })
            .await?
            .ok_or(BookError::NotFound(id))?;

        info!("Book {} updated by {}", book.id, author.username);
        Ok(book)
    }

    /// Delete a book authored by `author`
    pub async fn delete(&self, id: u64, author: &User) -> BookResult<Book> {
        let book = self
            .store
            .remove(id, |book| ensure_author(book, author))
            .await?
            .ok_or(BookError::NotFound(id))?;

        info!("Book {} deleted by {}", book.id, author.username);
        Ok(book)
    }
}

fn ensure_author(book: &Book, user: &User) -> BookResult<()> {
    if book.author_username != user.username {
        warn!(
            "User {} denied access to book {} by {}",
            user.username, book.id, book.author_username
        );
        return Err(BookError::NotAuthor {
            id: book.id,
            username: user.username.clone(),
        });
    }
    Ok(())
}
