//! Book models for the API service

use common::Record;
use serde::{Deserialize, Serialize};

/// Book entity as held by the book store
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub price: f64,
    /// Username of the publishing user; the sole key for mutation rights
    pub author_username: String,
    pub author_display_name: String,
}

impl Record for Book {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Request for publishing a book
///
/// Author fields are not part of the payload; any sent by the client are
/// ignored and taken from the authenticated user instead.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub price: f64,
}

/// Partial update for a book; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub price: Option<f64>,
}

impl BookUpdate {
    /// Apply every present field to `book`
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(description) = &self.description {
            book.description = description.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            book.cover_image = Some(cover_image.clone());
        }
        if let Some(price) = self.price {
            book.price = price;
        }
    }
}

/// Query parameters for book listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    /// Case-insensitive search over title and description
    pub q: Option<String>,
}

/// Response for book operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub price: f64,
    pub author_username: String,
    pub author_display_name: String,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            description: book.description.clone(),
            cover_image: book.cover_image.clone(),
            price: book.price,
            author_username: book.author_username.clone(),
            author_display_name: book.author_display_name.clone(),
        }
    }
}
