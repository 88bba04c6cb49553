//! Repositories for the API service

pub mod book;

pub use book::{BlockList, BookError, BookRepository, BookResult};
