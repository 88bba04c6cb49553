//! Repositories backed by the shared record store

pub mod user;

pub use user::UserRepository;
